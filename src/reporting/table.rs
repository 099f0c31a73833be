//! Table rows in Markdown (PHP Markdown Extra) or Confluence wiki markup

use anyhow::bail;
use serde::Serialize;
use std::str::FromStr;

use crate::core::ErrorMap;

/// Key used for the message of a URL that could not be processed
pub const FAILED_KEY: &str = "Failed";

/// Markup dialect of the output table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Markdown,
    Confluence,
}

impl FromStr for OutputMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "markdown" => Ok(Self::Markdown),
            "confluence" => Ok(Self::Confluence),
            _ => bail!("Unknown output mode \"{}\"", s),
        }
    }
}

impl OutputMode {
    /// Header rows written once before any file rows
    pub fn header(self) -> &'static str {
        match self {
            Self::Markdown => "|File|Apache Preflight Error(s)|\n|:---|:---\n",
            Self::Confluence => "|*File*|*Apache Preflight Error(s)*|\n",
        }
    }

    /// Render the row for one file
    pub fn render_row(self, file: &str, url: &str, errors: &ErrorMap) -> String {
        match self {
            Self::Markdown => errors_to_markdown(file, url, errors),
            Self::Confluence => errors_to_confluence(file, url, errors),
        }
    }
}

/// Markdown row: `|[file](url)|` then `code: message<br>` per detail
///
/// Asterisks in messages are escaped so they don't turn into emphasis.
pub fn errors_to_markdown(file: &str, url: &str, errors: &ErrorMap) -> String {
    let mut row = format!("|[{}]({})|", file, url);
    for (code, messages) in errors {
        for message in messages {
            row.push_str(&format!("{}: {}<br>", code, message.replace('*', "\\*")));
        }
    }
    row.push('\n');
    row
}

/// Confluence row: `|[file |url]|` then `code: message \\` per detail
pub fn errors_to_confluence(file: &str, url: &str, errors: &ErrorMap) -> String {
    let mut row = format!("|[{} |{}]|", file, url);
    for (code, messages) in errors {
        for message in messages {
            row.push_str(&format!("{}: {} \\\\", code, message));
        }
    }
    row.push('\n');
    row
}

/// Error map holding a single processing failure message
pub fn failure_errors(message: impl Into<String>) -> ErrorMap {
    let mut errors = ErrorMap::new();
    errors.insert(FAILED_KEY.to_string(), vec![message.into()]);
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_errors() -> ErrorMap {
        let mut errors = ErrorMap::new();
        errors.insert("b".to_string(), vec!["y".to_string(), "*z".to_string()]);
        errors.insert("a".to_string(), vec!["x".to_string()]);
        errors
    }

    #[test]
    fn test_output_mode_from_str() {
        assert_eq!("markdown".parse::<OutputMode>().unwrap(), OutputMode::Markdown);
        assert_eq!("confluence".parse::<OutputMode>().unwrap(), OutputMode::Confluence);

        let err = "xml".parse::<OutputMode>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown output mode \"xml\"");
        assert!("Markdown".parse::<OutputMode>().is_err());
    }

    #[test]
    fn test_markdown_row_sorted_and_escaped() {
        let row = errors_to_markdown("f.pdf", "https://h/f.pdf", &sample_errors());
        assert_eq!(row, "|[f.pdf](https://h/f.pdf)|a: x<br>b: y<br>b: \\*z<br>\n");
    }

    #[test]
    fn test_confluence_row_not_escaped() {
        let row = errors_to_confluence("f.pdf", "https://h/f.pdf", &sample_errors());
        assert_eq!(row, "|[f.pdf |https://h/f.pdf]|a: x \\\\b: y \\\\b: *z \\\\\n");
    }

    #[test]
    fn test_rows_without_errors() {
        let errors = ErrorMap::new();
        assert_eq!(
            OutputMode::Markdown.render_row("f.pdf", "u", &errors),
            "|[f.pdf](u)|\n"
        );
        assert_eq!(
            OutputMode::Confluence.render_row("f.pdf", "u", &errors),
            "|[f.pdf |u]|\n"
        );
    }

    #[test]
    fn test_headers() {
        assert_eq!(OutputMode::Markdown.header().lines().count(), 2);
        assert!(OutputMode::Confluence.header().starts_with("|*File*|"));
    }

    #[test]
    fn test_failure_row() {
        let row = OutputMode::Markdown.render_row("f.pdf", "u", &failure_errors("HTTP 404"));
        assert_eq!(row, "|[f.pdf](u)|Failed: HTTP 404<br>\n");
    }
}
