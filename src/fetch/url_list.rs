//! Reading the list of URLs to validate

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::core::check_file_exists;

/// Read a newline-delimited URL list
///
/// Lines are trimmed and blank lines skipped. Order is preserved, since it
/// decides the order of the output table rows.
pub fn read_url_list(path: &Path) -> Result<Vec<String>> {
    check_file_exists(path)?;
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(parse_url_list(&text))
}

/// Split URL list text into URLs
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
