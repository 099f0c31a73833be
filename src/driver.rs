//! Sequential batch driver: download, validate, parse and render each URL

use anyhow::{bail, Result};
use indicatif::ProgressBar;
use log::{debug, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::core::config::{app_dir, CONFIG_FILE_NAME};
use crate::core::{parse_report_file, run_preflight, Config};
use crate::fetch::{compute_file_hash, download_file, file_name_from_url, read_url_list};
use crate::reporting::{failure_errors, BatchSummary, FileOutcome, OutputMode};

/// Everything needed to start a run, before any of it has been checked
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Newline-delimited URL list
    pub input: PathBuf,
    /// `markdown` or `confluence`
    pub output_mode: String,
    /// Overrides `config.xml` next to the executable
    pub config_file: Option<PathBuf>,
    /// Where downloads and reports are written
    pub work_dir: PathBuf,
    /// Record per-URL failures and carry on instead of aborting
    pub keep_going: bool,
}

/// Checked settings for the per-URL loop
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub mode: OutputMode,
    pub work_dir: PathBuf,
    pub keep_going: bool,
}

/// Check the inputs, then validate every URL and stream the table to `out`
///
/// The output mode, input file and configuration are all checked before
/// anything is written, so a bad invocation never produces a header.
pub fn run<W: Write>(
    options: &RunOptions,
    out: &mut W,
    progress: &ProgressBar,
    shutdown: &AtomicBool,
) -> Result<BatchSummary> {
    let mode: OutputMode = options.output_mode.parse()?;

    let urls = read_url_list(&options.input)?;

    let config_file = match &options.config_file {
        Some(path) => path.clone(),
        None => app_dir()?.join(CONFIG_FILE_NAME),
    };
    let config = Config::load(&config_file)?;
    debug!("Using {:?}", config);

    let batch = BatchOptions {
        mode,
        work_dir: options.work_dir.clone(),
        keep_going: options.keep_going,
    };

    progress.set_length(urls.len() as u64);
    run_batch(&urls, &config, &batch, out, progress, shutdown)
}

/// Write the header, then one row per URL, in list order
///
/// Without `keep_going` the first failing URL aborts the batch. With it, the
/// failure is rendered into that URL's row and recorded in the summary.
pub fn run_batch<W: Write>(
    urls: &[String],
    config: &Config,
    options: &BatchOptions,
    out: &mut W,
    progress: &ProgressBar,
    shutdown: &AtomicBool,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary::new(options.mode, urls.len());

    out.write_all(options.mode.header().as_bytes())?;
    out.flush()?;

    for url in urls {
        if shutdown.load(Ordering::SeqCst) {
            warn!("Stopping after {} of {} URLs", summary.processed, urls.len());
            summary.finish(true);
            return Ok(summary);
        }

        progress.set_message(url.clone());

        let outcome = match process_url(url, config, &options.work_dir) {
            Ok(outcome) => outcome,
            Err(e) if options.keep_going => {
                warn!("{}: {:#}", url, e);
                FileOutcome {
                    url: url.clone(),
                    file: file_name_from_url(url).unwrap_or_default(),
                    failure: Some(format!("{:#}", e)),
                    ..Default::default()
                }
            }
            Err(e) => return Err(e),
        };

        let row = match &outcome.failure {
            Some(message) => options.mode.render_row(
                display_name(&outcome),
                url,
                &failure_errors(message.as_str()),
            ),
            None => options.mode.render_row(&outcome.file, url, &outcome.errors),
        };
        out.write_all(row.as_bytes())?;
        out.flush()?;

        summary.record(outcome);
        progress.inc(1);
    }

    summary.finish(false);
    info!(
        "Processed {} URL(s), {} failed",
        summary.processed, summary.failed
    );
    Ok(summary)
}

/// Download one URL, run Preflight on it and collect its errors
pub fn process_url(url: &str, config: &Config, work_dir: &Path) -> Result<FileOutcome> {
    let file = file_name_from_url(url)?;
    let pdf = download_file(url, work_dir)?;

    let sha256 = match compute_file_hash(&pdf) {
        Ok(hash) => Some(hash),
        Err(e) => {
            warn!("Could not hash {:?}: {}", pdf, e);
            None
        }
    };

    let run = run_preflight(&pdf, config, work_dir)?;
    if !run.has_report() {
        bail!("{}", run.launch_error.as_deref().unwrap_or("Preflight produced no report"));
    }
    if !run.stderr.trim().is_empty() {
        debug!("Preflight stderr for {}: {}", file, run.stderr.trim());
    }

    let report = parse_report_file(&run.report_path)?;

    Ok(FileOutcome {
        url: url.to_string(),
        file,
        sha256,
        exit_code: Some(run.exit_code),
        is_valid: report.is_valid,
        profile: report.profile,
        errors: report.errors,
        failure: None,
    })
}

fn display_name(outcome: &FileOutcome) -> &str {
    if outcome.file.is_empty() {
        &outcome.url
    } else {
        &outcome.file
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn options(temp_dir: &TempDir, mode: &str) -> RunOptions {
        RunOptions {
            input: temp_dir.path().join("urls.txt"),
            output_mode: mode.to_string(),
            config_file: Some(temp_dir.path().join(CONFIG_FILE_NAME)),
            work_dir: temp_dir.path().to_path_buf(),
            keep_going: false,
        }
    }

    #[test]
    fn test_unknown_mode_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let mut out = Vec::new();

        let err = run(
            &options(&temp_dir, "xml"),
            &mut out,
            &ProgressBar::hidden(),
            &AtomicBool::new(false),
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "Unknown output mode \"xml\"");
        assert!(out.is_empty());
    }

    #[test]
    fn test_missing_input_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let mut out = Vec::new();

        let err = run(
            &options(&temp_dir, "markdown"),
            &mut out,
            &ProgressBar::hidden(),
            &AtomicBool::new(false),
        )
        .unwrap_err();

        assert!(err.to_string().contains("urls.txt does not exist!"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_missing_config_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("urls.txt"), "https://h/a.pdf\n").unwrap();
        let mut out = Vec::new();

        let err = run(
            &options(&temp_dir, "confluence"),
            &mut out,
            &ProgressBar::hidden(),
            &AtomicBool::new(false),
        )
        .unwrap_err();

        assert!(err.to_string().contains("config.xml does not exist!"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_shutdown_before_first_url() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            java: temp_dir.path().join("java"),
            preflight_app: temp_dir.path().join("preflight-app.jar"),
        };
        let batch = BatchOptions {
            mode: OutputMode::Markdown,
            work_dir: temp_dir.path().to_path_buf(),
            keep_going: false,
        };
        let urls = vec!["https://h/a.pdf".to_string()];
        let mut out = Vec::new();

        let summary = run_batch(
            &urls,
            &config,
            &batch,
            &mut out,
            &ProgressBar::hidden(),
            &AtomicBool::new(true),
        )
        .unwrap();

        assert!(summary.interrupted);
        assert_eq!(summary.processed, 0);
        assert_eq!(String::from_utf8(out).unwrap(), OutputMode::Markdown.header());
    }

    #[test]
    fn test_keep_going_renders_failure_row() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            java: temp_dir.path().join("java"),
            preflight_app: temp_dir.path().join("preflight-app.jar"),
        };
        let batch = BatchOptions {
            mode: OutputMode::Confluence,
            work_dir: temp_dir.path().to_path_buf(),
            keep_going: true,
        };
        // No file name segment, fails before any network access
        let urls = vec!["https://h/docs/".to_string()];
        let mut out = Vec::new();

        let summary = run_batch(
            &urls,
            &config,
            &batch,
            &mut out,
            &ProgressBar::hidden(),
            &AtomicBool::new(false),
        )
        .unwrap();

        assert_eq!(summary.failed, 1);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("|[https://h/docs/ |https://h/docs/]|Failed: cannot derive a file name"));
    }
}
