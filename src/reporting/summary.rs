//! Run summary: JSON record of a batch and the trailing failure list

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use super::table::OutputMode;
use crate::core::ErrorMap;

/// What happened to one URL
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileOutcome {
    pub url: String,
    /// Local file name, empty if none could be derived
    pub file: String,
    pub sha256: Option<String>,
    pub exit_code: Option<i32>,
    pub is_valid: Option<bool>,
    pub profile: Option<String>,
    pub errors: ErrorMap,
    /// Why the URL could not be processed
    pub failure: Option<String>,
}

impl FileOutcome {
    pub fn failed(&self) -> bool {
        self.failure.is_some()
    }
}

/// Record of a whole batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub mode: OutputMode,
    /// Seconds since the Unix epoch
    pub started: u64,
    pub finished: u64,
    pub total_urls: usize,
    pub processed: usize,
    pub failed: usize,
    /// Set when Ctrl-C stopped the batch early
    pub interrupted: bool,
    pub files: Vec<FileOutcome>,
}

impl BatchSummary {
    pub fn new(mode: OutputMode, total_urls: usize) -> Self {
        Self {
            mode,
            started: unix_now(),
            finished: 0,
            total_urls,
            processed: 0,
            failed: 0,
            interrupted: false,
            files: Vec::new(),
        }
    }

    /// Add the outcome of one URL
    pub fn record(&mut self, outcome: FileOutcome) {
        self.processed += 1;
        if outcome.failed() {
            self.failed += 1;
        }
        self.files.push(outcome);
    }

    pub fn finish(&mut self, interrupted: bool) {
        self.finished = unix_now();
        self.interrupted = interrupted;
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files.iter().filter(|f| f.failed())
    }
}

/// Save the summary as pretty-printed JSON
pub fn write_summary(path: &Path, summary: &BatchSummary) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create summary file {}", path.display()))?;
    serde_json::to_writer_pretty(file, summary).context("Failed to write summary file")?;
    Ok(())
}

/// List failed URLs, one per line, after a `--keep-going` run
pub fn write_failure_summary<W: Write>(out: &mut W, summary: &BatchSummary) -> Result<()> {
    if summary.failed == 0 {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "Failed URLs: {} of {}", summary.failed, summary.processed)?;
    writeln!(out, "--------------")?;
    for outcome in summary.failures() {
        writeln!(
            out,
            "  {}: {}",
            outcome.url,
            outcome.failure.as_deref().unwrap_or_default()
        )?;
    }
    Ok(())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
