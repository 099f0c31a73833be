//! Apache Preflight invocation

use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::config::Config;

/// Exit code reported when the validator could not be launched at all
pub const LAUNCH_FAILURE: i32 = -99;

/// Outcome of one validator run
#[derive(Debug, Clone)]
pub struct ValidatorRun {
    /// Exit code of the validator, or [`LAUNCH_FAILURE`]
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// Where stdout was saved
    pub report_path: PathBuf,
    /// Set when the process could not be spawned or waited on
    pub launch_error: Option<String>,
}

impl ValidatorRun {
    /// Synthetic result for a validator that never produced output
    pub fn failure(report_path: PathBuf, message: impl Into<String>) -> Self {
        Self {
            exit_code: LAUNCH_FAILURE,
            stdout: String::new(),
            stderr: String::new(),
            report_path,
            launch_error: Some(message.into()),
        }
    }

    /// Whether the validator ran and its report can be parsed
    pub fn has_report(&self) -> bool {
        self.launch_error.is_none()
    }
}

/// Name of the report written for `file`: `<dir>/<file stem>.xml`
pub fn report_path_for(file: &Path, dir: &Path) -> PathBuf {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    dir.join(format!("{}.xml", stem))
}

/// Build the Preflight command line for a PDF
pub fn preflight_command(config: &Config, pdf: &Path) -> Command {
    let mut cmd = Command::new(&config.java);
    cmd.arg("-jar").arg(&config.preflight_app).arg("xml").arg(pdf);
    cmd
}

/// Run Preflight on a PDF and save its XML report next to it
///
/// Launch failures do not propagate: they come back as a [`ValidatorRun`]
/// with exit code [`LAUNCH_FAILURE`] and `launch_error` set, and no report
/// is written.
///
/// # Arguments
/// * `pdf` - Path to the downloaded PDF
/// * `config` - Java and Preflight locations
/// * `out_dir` - Directory for the report file
///
/// # Returns
/// Error only if the report file cannot be written
pub fn run_preflight(pdf: &Path, config: &Config, out_dir: &Path) -> Result<ValidatorRun> {
    let report_path = report_path_for(pdf, out_dir);

    let mut cmd = preflight_command(config, pdf);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    debug!("Running {:?}", cmd);

    let output = match cmd.output() {
        Ok(output) => output,
        Err(e) => {
            return Ok(ValidatorRun::failure(
                report_path,
                format!("Error running Preflight: {}", e),
            ));
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    // Killed by a signal
    let exit_code = output.status.code().unwrap_or(-1);

    fs::write(&report_path, &stdout)
        .with_context(|| format!("Failed to write report {}", report_path.display()))?;

    debug!(
        "Preflight exited with {} for {:?} ({} bytes of report)",
        exit_code,
        pdf,
        stdout.len()
    );

    Ok(ValidatorRun {
        exit_code,
        stdout,
        stderr,
        report_path,
        launch_error: None,
    })
}
