use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use preflight_table::driver::{run, RunOptions};
use preflight_table::reporting::{write_failure_summary, write_summary};

#[derive(Parser)]
#[command(name = "preflight-table")]
#[command(
    about = "Analyse PDFs at user-defined URLs with Apache Preflight and report results as a Markdown or Confluence table",
    long_about = None
)]
struct Cli {
    /// Input file, each line contains a URL that points to a PDF
    input: PathBuf,

    /// Output mode, allowed values are 'markdown' or 'confluence'
    output_mode: String,

    /// Configuration file (default: config.xml next to the executable)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for downloaded PDFs and Preflight reports
    #[arg(short = 'd', long, default_value = ".")]
    work_dir: PathBuf,

    /// Keep processing after a URL fails and list failures at the end
    #[arg(long)]
    keep_going: bool,

    /// Write a JSON summary of the run
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Run in batch mode (no progress bar)
    #[arg(long)]
    batch: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match try_main(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn try_main(cli: Cli) -> Result<ExitCode> {
    // Set up graceful shutdown handler
    let shutdown_requested = Arc::new(AtomicBool::new(false));
    let shutdown_flag = shutdown_requested.clone();

    ctrlc::set_handler(move || {
        eprintln!("\nShutdown requested. Finishing current file...");
        shutdown_flag.store(true, Ordering::SeqCst);
    })
    .context("Error setting Ctrl-C handler")?;

    // Progress goes to stderr, the table to stdout
    let progress = if cli.batch {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}")
                .context("Invalid progress bar template")?
                .progress_chars("#>-"),
        );
        pb
    };

    let options = RunOptions {
        input: cli.input,
        output_mode: cli.output_mode,
        config_file: cli.config,
        work_dir: cli.work_dir,
        keep_going: cli.keep_going,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = run(&options, &mut out, &progress, &shutdown_requested);
    progress.finish_and_clear();
    let summary = summary?;

    if summary.interrupted {
        eprintln!(
            "Graceful shutdown complete: processed {}/{} URLs",
            summary.processed, summary.total_urls
        );
    }

    write_failure_summary(&mut io::stderr(), &summary)?;

    if let Some(path) = &cli.summary {
        write_summary(path, &summary)?;
    }

    if summary.failed > 0 || summary.interrupted {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
