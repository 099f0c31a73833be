//! Preflight Table Library
//!
//! Validate PDFs fetched from a URL list with Apache Preflight and summarize
//! the reported errors as Markdown or Confluence table rows.

pub mod core;
pub mod driver;
pub mod fetch;
pub mod reporting;

pub use crate::core::validator;
pub use crate::fetch::downloader;
pub use crate::reporting::table;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::core::{
        parse_report, parse_report_file, run_preflight, Config, ErrorMap, PreflightReport,
        ValidatorRun, EXCEPTION_KEY, LAUNCH_FAILURE,
    };
    pub use crate::driver::{process_url, run, run_batch, BatchOptions, RunOptions};
    pub use crate::fetch::{download_file, file_name_from_url, read_url_list};
    pub use crate::reporting::{
        errors_to_confluence, errors_to_markdown, write_summary, BatchSummary, FileOutcome,
        OutputMode,
    };
}
