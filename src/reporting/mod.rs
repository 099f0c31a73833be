//! Table rendering and run summaries

pub mod summary;
pub mod table;

pub use summary::{write_failure_summary, write_summary, BatchSummary, FileOutcome};
pub use table::{errors_to_confluence, errors_to_markdown, failure_errors, OutputMode};
