//! Validator configuration, invocation and report parsing

pub mod config;
pub mod report_parser;
pub mod validator;

pub use config::{app_dir, check_file_exists, Config};
pub use report_parser::{parse_report, parse_report_file, ErrorMap, PreflightReport, EXCEPTION_KEY};
pub use validator::{run_preflight, ValidatorRun, LAUNCH_FAILURE};
