//! Retrieving the PDFs to validate

pub mod downloader;
pub mod file_hash;
pub mod url_list;

pub use downloader::{download_file, file_name_from_url, looks_like_pdf};
pub use file_hash::compute_file_hash;
pub use url_list::{parse_url_list, read_url_list};
