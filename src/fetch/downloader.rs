//! Downloading PDFs named by URL

use anyhow::{bail, Context, Result};
use log::{debug, warn};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

const USER_AGENT: &str = concat!("preflight-table/", env!("CARGO_PKG_VERSION"));

/// Upper bound on the buffer reserved from a `Content-Length` header
const MAX_PREALLOC: usize = 16 * 1024 * 1024;

/// Local file name for a URL: everything after the last `/`
///
/// Only meaningful when the URL ends in a file name. A query-driven endpoint
/// such as `get.php?id=3` yields `get.php?id=3`.
pub fn file_name_from_url(url: &str) -> Result<String> {
    let name = url.rsplit('/').next().unwrap_or("");
    if name.is_empty() || name == "." || name == ".." {
        bail!("cannot derive a file name from URL {}", url);
    }
    Ok(name.to_string())
}

/// Fetch the body of a URL with HTTP GET
///
/// # Returns
/// The URL the data was finally served from (after redirects) and the body
pub fn http_get_bytes(url: &str) -> Result<(String, Vec<u8>)> {
    let resp = ureq::get(url)
        .set("User-Agent", USER_AGENT)
        .call()
        .with_context(|| format!("Failed to fetch {}", url))?;

    let final_url = resp.get_url().to_string();
    let len = resp
        .header("Content-Length")
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(0)
        .min(MAX_PREALLOC);

    let mut data: Vec<u8> = Vec::with_capacity(len);
    resp.into_reader()
        .read_to_end(&mut data)
        .with_context(|| format!("Failed to read response body from {}", url))?;

    Ok((final_url, data))
}

/// Download a URL into `dir`, named after the URL's last path segment
///
/// An existing file of the same name is overwritten.
///
/// # Returns
/// Path of the saved file
pub fn download_file(url: &str, dir: &Path) -> Result<PathBuf> {
    let file_name = file_name_from_url(url)?;
    let (final_url, data) = http_get_bytes(url)?;

    if final_url != url {
        debug!("{} redirected to {}", url, final_url);
    }
    if !looks_like_pdf(&data) {
        warn!("{} does not start with a PDF header", url);
    }

    let path = dir.join(&file_name);
    let mut file = File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(&data)?;
    file.flush()?;

    debug!("Saved {} bytes to {:?}", data.len(), path);
    Ok(path)
}

/// Check for the `%PDF-` magic bytes
pub fn looks_like_pdf(data: &[u8]) -> bool {
    data.starts_with(b"%PDF-")
}
