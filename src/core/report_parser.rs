//! Preflight XML report parsing

use anyhow::{Context, Result};
use log::warn;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Key under which exception messages are collected
pub const EXCEPTION_KEY: &str = "Exception";

/// Error code -> detail messages, in report order
///
/// Keys iterate in lexicographic order, which is the order table rows list them.
pub type ErrorMap = BTreeMap<String, Vec<String>>;

/// What a Preflight report says about one file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreflightReport {
    /// Value of `<isValid>`, if the report has one
    pub is_valid: Option<bool>,
    /// `type` attribute of `<isValid>`, e.g. `PDF/A1-b`
    pub profile: Option<String>,
    pub errors: ErrorMap,
}

/// Read and parse a report file
pub fn parse_report_file(path: &Path) -> Result<PreflightReport> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read report {}", path.display()))?;
    parse_report(&text).with_context(|| format!("Unexpected error parsing {}", path.display()))
}

/// Parse the text of a Preflight report
///
/// Only direct children of the root are inspected: `<exceptionThrown>`
/// (its `<message>` children) and `<errors>` (children with `<code>` and
/// `<details>`). Both are optional.
pub fn parse_report(xml: &str) -> Result<PreflightReport> {
    let doc = roxmltree::Document::parse(xml)?;
    let root = doc.root_element();

    let mut errors = ErrorMap::new();
    let mut exceptions = Vec::new();
    let mut report = PreflightReport::default();

    for section in root.children().filter(|n| n.is_element()) {
        match section.tag_name().name() {
            "exceptionThrown" => {
                for message in section.children().filter(|n| n.has_tag_name("message")) {
                    exceptions.push(raw_text(message));
                }
            }
            "errors" => {
                for error in section.children().filter(|n| n.is_element()) {
                    let code = error.children().find(|n| n.has_tag_name("code"));
                    let details = error.children().find(|n| n.has_tag_name("details"));

                    let Some(code) = code else {
                        warn!("Skipping <{}> without <code>", error.tag_name().name());
                        continue;
                    };

                    errors
                        .entry(text_of(code))
                        .or_default()
                        .push(details.map(raw_text).unwrap_or_default());
                }
            }
            "isValid" => {
                report.is_valid = match text_of(section).as_str() {
                    "true" => Some(true),
                    "false" => Some(false),
                    _ => None,
                };
                report.profile = section.attribute("type").map(str::to_owned);
            }
            _ => {}
        }
    }

    if !exceptions.is_empty() {
        errors.insert(EXCEPTION_KEY.to_string(), exceptions);
    }

    report.errors = errors;
    Ok(report)
}

fn text_of(node: roxmltree::Node) -> String {
    node.text().unwrap_or("").trim().to_string()
}

/// Message text exactly as Preflight wrote it
fn raw_text(node: roxmltree::Node) -> String {
    node.text().unwrap_or("").to_string()
}
