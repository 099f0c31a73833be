//! Tool configuration loaded from `config.xml`

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Name of the configuration file expected next to the executable
pub const CONFIG_FILE_NAME: &str = "config.xml";

/// Location of the Preflight application relative to the application directory
pub const DEFAULT_PREFLIGHT_APP: &str = "preflight/preflight-app.jar";

/// Paths to the external tools used to validate PDFs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Java interpreter used to run the validator
    pub java: PathBuf,
    /// Apache Preflight application jar
    pub preflight_app: PathBuf,
}

impl Config {
    /// Load and check the configuration file
    ///
    /// Relative paths inside the file are resolved against the directory
    /// holding it, which is also where the Preflight jar is looked for.
    ///
    /// # Returns
    /// The configuration, with both tool paths confirmed to exist
    pub fn load(config_file: &Path) -> Result<Self> {
        check_file_exists(config_file)?;
        let base_dir = config_file.parent().unwrap_or_else(|| Path::new("."));

        let text = fs::read_to_string(config_file)
            .with_context(|| format!("error reading {}", config_file.display()))?;
        let config = Self::parse(&text, base_dir)
            .with_context(|| format!("error parsing {}", config_file.display()))?;

        check_file_exists(&config.java)?;
        check_file_exists(&config.preflight_app)?;

        Ok(config)
    }

    /// Parse the XML contents of a configuration file without touching the disk
    pub fn parse(text: &str, app_dir: &Path) -> Result<Self> {
        let doc = roxmltree::Document::parse(text)?;
        let root = doc.root_element();

        let java = match child_text(root, "java") {
            Some(java) if !java.is_empty() => java,
            _ => bail!("missing <java> element"),
        };

        let preflight_app = match child_text(root, "preflightApp") {
            Some(app) if !app.is_empty() => resolve(app_dir, app),
            _ => app_dir.join(DEFAULT_PREFLIGHT_APP),
        };

        Ok(Self {
            java: resolve(app_dir, java),
            preflight_app: normalize(&preflight_app),
        })
    }
}

/// Directory containing the running executable
///
/// `config.xml` and the bundled Preflight jar live here.
pub fn app_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("cannot locate the running executable")?;
    let exe = exe.canonicalize().unwrap_or(exe);
    match exe.parent() {
        Some(dir) => Ok(dir.to_path_buf()),
        None => bail!("executable path {} has no parent directory", exe.display()),
    }
}

/// Fail with `<path> does not exist!` unless `path` is an existing file
pub fn check_file_exists(path: &Path) -> Result<()> {
    if !path.is_file() {
        bail!("{} does not exist!", path.display());
    }
    Ok(())
}

fn child_text<'a, 'input>(node: roxmltree::Node<'a, 'input>, tag: &str) -> Option<&'a str> {
    node.children()
        .find(|n| n.has_tag_name(tag))
        .map(|n| n.text().unwrap_or("").trim())
}

fn resolve(app_dir: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&app_dir.join(path))
    }
}

/// Lexically collapse `.` and `..` components
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
