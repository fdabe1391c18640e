//! The optional TOML configuration file.
//!
//! Every key is optional and mirrors a command-line flag:
//!
//! ```toml
//! host = "127.0.0.1"
//! port = 9000
//! template = "~/reports/report.tex"
//! work_dir = "$TMPDIR/texreport"
//! compiler = "xelatex"
//! compile_timeout = 60
//! download_name = "Savings_Report.pdf"
//! allowed_origins = ["https://app.example.com"]
//! passthrough_fields = false
//! ```
//!
//! Unknown keys are rejected so that typos do not silently fall back to
//! defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Contents of a `--config` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub template: Option<String>,
    pub work_dir: Option<String>,
    pub compiler: Option<String>,
    /// Seconds per compiler pass
    pub compile_timeout: Option<u64>,
    pub download_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
    pub passthrough_fields: Option<bool>,
}

/// Parse a TOML configuration file into the specified type.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not match `T`; the
/// message names the file.
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: T = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}

impl FileConfig {
    /// Loads a configuration file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config: Self = parse_config(path)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}
