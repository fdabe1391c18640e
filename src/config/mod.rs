//! Service configuration.
//!
//! Settings come from three layers, highest precedence first:
//!
//! 1. command-line flags and their environment variables (`PORT`,
//!    `TEXREPORT_*`), collected by the CLI into [`ConfigOverrides`];
//! 2. the optional `--config` TOML file ([`FileConfig`]);
//! 3. built-in defaults from [`crate::constants`].
//!
//! [`ServiceConfig::resolve`] merges the layers once at startup, expands `~`
//! and `$VAR` in paths and validates the result. The resolved configuration
//! is immutable for the life of the process.
//!
//! # Modules
//!
//! - `file` - TOML file format and parsing

mod file;

pub use file::{FileConfig, parse_config};

use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    ARTIFACT_EXTENSION, DEFAULT_COMPILE_TIMEOUT, DEFAULT_COMPILER, DEFAULT_DOWNLOAD_NAME,
    DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TEMPLATE_PATH, WORK_DIR_NAME,
};
use crate::core::ReportError;
use crate::templating::{FieldMapping, PlaceholderTable};
use crate::utils::platform::resolve_path;

/// Values given explicitly on the command line or through the environment.
///
/// `None` (or an empty list, or `false`) means "not given" and lets the
/// lower layers decide.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub template: Option<String>,
    pub work_dir: Option<String>,
    pub compiler: Option<String>,
    pub compile_timeout: Option<u64>,
    pub download_name: Option<String>,
    pub allowed_origins: Vec<String>,
    pub passthrough_fields: bool,
}

/// Fully resolved, validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub template_path: PathBuf,
    /// Parent of all per-job directories
    pub work_dir: PathBuf,
    pub compiler: String,
    /// Bound on each compiler pass
    pub compile_timeout: Duration,
    /// Filename offered in `Content-Disposition`
    pub download_name: String,
    /// CORS allow-list; empty allows any origin
    pub allowed_origins: Vec<String>,
    pub passthrough_fields: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            work_dir: default_work_dir(),
            compiler: DEFAULT_COMPILER.to_string(),
            compile_timeout: DEFAULT_COMPILE_TIMEOUT,
            download_name: DEFAULT_DOWNLOAD_NAME.to_string(),
            allowed_origins: Vec::new(),
            passthrough_fields: false,
        }
    }
}

/// `<system temp>/texreport`
#[must_use]
pub fn default_work_dir() -> PathBuf {
    std::env::temp_dir().join(WORK_DIR_NAME)
}

impl ServiceConfig {
    /// Merges overrides over the file over defaults, then validates.
    ///
    /// # Errors
    ///
    /// [`ReportError::InvalidConfig`] if a path cannot be expanded or a value
    /// fails [`validate`](Self::validate).
    pub fn resolve(file: Option<FileConfig>, overrides: ConfigOverrides) -> Result<Self, ReportError> {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        let template_path = match overrides.template.or(file.template) {
            Some(path) => expand(&path)?,
            None => defaults.template_path,
        };
        let work_dir = match overrides.work_dir.or(file.work_dir) {
            Some(path) => expand(&path)?,
            None => defaults.work_dir,
        };
        let allowed_origins = if overrides.allowed_origins.is_empty() {
            file.allowed_origins.unwrap_or(defaults.allowed_origins)
        } else {
            overrides.allowed_origins
        };

        let config = Self {
            host: overrides.host.or(file.host).unwrap_or(defaults.host),
            port: overrides.port.or(file.port).unwrap_or(defaults.port),
            template_path,
            work_dir,
            compiler: overrides.compiler.or(file.compiler).unwrap_or(defaults.compiler),
            compile_timeout: overrides
                .compile_timeout
                .or(file.compile_timeout)
                .map_or(defaults.compile_timeout, Duration::from_secs),
            download_name: overrides.download_name.or(file.download_name).unwrap_or(defaults.download_name),
            allowed_origins: allowed_origins
                .into_iter()
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            passthrough_fields: overrides.passthrough_fields || file.passthrough_fields.unwrap_or(false),
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks values that would otherwise fail at request time.
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.port == 0 {
            return Err(invalid("port must be between 1 and 65535"));
        }
        if self.compile_timeout.is_zero() {
            return Err(invalid("compile timeout must be at least 1 second"));
        }
        if self.compiler.trim().is_empty() {
            return Err(invalid("compiler must not be empty"));
        }

        let suffix = format!(".{ARTIFACT_EXTENSION}");
        let name = &self.download_name;
        if name.len() <= suffix.len() || !name.to_ascii_lowercase().ends_with(&suffix) {
            return Err(invalid(format!("download name '{name}' must end in {suffix}")));
        }
        // Goes into a quoted header value
        if name.chars().any(|c| c == '"' || c == '\\' || c.is_control()) {
            return Err(invalid(format!("download name '{name}' contains characters not allowed in a filename")));
        }

        for origin in &self.allowed_origins {
            if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                return Err(invalid(format!("allowed origin '{origin}' must start with http:// or https://")));
            }
        }

        Ok(())
    }

    /// Field mapping policy for the substitutor.
    #[must_use]
    pub fn field_mapping(&self) -> FieldMapping {
        if self.passthrough_fields {
            FieldMapping::Passthrough
        } else {
            FieldMapping::AllowList(PlaceholderTable::report_defaults())
        }
    }

    /// `(host, port)` pair suitable for `TcpListener::bind`.
    #[must_use]
    pub fn listen_address(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

fn expand(path: &str) -> Result<PathBuf, ReportError> {
    resolve_path(path).map_err(|e| invalid(format!("{e:#}")))
}

fn invalid(message: impl Into<String>) -> ReportError {
    ReportError::InvalidConfig {
        message: message.into(),
    }
}
