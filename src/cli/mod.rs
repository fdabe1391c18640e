//! Command-line interface for texreport.
//!
//! # Available Commands
//!
//! - `serve` (default) - Run the HTTP service
//! - `render` - Generate one report from a JSON file and write it to disk
//!
//! # Global Options
//!
//! Every service setting can be given as a flag, an environment variable or a
//! key in the `--config` file, in that order of precedence:
//!
//! | Flag                    | Environment                   | Default                     |
//! |-------------------------|-------------------------------|-----------------------------|
//! | `--host`                | `TEXREPORT_HOST`              | `0.0.0.0`                   |
//! | `--port`                | `PORT`                        | `8080`                      |
//! | `--template`            | `TEXREPORT_TEMPLATE`          | `templates/report.tex`      |
//! | `--work-dir`            | `TEXREPORT_WORK_DIR`          | `<temp>/texreport`          |
//! | `--compiler`            | `TEXREPORT_COMPILER`          | `pdflatex`                  |
//! | `--compile-timeout`     | `TEXREPORT_COMPILE_TIMEOUT`   | `120`                       |
//! | `--download-name`       | `TEXREPORT_DOWNLOAD_NAME`     | `AI_Cost_Savings_Report.pdf`|
//! | `--allowed-origin`      | `TEXREPORT_ALLOWED_ORIGINS`   | any origin                  |
//! | `--passthrough-fields`  | `TEXREPORT_PASSTHROUGH_FIELDS`| off                         |
//!
//! plus `--verbose`, `--quiet` and `--config <FILE>`.
//!
//! # Example
//!
//! ```bash
//! # Serve on port 3000 with a custom template
//! PORT=3000 texreport --template ./report.tex
//!
//! # One-off report
//! echo '{"company": "Acme"}' | texreport render - -o acme.pdf
//! ```

mod render;

pub use render::RenderCommand;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::{ConfigOverrides, FileConfig, ServiceConfig};
use crate::server;

/// Service settings shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct ServiceArgs {
    /// Address to listen on
    #[arg(long, env = "TEXREPORT_HOST", global = true)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PORT", global = true)]
    pub port: Option<u16>,

    /// Report template (LaTeX)
    #[arg(long, env = "TEXREPORT_TEMPLATE", value_name = "FILE", global = true)]
    pub template: Option<String>,

    /// Directory for per-job temporary files
    #[arg(long, env = "TEXREPORT_WORK_DIR", value_name = "DIR", global = true)]
    pub work_dir: Option<String>,

    /// LaTeX engine, resolved through PATH
    #[arg(long, env = "TEXREPORT_COMPILER", global = true)]
    pub compiler: Option<String>,

    /// Time limit for each compiler pass
    #[arg(long, env = "TEXREPORT_COMPILE_TIMEOUT", value_name = "SECONDS", global = true)]
    pub compile_timeout: Option<u64>,

    /// Filename offered to clients for the generated PDF
    #[arg(long, env = "TEXREPORT_DOWNLOAD_NAME", value_name = "NAME", global = true)]
    pub download_name: Option<String>,

    /// Origin allowed by CORS (repeatable; none means any origin)
    #[arg(
        long = "allowed-origin",
        env = "TEXREPORT_ALLOWED_ORIGINS",
        value_name = "ORIGIN",
        value_delimiter = ',',
        global = true
    )]
    pub allowed_origins: Vec<String>,

    /// Use every request key made of letters as a placeholder name, instead
    /// of the built-in field table
    #[arg(long, env = "TEXREPORT_PASSTHROUGH_FIELDS", global = true)]
    pub passthrough_fields: bool,
}

impl ServiceArgs {
    /// The explicitly given settings, for layering over the config file.
    #[must_use]
    pub fn into_overrides(self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host,
            port: self.port,
            template: self.template,
            work_dir: self.work_dir,
            compiler: self.compiler,
            compile_timeout: self.compile_timeout,
            download_name: self.download_name,
            allowed_origins: self.allowed_origins,
            passthrough_fields: self.passthrough_fields,
        }
    }
}

/// Main CLI structure for texreport.
#[derive(Parser, Debug)]
#[command(
    name = "texreport",
    about = "Fill a LaTeX report template from JSON and compile it to PDF",
    version,
    long_about = "texreport substitutes request fields into a LaTeX template, compiles it \
                  with an external engine and returns the PDF, removing every temporary \
                  file afterwards."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// TOML configuration file
    #[arg(short, long, env = "TEXREPORT_CONFIG", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    service: ServiceArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP service (default)
    Serve,

    /// Generate a single report and write it to a file
    Render(RenderCommand),
}

impl Cli {
    /// Logging filter: `RUST_LOG` when set, otherwise the verbosity flags.
    #[must_use]
    pub fn log_filter(&self) -> EnvFilter {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return filter;
        }
        EnvFilter::new(self.log_level())
    }

    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }

    /// Installs the global tracing subscriber. Logs go to stderr.
    pub fn init_logging(&self) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(self.log_filter())
            .with_writer(std::io::stderr)
            .with_target(true)
            .try_init();
    }

    /// Resolves the service configuration from flags, environment and file.
    pub fn load_config(&self) -> Result<ServiceConfig> {
        let file = match &self.config {
            Some(path) => Some(FileConfig::load_from(path)?),
            None => None,
        };
        Ok(ServiceConfig::resolve(file, self.service.clone().into_overrides())?)
    }

    /// Runs the selected command.
    pub async fn execute(self) -> Result<()> {
        let config = self.load_config()?;
        tracing::debug!("Resolved configuration: {:?}", config);

        match self.command.unwrap_or(Commands::Serve) {
            Commands::Serve => server::serve(config).await,
            Commands::Render(cmd) => cmd.execute(config).await,
        }
    }
}
