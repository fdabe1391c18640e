//! Global constants used throughout the texreport codebase.
//!
//! Timeouts, file names and defaults that more than one module needs.
//! Defining them centrally keeps the CLI defaults, the config loader and the
//! tests in agreement.

use std::time::Duration;

/// Number of compiler passes per job.
///
/// LaTeX resolves cross-references (page numbers, `\ref`, table of contents)
/// from the `.aux` file written by the previous run, so a single pass may
/// leave `??` markers in the output.
pub const COMPILE_PASSES: usize = 2;

/// Default per-pass timeout for the external compiler (120 seconds).
pub const DEFAULT_COMPILE_TIMEOUT: Duration = Duration::from_secs(120);

/// Default compiler executable, resolved through `PATH`.
pub const DEFAULT_COMPILER: &str = "pdflatex";

/// Default location of the report template, relative to the process directory.
pub const DEFAULT_TEMPLATE_PATH: &str = "templates/report.tex";

/// Filename offered to the client in `Content-Disposition`.
pub const DEFAULT_DOWNLOAD_NAME: &str = "AI_Cost_Savings_Report.pdf";

/// Default listen address.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listen port when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 8080;

/// Name of the per-service subdirectory created under the system temp dir.
pub const WORK_DIR_NAME: &str = "texreport";

/// Extension of the materialized source file.
pub const SOURCE_EXTENSION: &str = "tex";

/// Extension of the compiled artifact.
pub const ARTIFACT_EXTENSION: &str = "pdf";

/// Content type of the compiled artifact.
pub const ARTIFACT_CONTENT_TYPE: &str = "application/pdf";
