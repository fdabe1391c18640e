//! Error handling for texreport
//!
//! Two layers, mirroring how the service is used:
//! 1. [`ReportError`] is the strongly-typed failure of one report job. Every
//!    variant is terminal for its request and maps to an HTTP status.
//! 2. [`ErrorContext`] wraps startup failures (bad configuration, port in use,
//!    missing compiler) with a suggestion for the operator reading the terminal.
//!
//! # Error Categories
//!
//! - **Template**: [`ReportError::TemplateUnreadable`]
//! - **Toolchain**: [`ReportError::CompilerUnavailable`], [`ReportError::CompilerTimedOut`]
//! - **Working area**: [`ReportError::TemplateWriteFailed`]
//! - **Compilation**: [`ReportError::CompilationFailed`], [`ReportError::ArtifactMissing`]
//! - **Delivery**: [`ReportError::DeliveryFailed`]
//! - **Boundary**: [`ReportError::InvalidRequest`], [`ReportError::InvalidConfig`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use texreport::core::{ReportError, user_friendly_error};
//!
//! let error = ReportError::CompilerUnavailable {
//!     program: "pdflatex".to_string(),
//! };
//! assert_eq!(error.status_code(), 500);
//!
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Failure of a single report job.
///
/// The `Display` text of each variant is what the client receives in the
/// `error` field of the JSON response, so messages carry the diagnostic the
/// caller needs (for compilation failures, the compiler's own output).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// The template file is missing or cannot be read.
    #[error("Could not read template file: {reason}")]
    TemplateUnreadable {
        /// Path of the template that was requested
        path: String,
        /// Underlying I/O error
        reason: String,
    },

    /// The external compiler cannot be resolved on `PATH`.
    #[error("PDF compiler '{program}' is not installed or not found in PATH")]
    CompilerUnavailable {
        /// Program name or path that failed to resolve
        program: String,
    },

    /// The job directory or source file could not be written.
    #[error("Could not write temporary file: {reason}")]
    TemplateWriteFailed {
        /// Underlying I/O error
        reason: String,
    },

    /// The compiler exited with a non-zero status.
    #[error("PDF generation failed: {diagnostic}")]
    CompilationFailed {
        /// 1-based compiler pass that failed
        pass: usize,
        /// Captured error output of the compiler
        diagnostic: String,
    },

    /// A compiler pass exceeded its execution-time bound and was killed.
    #[error("PDF generation timed out after {seconds} seconds (pass {pass})")]
    CompilerTimedOut {
        /// 1-based compiler pass that timed out
        pass: usize,
        /// Configured per-pass timeout
        seconds: u64,
    },

    /// Every pass reported success but the output file does not exist.
    #[error("PDF file was not created: artifact not produced")]
    ArtifactMissing,

    /// The artifact could not be opened or streamed to the caller.
    #[error("Could not deliver PDF: {reason}")]
    DeliveryFailed {
        /// Underlying I/O error
        reason: String,
    },

    /// The request body is not a JSON object of fields.
    #[error("Invalid request body: {reason}")]
    InvalidRequest {
        /// Why the body was rejected
        reason: String,
    },

    /// Startup configuration is unusable.
    #[error("Configuration error: {message}")]
    InvalidConfig {
        /// Description of the problem
        message: String,
    },
}

impl ReportError {
    /// HTTP status used when this error is surfaced to a client.
    ///
    /// Every job failure is a server error; only a malformed body is the
    /// caller's fault.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidRequest {
                ..
            } => 400,
            _ => 500,
        }
    }

    /// Stable machine-readable name of the failure category, used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::TemplateUnreadable {
                ..
            } => "template_unreadable",
            Self::CompilerUnavailable {
                ..
            } => "compiler_unavailable",
            Self::TemplateWriteFailed {
                ..
            } => "template_write_failed",
            Self::CompilationFailed {
                ..
            } => "compilation_failed",
            Self::CompilerTimedOut {
                ..
            } => "compiler_timed_out",
            Self::ArtifactMissing => "artifact_missing",
            Self::DeliveryFailed {
                ..
            } => "delivery_failed",
            Self::InvalidRequest {
                ..
            } => "invalid_request",
            Self::InvalidConfig {
                ..
            } => "invalid_config",
        }
    }
}

/// Error wrapper with an operator-facing suggestion and optional details.
///
/// Used by `main` to print fatal startup errors in color.
#[derive(Debug)]
pub struct ErrorContext {
    /// The primary error message
    pub message: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context from any displayable error.
    pub fn new(error: impl fmt::Display) -> Self {
        Self {
            message: error.to_string(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining why the error occurred.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: message in red, details in yellow,
    /// suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any startup error into an [`ErrorContext`] with a suggestion.
///
/// Recognizes [`ReportError`] and common I/O failures anywhere in the
/// `anyhow` chain; everything else is reported with its full chain as details.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(report_error) = error.downcast_ref::<ReportError>() {
        return create_error_context(report_error);
    }

    for cause in error.chain() {
        if let Some(io_error) = cause.downcast_ref::<std::io::Error>() {
            match io_error.kind() {
                std::io::ErrorKind::AddrInUse => {
                    return ErrorContext::new(&error)
                        .with_suggestion("Another process is using this port; pass a different --port or set PORT")
                        .with_details(io_error.to_string());
                }
                std::io::ErrorKind::PermissionDenied => {
                    return ErrorContext::new(&error)
                        .with_suggestion("Check permissions of the work directory and template file, or bind a port above 1024")
                        .with_details(io_error.to_string());
                }
                _ => {}
            }
        }
    }

    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    let ctx = ErrorContext::new(&error);
    if chain.is_empty() {
        ctx
    } else {
        ctx.with_details(chain.join(": "))
    }
}

fn create_error_context(error: &ReportError) -> ErrorContext {
    match error {
        ReportError::CompilerUnavailable {
            program,
        } => ErrorContext::new(error)
            .with_suggestion(format!(
                "Install a TeX distribution that provides '{program}' (e.g. TeX Live), or point --compiler at it"
            ))
            .with_details("Reports are compiled by an external LaTeX engine resolved through PATH"),
        ReportError::TemplateUnreadable {
            path, ..
        } => ErrorContext::new(error)
            .with_suggestion(format!("Check that '{path}' exists or pass --template"))
            .with_details("The template is read from disk on every request"),
        ReportError::InvalidConfig {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Review the --config file and TEXREPORT_* environment variables"),
        _ => ErrorContext::new(error),
    }
}
