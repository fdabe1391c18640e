//! Core types shared by every layer of the service.
//!
//! - [`error`] - the job failure taxonomy and startup error reporting

pub mod error;

pub use error::{ErrorContext, ReportError, user_friendly_error};
