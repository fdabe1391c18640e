//! Cross-platform utilities and helpers
//!
//! - [`fs`] - Directory creation and tolerant removal for job working areas
//! - [`platform`] - Executable lookup and path expansion

pub mod fs;
pub mod platform;

pub use fs::{ensure_dir, remove_dir_all, remove_files_except};
pub use platform::{resolve_command, resolve_path};
