//! File system helpers for job working areas.
//!
//! These are synchronous on purpose: they run from `Drop` implementations,
//! where no async context is available, and only ever touch a handful of
//! small files inside one job directory.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::Path;

/// Ensures a directory exists, creating it and all parent directories if necessary.
///
/// # Errors
///
/// Fails if the path exists but is not a directory, or creation fails.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).with_context(|| {
            format!(
                "Failed to create directory: {}\n\nCheck directory permissions and path validity",
                path.display()
            )
        })?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }
    Ok(())
}

/// Removes a directory tree. A directory that is already gone is not an error,
/// since another cleanup path may have won the race.
pub fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            Err(e).with_context(|| format!("Failed to remove directory: {}", path.display()))
        }
    }
}

/// Removes every regular file in `dir` except `keep`.
///
/// Returns the number of files removed. Subdirectories are left alone; a
/// later [`remove_dir_all`] takes care of them.
pub fn remove_files_except(dir: &Path, keep: &Path) -> Result<usize> {
    let mut removed = 0;
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read entry in {}", dir.display()))?;
        let path = entry.path();
        if path == keep || !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to remove file: {}", path.display()));
            }
        }
    }

    Ok(removed)
}
