//! Platform helpers: executable lookup and path expansion.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Resolves an executable name (or explicit path) the way a shell would.
///
/// Bare names are searched on `PATH` (honoring `PATHEXT` on Windows); names
/// containing a separator are checked in place.
#[must_use]
pub fn resolve_command(cmd: &str) -> Option<PathBuf> {
    which::which(cmd).ok()
}

/// Expands `~` and `$VAR` / `${VAR}` references in a configured path.
///
/// # Examples
///
/// ```rust,no_run
/// use texreport::utils::platform::resolve_path;
///
/// # fn example() -> anyhow::Result<()> {
/// let template = resolve_path("~/reports/report.tex")?;
/// let work = resolve_path("$TMPDIR/texreport")?;
/// # Ok(())
/// # }
/// ```
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path)
        .with_context(|| format!("Failed to expand path: {path}"))?;
    Ok(PathBuf::from(expanded.as_ref()))
}
