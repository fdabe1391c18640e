//! Read-only access to the report template on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::ReportError;

/// Raw template markup as read from disk.
///
/// Cheap to clone; the text is never mutated. Substitution produces a
/// separate [`MaterializedDocument`](super::MaterializedDocument).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDocument {
    text: Arc<str>,
}

impl TemplateDocument {
    /// Wraps template text.
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self {
            text: text.into(),
        }
    }

    /// The raw markup.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Loads the template from a fixed path.
///
/// The file is read on every request, so edits to the template take effect
/// without a restart and the store holds no mutable state.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    path: PathBuf,
}

impl TemplateStore {
    /// Creates a store for the template at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
        }
    }

    /// Path the template is read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the template.
    ///
    /// # Errors
    ///
    /// [`ReportError::TemplateUnreadable`] when the file is missing, unreadable
    /// or not valid UTF-8.
    pub async fn load(&self) -> Result<TemplateDocument, ReportError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => {
                tracing::debug!(
                    target: "templating",
                    "Loaded template {} ({} bytes)",
                    self.path.display(),
                    text.len()
                );
                Ok(TemplateDocument::new(text))
            }
            Err(e) => {
                tracing::error!(
                    target: "templating",
                    "Error reading template {}: {}",
                    self.path.display(),
                    e
                );
                Err(ReportError::TemplateUnreadable {
                    path: self.path.display().to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }
}
