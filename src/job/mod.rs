//! Per-request compilation jobs and their working-area lifecycle.
//!
//! Every request gets a [`CompilationJob`] with a random 128-bit [`JobId`].
//! All files the job produces live in `<work_dir>/<id>/` and are named
//! `<id>.<ext>`, so concurrent jobs never touch the same path and no locking
//! is needed.
//!
//! # Cleanup Guarantee
//!
//! The job directory is removed when the [`CompilationJob`] is dropped. That
//! covers every exit path without explicit cleanup calls:
//!
//! - a failure anywhere in the pipeline drops the job on the error return;
//! - a successful compilation moves the job into a [`CompiledArtifact`],
//!   whose [`DeliveryStream`] drops it when the last byte has been sent;
//! - a client disconnect drops the response body, and with it the stream.
//!
//! # States
//!
//! ```text
//! Created → TemplateLoaded → Substituted → CompiledPass1 → CompiledPass2
//!         → ArtifactVerified → Delivered → CleanedUp
//! ```
//!
//! `Failed` is reachable from any state before `Delivered`.

mod artifact;

pub use artifact::{CompiledArtifact, DeliveryStream};

use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::constants::{ARTIFACT_EXTENSION, SOURCE_EXTENSION};
use crate::core::ReportError;
use crate::utils::fs::{ensure_dir, remove_dir_all, remove_files_except};

/// Collision-resistant identifier of one job (a random v4 UUID).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(Uuid);

impl JobId {
    /// Generates a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// `<id>.<extension>`
    #[must_use]
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{extension}", self.0)
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a job is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Created,
    TemplateLoaded,
    Substituted,
    CompiledPass1,
    CompiledPass2,
    ArtifactVerified,
    Delivered,
    CleanedUp,
    /// Terminal failure, with the diagnostic message.
    Failed(String),
}

impl JobState {
    /// State reached after compiler pass `pass` (1-based) succeeds.
    #[must_use]
    pub const fn after_pass(pass: usize) -> Self {
        if pass <= 1 { Self::CompiledPass1 } else { Self::CompiledPass2 }
    }
}

/// The shared directory under which each job gets its own subdirectory.
#[derive(Debug, Clone)]
pub struct WorkArea {
    root: PathBuf,
}

impl WorkArea {
    /// Creates a work area rooted at `root`. Nothing is created on disk yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
        }
    }

    /// Root directory of the work area.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ensures the root directory exists.
    pub fn prepare(&self) -> anyhow::Result<()> {
        ensure_dir(&self.root)
    }

    /// Allocates a new job. Its directory is created lazily, when the source
    /// file is written, so jobs that fail early leave nothing behind.
    #[must_use]
    pub fn create_job(&self) -> CompilationJob {
        let id = JobId::new();
        let dir = self.root.join(id.to_string());
        tracing::debug!(target: "job", "({}) Created job in {}", id, dir.display());
        CompilationJob {
            id,
            dir,
            state: JobState::Created,
        }
    }
}

/// One request's unit of work. Removes its directory on drop.
#[derive(Debug)]
pub struct CompilationJob {
    id: JobId,
    dir: PathBuf,
    state: JobState,
}

impl CompilationJob {
    /// The job identifier.
    #[must_use]
    pub const fn id(&self) -> &JobId {
        &self.id
    }

    /// The job's private directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &JobState {
        &self.state
    }

    /// File name of the materialized source, relative to [`dir`](Self::dir).
    #[must_use]
    pub fn source_file_name(&self) -> String {
        self.id.file_name(SOURCE_EXTENSION)
    }

    /// Absolute path of the materialized source.
    #[must_use]
    pub fn source_path(&self) -> PathBuf {
        self.dir.join(self.source_file_name())
    }

    /// Absolute path where the compiler writes the artifact.
    #[must_use]
    pub fn artifact_path(&self) -> PathBuf {
        self.dir.join(self.id.file_name(ARTIFACT_EXTENSION))
    }

    /// Creates the job directory.
    pub fn create_dir(&self) -> Result<(), ReportError> {
        ensure_dir(&self.dir).map_err(|e| ReportError::TemplateWriteFailed {
            reason: format!("{e:#}"),
        })
    }

    /// Moves the job to `next`.
    pub fn advance(&mut self, next: JobState) {
        tracing::debug!(target: "job", "({}) {:?} -> {:?}", self.id, self.state, next);
        self.state = next;
    }

    /// Records a terminal failure and logs it with full detail.
    pub fn fail(&mut self, error: &ReportError) {
        tracing::error!(
            target: "job",
            "({}) Failed in state {:?} [{}]: {}",
            self.id,
            self.state,
            error.kind(),
            error
        );
        self.state = JobState::Failed(error.to_string());
    }

    /// Deletes the source, log, auxiliary and any other by-product files,
    /// keeping only the artifact.
    pub fn discard_intermediates(&self) -> anyhow::Result<usize> {
        let removed = remove_files_except(&self.dir, &self.artifact_path())?;
        tracing::debug!(target: "job", "({}) Removed {} intermediate files", self.id, removed);
        Ok(removed)
    }
}

impl Drop for CompilationJob {
    fn drop(&mut self) {
        match &self.state {
            JobState::Delivered | JobState::Failed(_) | JobState::Created => {}
            other => {
                tracing::warn!(
                    target: "job",
                    "({}) Abandoned in state {:?}, removing its files",
                    self.id,
                    other
                );
            }
        }

        if let Err(e) = remove_dir_all(&self.dir) {
            tracing::warn!(target: "job", "({}) Cleanup failed: {:#}", self.id, e);
            return;
        }
        self.advance(JobState::CleanedUp);
        tracing::debug!(target: "job", "({}) Cleaned up {}", self.id, self.dir.display());
    }
}
