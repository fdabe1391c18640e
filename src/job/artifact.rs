//! The compiled PDF and its hand-off to the caller.

use axum::body::Bytes;
use futures::Stream;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use super::{CompilationJob, JobId, JobState};
use crate::core::ReportError;

/// A verified artifact, still owned by its job.
///
/// Dropping it without delivering removes the artifact along with the job
/// directory.
#[derive(Debug)]
pub struct CompiledArtifact {
    job: CompilationJob,
    size: u64,
}

impl CompiledArtifact {
    pub(crate) const fn new(job: CompilationJob, size: u64) -> Self {
        Self {
            job,
            size,
        }
    }

    /// Identifier of the job that produced the artifact.
    #[must_use]
    pub const fn job_id(&self) -> &JobId {
        self.job.id()
    }

    /// Path of the artifact inside the job directory.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.job.artifact_path()
    }

    /// Size in bytes, as verified after compilation.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Opens the artifact for streaming. The returned stream owns the job and
    /// removes its files once it finishes or is dropped.
    ///
    /// # Errors
    ///
    /// [`ReportError::DeliveryFailed`] if the file cannot be opened; the job
    /// is cleaned up before returning.
    pub async fn into_stream(mut self) -> Result<DeliveryStream, ReportError> {
        match File::open(self.path()).await {
            Ok(file) => Ok(DeliveryStream {
                inner: ReaderStream::new(file),
                job: Some(self.job),
            }),
            Err(e) => {
                let error = ReportError::DeliveryFailed {
                    reason: e.to_string(),
                };
                self.job.fail(&error);
                Err(error)
            }
        }
    }

    /// Copies the artifact to `dest` and cleans up the job.
    ///
    /// Returns the number of bytes written.
    pub async fn save_to(mut self, dest: &Path) -> Result<u64, ReportError> {
        match tokio::fs::copy(self.path(), dest).await {
            Ok(bytes) => {
                self.job.advance(JobState::Delivered);
                Ok(bytes)
            }
            Err(e) => {
                let error = ReportError::DeliveryFailed {
                    reason: format!("{}: {e}", dest.display()),
                };
                self.job.fail(&error);
                Err(error)
            }
        }
    }
}

/// Byte stream of an artifact that cleans up its job when done.
///
/// The job is released as soon as the file has been read to the end, on the
/// first read error, or when the stream is dropped early (client
/// disconnect), whichever comes first.
pub struct DeliveryStream {
    inner: ReaderStream<File>,
    job: Option<CompilationJob>,
}

impl DeliveryStream {
    /// Identifier of the job being delivered, until it has been released.
    #[must_use]
    pub fn job_id(&self) -> Option<JobId> {
        self.job.as_ref().map(|job| *job.id())
    }
}

impl fmt::Debug for DeliveryStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryStream").field("job_id", &self.job_id()).finish_non_exhaustive()
    }
}

impl Stream for DeliveryStream {
    type Item = io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let polled = Pin::new(&mut this.inner).poll_next(cx);

        match &polled {
            Poll::Ready(None) => {
                if let Some(mut job) = this.job.take() {
                    job.advance(JobState::Delivered);
                }
            }
            Poll::Ready(Some(Err(e))) => {
                if let Some(mut job) = this.job.take() {
                    job.fail(&ReportError::DeliveryFailed {
                        reason: e.to_string(),
                    });
                }
            }
            _ => {}
        }

        polled
    }
}
