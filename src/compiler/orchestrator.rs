//! Drives the external compiler through the passes of one job.

use std::path::PathBuf;
use std::time::Duration;

use super::command_builder::{CommandError, CompilerCommand};
use crate::constants::{COMPILE_PASSES, DEFAULT_COMPILE_TIMEOUT, DEFAULT_COMPILER};
use crate::core::ReportError;
use crate::job::{CompilationJob, CompiledArtifact, JobState};
use crate::templating::MaterializedDocument;
use crate::utils::platform::resolve_command;

/// Flags passed before the source file on every pass.
///
/// `nonstopmode` keeps the engine from waiting on stdin for error recovery;
/// `halt-on-error` makes the first error fatal so the exit status reflects it.
const COMPILER_FLAGS: [&str; 2] = ["-interaction=nonstopmode", "-halt-on-error"];

/// The external compiler and its per-pass execution bound.
#[derive(Debug, Clone)]
pub struct Compiler {
    program: String,
    timeout: Duration,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(DEFAULT_COMPILER, DEFAULT_COMPILE_TIMEOUT)
    }
}

impl Compiler {
    /// Creates a compiler handle. Nothing is resolved until first use.
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// Program name or path as configured.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Per-pass timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolves the compiler on `PATH`.
    ///
    /// # Errors
    ///
    /// [`ReportError::CompilerUnavailable`] when it cannot be found.
    pub fn ensure_available(&self) -> Result<PathBuf, ReportError> {
        resolve_command(&self.program).ok_or_else(|| ReportError::CompilerUnavailable {
            program: self.program.clone(),
        })
    }

    /// Compiles `document` inside `job`'s working area.
    ///
    /// The source is written as `<id>.tex` and compiled [`COMPILE_PASSES`]
    /// times; the first failing pass ends the job. Once the artifact is
    /// verified, every other file in the job directory is removed and the
    /// job moves into the returned [`CompiledArtifact`].
    ///
    /// On error the job is marked failed and dropped, which removes whatever
    /// it had written.
    pub async fn compile(
        &self,
        mut job: CompilationJob,
        document: &MaterializedDocument,
    ) -> Result<CompiledArtifact, ReportError> {
        match self.run_passes(&mut job, document).await {
            Ok(size) => Ok(CompiledArtifact::new(job, size)),
            Err(error) => {
                job.fail(&error);
                Err(error)
            }
        }
    }

    async fn run_passes(
        &self,
        job: &mut CompilationJob,
        document: &MaterializedDocument,
    ) -> Result<u64, ReportError> {
        // Fail fast, before anything touches the disk
        let program = self.ensure_available()?;

        job.create_dir()?;
        tokio::fs::write(job.source_path(), document.as_str()).await.map_err(|e| {
            ReportError::TemplateWriteFailed {
                reason: format!("{}: {e}", job.source_path().display()),
            }
        })?;

        let source = job.source_file_name();
        for pass in 1..=COMPILE_PASSES {
            CompilerCommand::new(&program)
                .args(COMPILER_FLAGS)
                .arg(source.as_str())
                .current_dir(job.dir())
                .with_timeout(Some(self.timeout))
                .with_context(format!("{} pass {pass}", job.id()))
                .execute()
                .await
                .map_err(|e| self.pass_error(pass, e))?;
            job.advance(JobState::after_pass(pass));
        }

        let size = match tokio::fs::metadata(job.artifact_path()).await {
            Ok(meta) if meta.is_file() => meta.len(),
            _ => return Err(ReportError::ArtifactMissing),
        };
        job.advance(JobState::ArtifactVerified);

        if let Err(e) = job.discard_intermediates() {
            tracing::warn!(target: "job", "({}) Could not remove intermediate files: {:#}", job.id(), e);
        }

        tracing::info!(target: "compiler", "({}) Compiled {} bytes", job.id(), size);
        Ok(size)
    }

    fn pass_error(&self, pass: usize, error: CommandError) -> ReportError {
        match error {
            CommandError::Spawn {
                source, ..
            } if source.kind() == std::io::ErrorKind::NotFound => ReportError::CompilerUnavailable {
                program: self.program.clone(),
            },
            CommandError::Spawn {
                source, ..
            } => ReportError::CompilationFailed {
                pass,
                diagnostic: source.to_string(),
            },
            CommandError::TimedOut {
                duration, ..
            } => ReportError::CompilerTimedOut {
                pass,
                // Rounded up so a sub-second limit never reads as 0
                seconds: duration.as_secs() + u64::from(duration.subsec_nanos() > 0),
            },
            CommandError::Failed {
                diagnostic, ..
            } => ReportError::CompilationFailed {
                pass,
                diagnostic: diagnostic.trim_end().to_string(),
            },
        }
    }
}
