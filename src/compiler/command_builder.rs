//! Builder for running the external document compiler.
//!
//! Provides a fluent API for one compiler invocation with consistent
//! timeout handling, output capture and logging.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;

use crate::constants::DEFAULT_COMPILE_TIMEOUT;

/// Why a compiler invocation did not succeed.
#[derive(Error, Debug)]
pub enum CommandError {
    /// The process could not be started at all.
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran past its timeout and was killed.
    #[error("{program} timed out after {duration:?}")]
    TimedOut {
        program: String,
        duration: Duration,
    },

    /// The process exited with a non-zero status.
    #[error("{program} exited with status {status:?}")]
    Failed {
        program: String,
        status: Option<i32>,
        /// stderr, or stdout when stderr was empty
        diagnostic: String,
    },
}

/// Builder for a single compiler invocation.
///
/// # Examples
///
/// ```rust,no_run
/// use texreport::compiler::CompilerCommand;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), texreport::compiler::CommandError> {
/// let output = CompilerCommand::new("pdflatex")
///     .args(["-interaction=nonstopmode", "report.tex"])
///     .current_dir("/tmp/job")
///     .with_timeout(Some(Duration::from_secs(60)))
///     .with_context("job-1234 pass 1")
///     .execute()
///     .await?;
/// println!("{}", output.stdout);
/// # Ok(())
/// # }
/// ```
///
/// # Default Configuration
///
/// - **Timeout**: 120 seconds; the child is killed when it expires
/// - **Stdin**: closed, so an interactive prompt fails instead of hanging
/// - **Output capture**: stdout and stderr are both captured
pub struct CompilerCommand {
    program: PathBuf,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    timeout_duration: Option<Duration>,
    /// Prefix for log lines, to tell concurrent jobs apart.
    context: Option<String>,
}

impl CompilerCommand {
    /// Creates a builder for `program` with default settings.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            timeout_duration: Some(DEFAULT_COMPILE_TIMEOUT),
            context: None,
        }
    }

    /// Sets the working directory of the child process.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Adds a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets a custom timeout (None for no timeout).
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Sets a context label included in every log line of this invocation.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    fn prefix(&self) -> String {
        self.context.as_ref().map(|ctx| format!("({ctx}) ")).unwrap_or_default()
    }

    /// Runs the command to completion and returns its captured output.
    ///
    /// # Errors
    ///
    /// See [`CommandError`].
    pub async fn execute(self) -> Result<CompilerOutput, CommandError> {
        let start = std::time::Instant::now();
        let program = self.program.display().to_string();
        let prefix = self.prefix();

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }

        tracing::debug!(
            target: "compiler",
            "{}Executing command: {} {}",
            prefix,
            program,
            self.args.join(" ")
        );

        let output_future = cmd.output();
        let result = if let Some(duration) = self.timeout_duration {
            if let Ok(result) = timeout(duration, output_future).await {
                result
            } else {
                tracing::warn!(
                    target: "compiler",
                    "{}Command timed out after {:?}: {} {}",
                    prefix,
                    duration,
                    program,
                    self.args.join(" ")
                );
                return Err(CommandError::TimedOut {
                    program,
                    duration,
                });
            }
        } else {
            tracing::trace!(target: "compiler", "{}Executing command without timeout", prefix);
            output_future.await
        };

        let output = result.map_err(|source| CommandError::Spawn {
            program: program.clone(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!(
                target: "compiler",
                "{}Command failed with exit code: {:?}",
                prefix,
                output.status.code()
            );
            for line in stderr.lines() {
                tracing::debug!(target: "compiler", "{}stderr: {}", prefix, line);
            }

            // TeX engines print most errors to stdout
            let diagnostic = if stderr.trim().is_empty() { stdout } else { stderr };
            return Err(CommandError::Failed {
                program,
                status: output.status.code(),
                diagnostic,
            });
        }

        if !stdout.is_empty() {
            tracing::debug!(target: "compiler", "{}{}", prefix, stdout.trim());
        }
        if !stderr.is_empty() {
            tracing::debug!(target: "compiler", "{}{}", prefix, stderr.trim());
        }

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 1 {
            tracing::info!(
                target: "compiler::perf",
                "{}{} took {:.2}s",
                prefix,
                program,
                elapsed.as_secs_f64()
            );
        } else if elapsed.as_millis() > 100 {
            tracing::debug!(
                target: "compiler::perf",
                "{}{} took {}ms",
                prefix,
                program,
                elapsed.as_millis()
            );
        }

        Ok(CompilerOutput {
            stdout,
            stderr,
        })
    }
}

/// Captured output of a successful invocation.
#[derive(Debug, Clone)]
pub struct CompilerOutput {
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}
