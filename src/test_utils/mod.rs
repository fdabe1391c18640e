//! Test utilities for texreport
//!
//! Available to unit tests and, through the `test-utils` feature, to the
//! integration and stress suites.
//!
//! - [`init_test_logging`] - One-time tracing setup
//! - [`write_sample_template`] - Writes the shipped report template into a test dir
//! - [`FakeCompiler`] - A shell script standing in for `pdflatex` (Unix only)
//!
//! # Example
//!
//! ```rust,no_run
//! use texreport::test_utils::{FakeBehavior, FakeCompiler};
//!
//! let temp = tempfile::TempDir::new().unwrap();
//! let fake = FakeCompiler::install(temp.path(), FakeBehavior::FailOnPass(1)).unwrap();
//! // point `Compiler::new(fake.program_str(), ..)` at it, run a job, then:
//! assert_eq!(fake.invocations(), 1);
//! ```

use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::config::ServiceConfig;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; with neither, tests run
/// without a subscriber.
///
/// ```bash
/// RUST_LOG=job=debug,compiler=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// The report template shipped with the service.
pub const SAMPLE_TEMPLATE: &str = include_str!("../../templates/report.tex");

/// File name used by [`write_sample_template`].
pub const SAMPLE_TEMPLATE_NAME: &str = "report.tex";

/// Writes [`SAMPLE_TEMPLATE`] to `<dir>/report.tex` and returns the path.
pub fn write_sample_template(dir: &Path) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(SAMPLE_TEMPLATE_NAME);
    std::fs::write(&path, SAMPLE_TEMPLATE)?;
    Ok(path)
}

/// A configuration rooted in `dir`: template at `<dir>/report.tex`, work
/// area at `<dir>/work`, the given compiler and a short timeout.
pub fn test_config(dir: &Path, compiler: impl Into<String>) -> ServiceConfig {
    ServiceConfig {
        template_path: dir.join(SAMPLE_TEMPLATE_NAME),
        work_dir: dir.join("work"),
        compiler: compiler.into(),
        compile_timeout: std::time::Duration::from_secs(10),
        ..ServiceConfig::default()
    }
}

/// How a [`FakeCompiler`] behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeBehavior {
    /// Writes `<id>.pdf` containing `%PDF-1.4` followed by the source text.
    Succeed,
    /// Prints a TeX error to stderr and exits 1 on the given pass (1-based).
    FailOnPass(usize),
    /// Prints a TeX error to stdout only and exits 1.
    FailStdoutOnly,
    /// Exits 0 on every pass without writing the PDF.
    NoArtifact,
    /// Never finishes.
    Hang,
}

#[cfg(unix)]
pub use fake::FakeCompiler;

#[cfg(unix)]
mod fake {
    use super::FakeBehavior;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    /// Executable script emulating a LaTeX engine.
    ///
    /// Like the real engine it is invoked with the source file name as its last
    /// argument, from inside the job directory, and writes `<base>.log`,
    /// `<base>.aux` and (depending on [`FakeBehavior`]) `<base>.pdf` there. It
    /// keeps a per-job pass counter in `<base>.passes` and appends one line per
    /// invocation to a counter file next to the script.
    #[derive(Debug, Clone)]
    pub struct FakeCompiler {
        program: PathBuf,
        counter: PathBuf,
    }

    impl FakeCompiler {
        /// Writes the script into `dir` (created if needed).
        pub fn install(dir: &Path, behavior: FakeBehavior) -> std::io::Result<Self> {
            std::fs::create_dir_all(dir)?;
            let program = dir.join("fake-pdflatex");
            let counter = dir.join("invocations");

            std::fs::write(&program, script(&counter, behavior))?;
            std::fs::set_permissions(&program, std::fs::Permissions::from_mode(0o755))?;

            Ok(Self {
                program,
                counter,
            })
        }

        #[must_use]
        pub fn program(&self) -> &Path {
            &self.program
        }

        /// The script path as a string, for `Compiler::new` and config.
        #[must_use]
        pub fn program_str(&self) -> String {
            self.program.display().to_string()
        }

        /// Total number of times the script has run, across all jobs.
        #[must_use]
        pub fn invocations(&self) -> usize {
            std::fs::read_to_string(&self.counter).map(|s| s.lines().count()).unwrap_or(0)
        }
    }

    fn script(counter: &Path, behavior: FakeBehavior) -> String {
        let outcome = match behavior {
            FakeBehavior::Succeed => WRITE_PDF.to_string(),
            FakeBehavior::FailOnPass(pass) => format!(
                "if [ \"$n\" -eq {pass} ]; then\n  \
                 echo '! Undefined control sequence.' >&2\n  \
                 exit 1\n\
                 fi\n{WRITE_PDF}"
            ),
            FakeBehavior::FailStdoutOnly => {
                "echo '! LaTeX Error: File `missing.sty'\"'\"' not found.'\nexit 1\n".to_string()
            }
            FakeBehavior::NoArtifact => "exit 0\n".to_string(),
            FakeBehavior::Hang => "exec sleep 30\n".to_string(),
        };

        format!(
            "#!/bin/sh\n\
             echo run >> '{counter}'\n\
             for arg in \"$@\"; do src=\"$arg\"; done\n\
             base=\"${{src%.tex}}\"\n\
             n=$(cat \"$base.passes\" 2>/dev/null || echo 0)\n\
             n=$((n + 1))\n\
             echo \"$n\" > \"$base.passes\"\n\
             echo \"This is FakeTeX, pass $n\"\n\
             echo \"pass $n\" > \"$base.log\"\n\
             echo aux > \"$base.aux\"\n\
             {outcome}",
            counter = counter.display(),
        )
    }

    const WRITE_PDF: &str = "{ printf '%%PDF-1.4\\n'; cat \"$src\"; } > \"$base.pdf\"\nexit 0\n";
}
