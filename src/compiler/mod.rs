//! External compiler integration.
//!
//! The service shells out to a LaTeX engine (`pdflatex` by default) the same
//! way for every job:
//!
//! ```text
//! <compiler> -interaction=nonstopmode -halt-on-error <id>.tex    # pass 1
//! <compiler> -interaction=nonstopmode -halt-on-error <id>.tex    # pass 2
//! ```
//!
//! Both passes run inside the job's own directory. A non-zero exit on either
//! pass is fatal for the job and carries the compiler's output as the
//! diagnostic. Each pass is bounded by a timeout, after which the child
//! process is killed.
//!
//! - [`command_builder`] - Builder for one child-process invocation
//! - [`orchestrator`] - The pass loop, artifact verification and cleanup

pub mod command_builder;
pub mod orchestrator;

pub use command_builder::{CommandError, CompilerCommand, CompilerOutput};
pub use orchestrator::Compiler;
