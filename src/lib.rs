//! texreport - LaTeX report generation service
//!
//! Accepts a JSON object of named values, injects them into a LaTeX template,
//! compiles the result with an external engine (two passes) and returns the
//! PDF, guaranteeing that every temporary file is removed afterwards.
//!
//! # Architecture Overview
//!
//! ```text
//! POST /generate ──► server ──► ReportService::generate
//!                                  │
//!                                  ├─ templating: TemplateStore::load
//!                                  ├─ templating: Substitutor::materialize
//!                                  │      (FieldMapping → escape_value → substitute_placeholder)
//!                                  └─ compiler:  Compiler::compile
//!                                         (write <id>.tex, pass 1, pass 2, verify <id>.pdf)
//!                                  ▼
//!                            CompiledArtifact ──► DeliveryStream ──► response body
//! ```
//!
//! Each request owns a [`job::CompilationJob`] whose random identifier
//! namespaces all of its files, so concurrent requests need no locking. The
//! job removes its directory when dropped, which happens on every exit path:
//! failure, completed delivery or client disconnect.
//!
//! # Core Modules
//!
//! - [`templating`] - Escaping, field mapping, template loading and substitution
//! - [`compiler`] - External compiler invocation and the two-pass orchestration
//! - [`job`] - Per-request identifiers, working directories and cleanup
//! - [`service`] - The end-to-end pipeline
//! - [`server`] - HTTP routes, CORS and error responses
//!
//! ## Supporting Modules
//! - [`cli`] - Command-line interface
//! - [`config`] - Layered configuration (flags, environment, TOML file)
//! - [`core`] - Error types and user-facing error formatting
//! - [`constants`] - Shared defaults
//! - [`utils`] - Filesystem and platform helpers

// Core functionality modules
pub mod compiler;
pub mod job;
pub mod service;
pub mod templating;

// Boundary
pub mod cli;
pub mod config;
pub mod server;

// Supporting modules
pub mod constants;
pub mod core;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
