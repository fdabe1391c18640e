//! Integration test suite for texreport
//!
//! End-to-end tests through the real axum router, with a fake compiler
//! script standing in for `pdflatex`. They run quickly and need no TeX
//! installation.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! RUST_LOG=job=debug cargo test --test integration -- --nocapture
//! ```
//!
//! # Test Organization
//!
//! - **generate**: Successful reports, substitution and escaping end to end
//! - **errors**: Every failure category and its response
//! - **cleanup**: Nothing is left in the work directory on any exit path
//! - **cors**: Origin allow-list behavior
//! - **render**: The `render` command of the binary

#![cfg(unix)]

#[path = "../common/mod.rs"]
mod common;

mod cleanup;
mod cors;
mod errors;
mod generate;
