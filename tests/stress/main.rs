//! Stress test suite for texreport
//!
//! Drives the router with many concurrent requests to check that per-job
//! isolation holds under load: every response carries exactly its own
//! fields, no two jobs share files, and the work directory ends up empty on
//! success, failure and disconnect alike.
//!
//! # Running Stress Tests
//!
//! ```bash
//! cargo test --test stress
//! cargo test --test stress -- --nocapture   # print timings
//! ```
//!
//! Timings are printed rather than asserted; the test runner's timeout
//! catches hangs.

#![cfg(unix)]

#[path = "../common/mod.rs"]
mod common;
