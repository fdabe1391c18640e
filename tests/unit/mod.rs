//! Unit test suite for texreport
//!
//! Fast tests of the public API that need no compiler and no server:
//! command-line parsing, configuration layering, the templating properties
//! and the binary's help and error output.
//!
//! ```bash
//! cargo test --test unit
//! ```
