//! Integration and statistical tests for rankfid.
//!
//! The suites live under `tests/`; this crate only exports shared helpers.

pub mod helpers;
