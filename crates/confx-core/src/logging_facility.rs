//! Structured logging facility for confx
//!
//! This module provides:
//! - Single initialization point via `init(profile)`
//! - Operation boundary macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - `log_anomaly!` for data anomalies that are skipped rather than failed
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use confx_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
