//! Core types shared across confx facilities
//!
//! - **Schema constants**: canonical structured-logging field keys, event
//!   names and anomaly reasons used by the logging facility and by every
//!   data-anomaly warning the flattener emits.

pub mod schema;
