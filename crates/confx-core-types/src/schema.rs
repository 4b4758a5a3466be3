//! Canonical schema constants for structured logging and events
//!
//! These constants keep log output consistent across crates, so that log
//! processors and tests can match on them.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_ANOMALY: &str = "anomaly";

// Entity correlation
pub const FIELD_ENTITY_TYPE: &str = "entity_type";
pub const FIELD_ENTITY_INDEX: &str = "entity_index";
pub const FIELD_FIELD: &str = "field";

// Collection sizes
pub const FIELD_RECORD_COUNT: &str = "record_count";
pub const FIELD_EDGE_COUNT: &str = "edge_count";

// Error fields
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_ANOMALY: &str = "anomaly";

// Anomaly reasons (value of FIELD_ANOMALY)
pub const ANOMALY_SECTION_NOT_A_MAPPING: &str = "section_not_a_mapping";
pub const ANOMALY_SECTION_MISSING_IN_INPUT: &str = "section_missing_in_input";
pub const ANOMALY_INDEX_NOT_NUMERIC: &str = "index_not_numeric";
pub const ANOMALY_ENTITY_MISSING: &str = "entity_missing";
pub const ANOMALY_ENTITY_NOT_AN_OBJECT: &str = "entity_not_an_object";
pub const ANOMALY_UNRECOGNIZED_ERROR_SHAPE: &str = "unrecognized_error_shape";
pub const ANOMALY_CATEGORIZE_FAILED: &str = "categorize_failed";
pub const ANOMALY_INVALID_IDENTITY_FIELD: &str = "invalid_identity_field";
