//! Identity field validators
//!
//! Extract displayable identity fields from an entity snapshot. A field of
//! the wrong shape yields `None` and a debug event, never a fault.

use serde_json::Value;

use crate::log_schema::{ANOMALY_INVALID_IDENTITY_FIELD, EVENT_ANOMALY};

const OP_IDENTITY: &str = "identity";

/// A non-empty string id
pub fn validate_id(value: Option<&Value>) -> Option<String> {
    non_empty_string("id", value)
}

/// A non-empty string name
pub fn validate_name(value: Option<&Value>) -> Option<String> {
    non_empty_string("name", value)
}

/// A non-empty array whose items are all strings
pub fn validate_tags(value: Option<&Value>) -> Option<Vec<String>> {
    match value? {
        Value::Null => None,
        Value::Array(items) if items.is_empty() => None,
        Value::Array(items) => {
            let tags: Option<Vec<String>> = items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect();
            if tags.is_none() {
                invalid("tags");
            }
            tags
        }
        _ => {
            invalid("tags");
            None
        }
    }
}

fn non_empty_string(field: &'static str, value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => {
            invalid(field);
            None
        }
    }
}

fn invalid(field: &'static str) {
    tracing::debug!(
        component = module_path!(),
        op = OP_IDENTITY,
        event = EVENT_ANOMALY,
        anomaly = ANOMALY_INVALID_IDENTITY_FIELD,
        field = field,
    );
}
