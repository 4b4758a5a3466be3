//! Human summaries of detail maps.
//!
//! Used by the schema violation, invalid options and unresolved foreign key
//! constructors. Output order is fixed: the whole-entity bucket first, then
//! the remaining keys in lexicographic order.

use serde_json::{Map, Value};

use crate::catalog::{fill, ErrorCode};
use crate::tree::ENTITY_KEY;

/// Render any value for inclusion in a message
///
/// Strings render verbatim; everything else renders as compact JSON.
pub fn pretty(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Collect one summary line per leaf error in `detail`
pub(crate) fn summary_lines(detail: &Map<String, Value>) -> Vec<String> {
    let mut buf = Vec::new();

    if let Some(entity_errors) = detail.get(ENTITY_KEY) {
        match entity_errors {
            Value::Array(items) => buf.extend(items.iter().map(pretty)),
            other => buf.push(pretty(other)),
        }
    }

    for field in sorted_keys(detail) {
        if field == ENTITY_KEY {
            continue;
        }
        match &detail[field] {
            Value::Object(nested) => {
                for sub_field in sorted_keys(nested) {
                    buf.push(format!("{}.{}: {}", field, sub_field, pretty(&nested[sub_field])));
                }
            }
            Value::Array(items) => {
                for item in items {
                    buf.push(format!("{}: {}", field, pretty(item)));
                }
            }
            other => buf.push(format!("{}: {}", field, pretty(other))),
        }
    }

    buf
}

/// Phrase the summary of `detail` for `code`
///
/// A single line uses the singular template, anything else the plural one.
pub(crate) fn summarize(code: ErrorCode, detail: &Map<String, Value>) -> String {
    let lines = summary_lines(detail);
    if let [only] = lines.as_slice() {
        return fill(code.template(), &[only.as_str()]);
    }
    let joined = lines.join("; ");
    match code.plural_template() {
        Some(plural) => fill(plural, &[&lines.len().to_string(), &joined]),
        None => fill(code.template(), &[&joined]),
    }
}

fn sorted_keys(map: &Map<String, Value>) -> Vec<&str> {
    let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
    keys.sort_unstable();
    keys
}
