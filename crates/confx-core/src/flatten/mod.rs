//! Entity error flattening
//!
//! Converts a validator's nested error tree into an ordered list of
//! [`EntityErrorRecord`]s, one per entity that still has errors after the
//! errors of its referenced entities were hoisted to their own records.

mod categorize;
mod flattener;
pub mod identity;

pub use categorize::{categorize, join_path, PATH_DELIMITER};
pub use flattener::{singular, Flattener};

use std::time::Instant;

use serde::Serialize;
use serde_json::Value;

use crate::errors::Result;
use crate::relations::RelationshipIndex;
use crate::structured::{ErrorFactory, StructuredError};
use crate::{log_op_end, log_op_error, log_op_start};

const OP_DECLARATIVE_CONFIG: &str = "declarative_config_flattened";

/// Whether an error concerns the whole entity or one of its fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorEntryKind {
    Entity,
    Field,
}

/// One categorized error message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEntry {
    #[serde(rename = "type")]
    pub kind: ErrorEntryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl ErrorEntry {
    pub fn entity(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorEntryKind::Entity,
            field: None,
            message: message.into(),
        }
    }

    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorEntryKind::Field,
            field: Some(field.into()),
            message: message.into(),
        }
    }
}

/// All errors reported against one entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityErrorRecord {
    /// Singular entity type name (e.g. `route`)
    pub entity_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_tags: Option<Vec<String>>,
    /// The entity as flattened, not as submitted
    ///
    /// Owned references are reduced to `{ "id": .. }` (or dropped when they
    /// carry no id), nested child collections are removed, and children
    /// receive an injected back-reference to their parent. The caller's
    /// document itself is never modified.
    pub entity: Value,
    pub errors: Vec<ErrorEntry>,
}

/// Build the `DECLARATIVE_CONFIG` error for a rejected document
///
/// The raw error tree becomes the error's `fields`; the flattened
/// per-entity records are attached as `flattened_errors`.
///
/// # Errors
/// Returns a contract fault if either `raw_errors` or `input` is not a
/// mapping.
pub fn declarative_config_flattened(
    factory: &ErrorFactory,
    index: &RelationshipIndex,
    raw_errors: &Value,
    input: &Value,
) -> Result<StructuredError> {
    log_op_start!(OP_DECLARATIVE_CONFIG);
    let started = Instant::now();

    let result = Flattener::new(index)
        .flatten(input, raw_errors)
        .and_then(|records| {
            factory
                .declarative_config(raw_errors)
                .map(|err| err.with_flattened_errors(records))
        });

    let duration_ms = started.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => {
            log_op_end!(OP_DECLARATIVE_CONFIG, duration_ms = duration_ms);
        }
        Err(err) => {
            log_op_error!(OP_DECLARATIVE_CONFIG, err, duration_ms = duration_ms);
        }
    }
    result
}
