//! Schema metadata seam
//!
//! The relationship index only needs to know, per entity type, which fields
//! are foreign keys and which entity type each one references. The registry
//! owning that metadata lives outside this crate; [`SchemaRegistry`] is the
//! interface to it and [`StaticSchemaRegistry`] an in-memory implementation.

pub mod builtin;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Kind of a schema field, as far as relationships are concerned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Any non-relationship field
    Scalar,
    /// A foreign key referencing another entity type
    Foreign { reference: String },
}

/// One field of an entity schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMeta {
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldMeta {
    pub fn scalar(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Scalar,
        }
    }

    pub fn foreign(name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Foreign {
                reference: reference.into(),
            },
        }
    }

    /// Referenced entity type, for foreign key fields
    pub fn reference(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Foreign { reference } => Some(reference),
            FieldKind::Scalar => None,
        }
    }
}

/// Queryable source of entity schema metadata
pub trait SchemaRegistry: Send + Sync {
    /// All known entity type names, in a stable order
    fn entity_types(&self) -> Vec<String>;

    /// Fields of `entity_type` in declaration order; empty if unknown
    fn fields(&self, entity_type: &str) -> Vec<FieldMeta>;
}

/// In-memory schema registry, keyed by entity type name
///
/// Deserializes from a mapping of entity type to field list:
///
/// ```json
/// { "routes": [ { "name": "service", "type": "foreign", "reference": "services" } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticSchemaRegistry {
    entities: BTreeMap<String, Vec<FieldMeta>>,
}

impl StaticSchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) an entity type
    pub fn with_entity(mut self, entity_type: impl Into<String>, fields: Vec<FieldMeta>) -> Self {
        self.entities.insert(entity_type.into(), fields);
        self
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl SchemaRegistry for StaticSchemaRegistry {
    fn entity_types(&self) -> Vec<String> {
        self.entities.keys().cloned().collect()
    }

    fn fields(&self, entity_type: &str) -> Vec<FieldMeta> {
        self.entities.get(entity_type).cloned().unwrap_or_default()
    }
}
