//! Foreign key relationship index
//!
//! Every foreign key field produces one edge, recorded twice: under the
//! entity type owning the field and under the referenced entity type. A
//! lookup on either side therefore discovers the relationship. For an edge
//! found under type `T`:
//! - `edge.entity == T`: `T` owns a single reference in `edge.field`
//! - otherwise: entities of `T` may nest a collection of `edge.entity`
//!   children, each pointing back through `edge.field`
//!
//! The index is immutable once built.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use serde::Serialize;

use crate::schema::SchemaRegistry;
use crate::{log_op_end, log_op_start};

const OP_BUILD: &str = "relationship_index_build";

/// One foreign key relationship between two entity types
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RelationshipEdge {
    /// Foreign key field name on `entity`
    pub field: String,
    /// Entity type owning the foreign key field
    pub entity: String,
    /// Entity type the field references
    pub reference: String,
}

impl RelationshipEdge {
    /// True when `entity_type` owns the foreign key field of this edge
    pub fn is_owned_by(&self, entity_type: &str) -> bool {
        self.entity == entity_type
    }
}

/// Directed foreign key graph between entity types
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationshipIndex {
    edges: BTreeMap<String, Vec<RelationshipEdge>>,
}

impl RelationshipIndex {
    /// Build the index from schema metadata
    ///
    /// Edges keep registry order (entity types, then field declaration
    /// order). A self-referencing foreign key is recorded once.
    pub fn build(registry: &dyn SchemaRegistry) -> Self {
        log_op_start!(OP_BUILD);
        let started = Instant::now();

        let mut index = Self::default();
        for entity_type in registry.entity_types() {
            for field in registry.fields(&entity_type) {
                let Some(reference) = field.reference() else {
                    continue;
                };
                let edge = RelationshipEdge {
                    field: field.name.clone(),
                    entity: entity_type.clone(),
                    reference: reference.to_string(),
                };
                index.insert(&entity_type, edge.clone());
                index.insert(reference, edge);
            }
        }

        log_op_end!(
            OP_BUILD,
            duration_ms = started.elapsed().as_millis() as u64,
            edge_count = index.edge_count() as u64
        );
        index
    }

    fn insert(&mut self, entity_type: &str, edge: RelationshipEdge) {
        let edges = self.edges.entry(entity_type.to_string()).or_default();
        if !edges.contains(&edge) {
            edges.push(edge);
        }
    }

    /// Edges touching `entity_type`, owned or reverse; empty if unknown
    pub fn edges_for(&self, entity_type: &str) -> &[RelationshipEdge] {
        self.edges.get(entity_type).map_or(&[], Vec::as_slice)
    }

    /// Total number of recorded edge entries
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    /// Entity types with at least one edge
    pub fn entity_types(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }
}

/// Relationship index built on first use from a shared registry
///
/// Concurrent first callers block until a single build completes; every
/// caller then reads the same index.
pub struct SharedRelationships {
    registry: Arc<dyn SchemaRegistry>,
    index: OnceLock<RelationshipIndex>,
}

impl SharedRelationships {
    pub fn new(registry: Arc<dyn SchemaRegistry>) -> Self {
        Self {
            registry,
            index: OnceLock::new(),
        }
    }

    /// Get the index, building it on the first call
    pub fn get(&self) -> &RelationshipIndex {
        self.index
            .get_or_init(|| RelationshipIndex::build(self.registry.as_ref()))
    }

    pub fn is_built(&self) -> bool {
        self.index.get().is_some()
    }
}

impl std::fmt::Debug for SharedRelationships {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedRelationships")
            .field("built", &self.is_built())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldMeta, StaticSchemaRegistry};

    fn registry() -> StaticSchemaRegistry {
        StaticSchemaRegistry::new()
            .with_entity("services", vec![FieldMeta::scalar("name")])
            .with_entity(
                "routes",
                vec![
                    FieldMeta::scalar("name"),
                    FieldMeta::foreign("service", "services"),
                ],
            )
            .with_entity("nodes", vec![FieldMeta::foreign("parent", "nodes")])
    }

    #[test]
    fn test_edge_is_recorded_on_both_sides() {
        let index = RelationshipIndex::build(&registry());
        let expected = RelationshipEdge {
            field: "service".to_string(),
            entity: "routes".to_string(),
            reference: "services".to_string(),
        };

        assert_eq!(index.edges_for("routes"), &[expected.clone()]);
        assert_eq!(index.edges_for("services"), &[expected.clone()]);
        assert!(expected.is_owned_by("routes"));
        assert!(!expected.is_owned_by("services"));
    }

    #[test]
    fn test_self_reference_recorded_once() {
        let index = RelationshipIndex::build(&registry());
        assert_eq!(index.edges_for("nodes").len(), 1);
        assert_eq!(index.edge_count(), 3);
    }

    #[test]
    fn test_unknown_type_has_no_edges() {
        let index = RelationshipIndex::build(&registry());
        assert!(index.edges_for("consumers").is_empty());
    }

    #[test]
    fn test_shared_builds_lazily() {
        let shared = SharedRelationships::new(Arc::new(registry()));
        assert!(!shared.is_built());
        let first: *const RelationshipIndex = shared.get();
        assert!(shared.is_built());
        let second: *const RelationshipIndex = shared.get();
        assert_eq!(first, second);
    }
}
