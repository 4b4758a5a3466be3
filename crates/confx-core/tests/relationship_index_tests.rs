#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use confx_core::schema::builtin::gateway_registry;
use confx_core::{FieldMeta, RelationshipEdge, SchemaRegistry, SharedRelationships};

fn edge(field: &str, entity: &str, reference: &str) -> RelationshipEdge {
    RelationshipEdge {
        field: field.to_string(),
        entity: entity.to_string(),
        reference: reference.to_string(),
    }
}

#[test]
fn test_service_edges_cover_children_and_owned_reference() {
    let index = common::gateway_index();

    assert_eq!(
        index.edges_for("services"),
        &[
            edge("service", "plugins", "services"),
            edge("service", "routes", "services"),
            edge("client_certificate", "services", "certificates"),
        ]
    );
}

#[test]
fn test_reference_target_sees_every_referrer() {
    let index = common::gateway_index();
    let referrers: Vec<&str> = index
        .edges_for("certificates")
        .iter()
        .map(|e| e.entity.as_str())
        .collect();
    assert_eq!(referrers, vec!["services", "snis", "upstreams"]);
}

#[test]
fn test_entity_without_relationships() {
    let index = common::gateway_index();
    assert!(index.edges_for("vaults").is_empty());
    assert!(index.edges_for("not_an_entity").is_empty());
}

#[test]
fn test_build_is_deterministic() {
    let a = common::gateway_index();
    let b = common::gateway_index();
    assert_eq!(a, b);
}

/// Registry wrapper counting how often the index reads it
struct CountingRegistry {
    reads: AtomicUsize,
    inner: confx_core::StaticSchemaRegistry,
}

impl SchemaRegistry for CountingRegistry {
    fn entity_types(&self) -> Vec<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.entity_types()
    }

    fn fields(&self, entity_type: &str) -> Vec<FieldMeta> {
        self.inner.fields(entity_type)
    }
}

#[test]
fn test_concurrent_first_use_builds_once() {
    let registry = Arc::new(CountingRegistry {
        reads: AtomicUsize::new(0),
        inner: gateway_registry(),
    });
    let shared = SharedRelationships::new(registry.clone());

    let edge_counts: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| shared.get().edge_count()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(registry.reads.load(Ordering::SeqCst), 1);
    assert!(edge_counts.windows(2).all(|w| w[0] == w[1]));
    assert!(shared.is_built());
}
