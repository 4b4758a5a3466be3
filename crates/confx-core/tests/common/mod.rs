use confx_core::schema::builtin::gateway_registry;
use confx_core::{FieldMeta, RelationshipIndex, StaticSchemaRegistry};
use serde_json::{json, Value};

/// Relationship index over the built-in gateway registry
#[allow(dead_code)]
pub fn gateway_index() -> RelationshipIndex {
    RelationshipIndex::build(&gateway_registry())
}

/// Small registry with one owned reference and one child collection
///
/// `widgets` own a single `gadget` reference and nest `parts`, each of
/// which points back at its widget.
#[allow(dead_code)]
pub fn widget_registry() -> StaticSchemaRegistry {
    StaticSchemaRegistry::new()
        .with_entity(
            "widgets",
            vec![
                FieldMeta::scalar("name"),
                FieldMeta::foreign("gadget", "gadgets"),
            ],
        )
        .with_entity("gadgets", vec![FieldMeta::scalar("name")])
        .with_entity(
            "parts",
            vec![
                FieldMeta::scalar("name"),
                FieldMeta::foreign("widget", "widgets"),
            ],
        )
}

/// The nested service document used across end-to-end tests
#[allow(dead_code)]
pub fn nested_service_document() -> Value {
    json!({
        "services": [
            {
                "name": "svc",
                "url": "http://x",
                "routes": [
                    { "name": "r", "protocols": ["bogus"] }
                ],
                "plugins": [
                    { "name": "nope" }
                ]
            }
        ]
    })
}

/// Validator output for [`nested_service_document`]
#[allow(dead_code)]
pub fn nested_service_errors() -> Value {
    json!({
        "services": [
            {
                "routes": [
                    { "protocols": ["expected one of: grpc, grpcs, http, https"] }
                ],
                "plugins": [
                    { "name": "plugin 'nope' not enabled; add it to the 'plugins' configuration property" }
                ]
            }
        ]
    })
}
