//! Built-in registry of common gateway entity types.

use super::{FieldMeta, StaticSchemaRegistry};

/// Registry covering the gateway's core entities and their foreign keys
pub fn gateway_registry() -> StaticSchemaRegistry {
    StaticSchemaRegistry::new()
        .with_entity(
            "services",
            vec![
                FieldMeta::scalar("id"),
                FieldMeta::scalar("name"),
                FieldMeta::scalar("host"),
                FieldMeta::scalar("port"),
                FieldMeta::scalar("protocol"),
                FieldMeta::scalar("tags"),
                FieldMeta::foreign("client_certificate", "certificates"),
            ],
        )
        .with_entity(
            "routes",
            vec![
                FieldMeta::scalar("id"),
                FieldMeta::scalar("name"),
                FieldMeta::scalar("protocols"),
                FieldMeta::scalar("paths"),
                FieldMeta::scalar("hosts"),
                FieldMeta::scalar("tags"),
                FieldMeta::foreign("service", "services"),
            ],
        )
        .with_entity(
            "consumers",
            vec![
                FieldMeta::scalar("id"),
                FieldMeta::scalar("username"),
                FieldMeta::scalar("custom_id"),
                FieldMeta::scalar("tags"),
            ],
        )
        .with_entity(
            "plugins",
            vec![
                FieldMeta::scalar("id"),
                FieldMeta::scalar("name"),
                FieldMeta::scalar("config"),
                FieldMeta::scalar("enabled"),
                FieldMeta::scalar("tags"),
                FieldMeta::foreign("service", "services"),
                FieldMeta::foreign("route", "routes"),
                FieldMeta::foreign("consumer", "consumers"),
            ],
        )
        .with_entity(
            "certificates",
            vec![
                FieldMeta::scalar("id"),
                FieldMeta::scalar("cert"),
                FieldMeta::scalar("key"),
                FieldMeta::scalar("tags"),
            ],
        )
        .with_entity(
            "ca_certificates",
            vec![
                FieldMeta::scalar("id"),
                FieldMeta::scalar("cert"),
                FieldMeta::scalar("tags"),
            ],
        )
        .with_entity(
            "snis",
            vec![
                FieldMeta::scalar("id"),
                FieldMeta::scalar("name"),
                FieldMeta::scalar("tags"),
                FieldMeta::foreign("certificate", "certificates"),
            ],
        )
        .with_entity(
            "upstreams",
            vec![
                FieldMeta::scalar("id"),
                FieldMeta::scalar("name"),
                FieldMeta::scalar("algorithm"),
                FieldMeta::scalar("tags"),
                FieldMeta::foreign("client_certificate", "certificates"),
            ],
        )
        .with_entity(
            "targets",
            vec![
                FieldMeta::scalar("id"),
                FieldMeta::scalar("target"),
                FieldMeta::scalar("weight"),
                FieldMeta::scalar("tags"),
                FieldMeta::foreign("upstream", "upstreams"),
            ],
        )
        .with_entity(
            "key_sets",
            vec![
                FieldMeta::scalar("id"),
                FieldMeta::scalar("name"),
                FieldMeta::scalar("tags"),
            ],
        )
        .with_entity(
            "keys",
            vec![
                FieldMeta::scalar("id"),
                FieldMeta::scalar("name"),
                FieldMeta::scalar("kid"),
                FieldMeta::scalar("tags"),
                FieldMeta::foreign("set", "key_sets"),
            ],
        )
        .with_entity(
            "vaults",
            vec![
                FieldMeta::scalar("id"),
                FieldMeta::scalar("name"),
                FieldMeta::scalar("prefix"),
                FieldMeta::scalar("tags"),
            ],
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaRegistry;

    #[test]
    fn test_every_reference_is_a_known_entity() {
        let registry = gateway_registry();
        let known = registry.entity_types();
        for entity_type in &known {
            for field in registry.fields(entity_type) {
                if let Some(reference) = field.reference() {
                    assert!(known.iter().any(|k| k == reference), "{reference}");
                }
            }
        }
    }
}
