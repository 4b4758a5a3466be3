use std::collections::BTreeMap;
use std::time::Instant;

use serde_json::{json, Map, Value};

use super::categorize::categorize_into;
use super::identity::{validate_id, validate_name, validate_tags};
use super::EntityErrorRecord;
use crate::errors::{CoreError, Result};
use crate::log_schema::{
    ANOMALY_CATEGORIZE_FAILED, ANOMALY_ENTITY_MISSING, ANOMALY_ENTITY_NOT_AN_OBJECT,
    ANOMALY_INDEX_NOT_NUMERIC, ANOMALY_SECTION_MISSING_IN_INPUT, ANOMALY_SECTION_NOT_A_MAPPING,
    ANOMALY_UNRECOGNIZED_ERROR_SHAPE,
};
use crate::relations::{RelationshipEdge, RelationshipIndex};
use crate::tree::{parse_index, EntityInput, RawErrorNode};
use crate::{log_anomaly, log_op_end, log_op_start};

const OP_FLATTEN: &str = "flatten";

/// Correlates a raw error tree with the document it was produced from
///
/// Errors that belong to a referenced entity (an owned single reference,
/// or a nested child collection) are hoisted into that entity's own record
/// before the remaining errors are categorized, so a parent record never
/// reports its children's field errors.
#[derive(Debug, Clone, Copy)]
pub struct Flattener<'a> {
    index: &'a RelationshipIndex,
}

impl<'a> Flattener<'a> {
    pub fn new(index: &'a RelationshipIndex) -> Self {
        Self { index }
    }

    /// Flatten `raw_errors` against `input`
    ///
    /// Both values are entity-type-keyed mappings. The input is not
    /// modified; relationship rewrites apply to the snapshots in the records.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidInput`] if either value is not a mapping.
    pub fn flatten(&self, input: &Value, raw_errors: &Value) -> Result<Vec<EntityErrorRecord>> {
        let input = input.as_object().ok_or(CoreError::InvalidInput {
            op: OP_FLATTEN,
            arg: "input",
        })?;
        let sections = raw_errors
            .as_object()
            .ok_or(CoreError::InvalidInput {
                op: OP_FLATTEN,
                arg: "errors",
            })?
            .iter()
            .map(|(entity_type, section)| (entity_type.clone(), RawErrorNode::from_value(section)))
            .collect();
        Ok(self.flatten_sections(input, sections))
    }

    /// Flatten an already parsed error tree
    pub fn flatten_sections(
        &self,
        input: &Map<String, Value>,
        sections: BTreeMap<String, RawErrorNode>,
    ) -> Vec<EntityErrorRecord> {
        log_op_start!(OP_FLATTEN);
        let started = Instant::now();

        let mut out = Vec::new();
        for (entity_type, section) in sections {
            let RawErrorNode::Node(section) = section else {
                log_anomaly!(
                    OP_FLATTEN,
                    ANOMALY_SECTION_NOT_A_MAPPING,
                    entity_type = entity_type.as_str()
                );
                continue;
            };

            let entities = input
                .get(&entity_type)
                .cloned()
                .and_then(EntityInput::from_value);
            match entities {
                Some(EntityInput::Many(items)) => {
                    self.flatten_collection(&entity_type, items, section, &mut out);
                }
                Some(EntityInput::Single(entity)) => {
                    self.flatten_object(&entity_type, entity, section, &mut out);
                }
                None => {
                    log_anomaly!(
                        OP_FLATTEN,
                        ANOMALY_SECTION_MISSING_IN_INPUT,
                        entity_type = entity_type.as_str()
                    );
                }
            }
        }

        log_op_end!(
            OP_FLATTEN,
            duration_ms = started.elapsed().as_millis() as u64,
            record_count = out.len() as u64
        );
        out
    }

    fn flatten_entity(
        &self,
        entity_type: &str,
        entity: Value,
        errors: RawErrorNode,
        out: &mut Vec<EntityErrorRecord>,
    ) {
        if errors.is_empty() {
            return;
        }

        match (entity, errors) {
            (Value::Array(items), RawErrorNode::Node(indexed)) => {
                self.flatten_collection(entity_type, items, indexed, out);
            }
            (Value::Array(_), _) => {
                log_anomaly!(
                    OP_FLATTEN,
                    ANOMALY_UNRECOGNIZED_ERROR_SHAPE,
                    entity_type = entity_type
                );
            }
            (Value::Object(map), errors) => {
                self.flatten_object(entity_type, map, errors.into_entity_map(), out);
            }
            (Value::Null, _) => {
                log_anomaly!(OP_FLATTEN, ANOMALY_ENTITY_MISSING, entity_type = entity_type);
            }
            (_, _) => {
                log_anomaly!(
                    OP_FLATTEN,
                    ANOMALY_ENTITY_NOT_AN_OBJECT,
                    entity_type = entity_type
                );
            }
        }
    }

    /// Zip a collection against its index-keyed errors
    fn flatten_collection(
        &self,
        entity_type: &str,
        mut items: Vec<Value>,
        indexed: BTreeMap<String, RawErrorNode>,
        out: &mut Vec<EntityErrorRecord>,
    ) {
        let mut positions = Vec::with_capacity(indexed.len());
        for (key, errors) in indexed {
            match parse_index(&key) {
                Some(index) => positions.push((index, errors)),
                None => {
                    log_anomaly!(
                        OP_FLATTEN,
                        ANOMALY_INDEX_NOT_NUMERIC,
                        entity_type = entity_type,
                        field = key.as_str()
                    );
                }
            }
        }
        positions.sort_by_key(|(index, _)| *index);

        for (index, errors) in positions {
            match items.get_mut(index).map(Value::take) {
                Some(entity @ Value::Object(_)) => {
                    self.flatten_entity(entity_type, entity, errors, out);
                }
                Some(_) => {
                    log_anomaly!(
                        OP_FLATTEN,
                        ANOMALY_ENTITY_NOT_AN_OBJECT,
                        entity_type = entity_type,
                        entity_index = index as u64
                    );
                }
                None => {
                    log_anomaly!(
                        OP_FLATTEN,
                        ANOMALY_ENTITY_MISSING,
                        entity_type = entity_type,
                        entity_index = index as u64
                    );
                }
            }
        }
    }

    fn flatten_object(
        &self,
        entity_type: &str,
        mut entity: Map<String, Value>,
        mut errors: BTreeMap<String, RawErrorNode>,
        out: &mut Vec<EntityErrorRecord>,
    ) {
        for edge in self.index.edges_for(entity_type) {
            if edge.is_owned_by(entity_type) {
                self.hoist_reference(edge, &mut entity, &mut errors, out);
            } else {
                self.hoist_children(edge, &mut entity, &mut errors, out);
            }
        }

        if errors.is_empty() {
            return;
        }

        let mut entries = Vec::new();
        categorize_into(&errors, "", &mut entries);
        if entries.is_empty() {
            log_anomaly!(OP_FLATTEN, ANOMALY_CATEGORIZE_FAILED, entity_type = entity_type);
            return;
        }

        out.push(EntityErrorRecord {
            entity_type: singular(entity_type).to_string(),
            entity_id: validate_id(entity.get("id")),
            entity_name: validate_name(entity.get("name")),
            entity_tags: validate_tags(entity.get("tags")),
            entity: Value::Object(entity),
            errors: entries,
        });
    }

    /// Owned single reference, e.g. a service's `client_certificate`
    ///
    /// The nested entity is replaced by `{ id }` (or dropped when it has no
    /// id). Errors under the field always leave the parent and are reported
    /// under the referenced type.
    fn hoist_reference(
        &self,
        edge: &RelationshipEdge,
        entity: &mut Map<String, Value>,
        errors: &mut BTreeMap<String, RawErrorNode>,
        out: &mut Vec<EntityErrorRecord>,
    ) {
        let referenced = entity.remove(&edge.field);
        if let Some(id) = referenced
            .as_ref()
            .and_then(|value| value.get("id"))
            .filter(|id| !id.is_null())
        {
            entity.insert(edge.field.clone(), json!({ "id": id }));
        }

        if let Some(nested) = errors.remove(&edge.field) {
            self.flatten_entity(
                &edge.reference,
                referenced.unwrap_or(Value::Null),
                nested,
                out,
            );
        }
    }

    /// Nested child collection, e.g. a service's `routes`
    ///
    /// Children without a back-reference get `{ id: parent id }` injected,
    /// the collection is removed from the parent and every error under it
    /// is reported under the child type.
    fn hoist_children(
        &self,
        edge: &RelationshipEdge,
        entity: &mut Map<String, Value>,
        errors: &mut BTreeMap<String, RawErrorNode>,
        out: &mut Vec<EntityErrorRecord>,
    ) {
        let collection = edge.entity.as_str();
        let children = entity.remove(collection);
        let nested = errors.remove(collection);

        let back_reference = validate_id(entity.get("id")).map(|id| json!({ "id": id }));
        let children = match children {
            Some(Value::Array(mut items)) => {
                for item in &mut items {
                    inject_back_reference(item, &edge.field, back_reference.as_ref());
                }
                Value::Array(items)
            }
            Some(mut single) => {
                inject_back_reference(&mut single, &edge.field, back_reference.as_ref());
                single
            }
            None => Value::Null,
        };

        if let Some(nested) = nested {
            self.flatten_entity(collection, children, nested, out);
        }
    }
}

fn inject_back_reference(child: &mut Value, field: &str, back_reference: Option<&Value>) {
    let (Value::Object(child), Some(back_reference)) = (child, back_reference) else {
        return;
    };
    if child.get(field).map_or(true, Value::is_null) {
        child.insert(field.to_string(), back_reference.clone());
    }
}

/// Singular form of an entity type name: one trailing `s` is stripped
pub fn singular(entity_type: &str) -> &str {
    entity_type.strip_suffix('s').unwrap_or(entity_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singular() {
        assert_eq!(singular("routes"), "route");
        assert_eq!(singular("snis"), "sni");
        assert_eq!(singular("ca_certificates"), "ca_certificate");
        assert_eq!(singular("status"), "statu");
        assert_eq!(singular("key"), "key");
    }

    #[test]
    fn test_inject_back_reference_respects_existing() {
        let parent = json!({ "id": "p1" });
        let mut missing = json!({ "name": "a" });
        let mut null = json!({ "name": "b", "service": null });
        let mut present = json!({ "name": "c", "service": { "id": "other" } });

        inject_back_reference(&mut missing, "service", Some(&parent));
        inject_back_reference(&mut null, "service", Some(&parent));
        inject_back_reference(&mut present, "service", Some(&parent));

        assert_eq!(missing["service"], parent);
        assert_eq!(null["service"], parent);
        assert_eq!(present["service"], json!({ "id": "other" }));
    }

    #[test]
    fn test_inject_skipped_without_parent_id() {
        let mut child = json!({ "name": "a" });
        inject_back_reference(&mut child, "service", None);
        assert_eq!(child, json!({ "name": "a" }));
    }
}
