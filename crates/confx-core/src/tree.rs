//! Raw error tree and entity input models
//!
//! Both trees arrive as untyped JSON. They are parsed into explicit variants
//! at the boundary so the categorizer and the flattener can match on shape
//! exhaustively instead of probing values at runtime.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Key holding whole-entity messages in an error node
pub const ENTITY_KEY: &str = "@entity";

/// Key holding restrict-violation messages (entity is referenced by children)
pub const REFERENCED_BY_KEY: &str = "@referenced_by";

/// One node of a validator's error tree
///
/// Node keys iterate in lexicographic order, which fixes the order in which
/// messages are reported.
#[derive(Debug, Clone, PartialEq)]
pub enum RawErrorNode {
    /// A single message
    Leaf(String),
    /// Several messages on the same entity or field
    LeafList(Vec<String>),
    /// Field name (or collection index) to nested errors
    Node(BTreeMap<String, RawErrorNode>),
    /// Any shape the validator is not expected to produce
    Unrecognized(Value),
}

impl RawErrorNode {
    /// Parse a JSON value into an error node
    ///
    /// Arrays of strings become [`RawErrorNode::LeafList`]. Arrays of objects
    /// (errors per collection position) become index-keyed nodes, with
    /// `null` positions skipped. Numbers, booleans, `null` and mixed arrays
    /// become [`RawErrorNode::Unrecognized`].
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(message) => RawErrorNode::Leaf(message.clone()),
            Value::Object(map) => RawErrorNode::Node(
                map.iter()
                    .map(|(key, child)| (key.clone(), RawErrorNode::from_value(child)))
                    .collect(),
            ),
            Value::Array(items) if items.iter().all(Value::is_string) => RawErrorNode::LeafList(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
            ),
            Value::Array(items) if items.iter().all(|i| i.is_object() || i.is_null()) => {
                RawErrorNode::Node(
                    items
                        .iter()
                        .enumerate()
                        .filter(|(_, item)| !item.is_null())
                        .map(|(index, item)| (index.to_string(), RawErrorNode::from_value(item)))
                        .collect(),
                )
            }
            other => RawErrorNode::Unrecognized(other.clone()),
        }
    }

    /// True when the node carries no errors at all
    pub fn is_empty(&self) -> bool {
        match self {
            RawErrorNode::Leaf(_) | RawErrorNode::Unrecognized(_) => false,
            RawErrorNode::LeafList(messages) => messages.is_empty(),
            RawErrorNode::Node(children) => children.is_empty(),
        }
    }

    /// Convert into a field map, wrapping bare messages as whole-entity errors
    pub(crate) fn into_entity_map(self) -> BTreeMap<String, RawErrorNode> {
        match self {
            RawErrorNode::Node(children) => children,
            other => BTreeMap::from([(ENTITY_KEY.to_string(), other)]),
        }
    }
}

/// An entity-type section of the input document, or one nested value
#[derive(Debug, Clone, PartialEq)]
pub enum EntityInput {
    /// A single entity object
    Single(Map<String, Value>),
    /// A collection of entities, positions matching the error tree indices
    Many(Vec<Value>),
}

impl EntityInput {
    /// Classify a value; anything that is neither object nor array is `None`
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(EntityInput::Single(map)),
            Value::Array(items) => Some(EntityInput::Many(items)),
            _ => None,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            EntityInput::Single(map) => Value::Object(map),
            EntityInput::Many(items) => Value::Array(items),
        }
    }
}

/// Parse a collection index key
pub(crate) fn parse_index(key: &str) -> Option<usize> {
    key.parse().ok()
}
