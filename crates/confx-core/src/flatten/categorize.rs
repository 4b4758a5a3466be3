//! Error categorizer.
//!
//! Walks an error node in lexicographic key order and emits one
//! [`ErrorEntry`] per message. `@entity` and `@referenced_by` messages
//! concern the whole entity; since both keys sort before any field name they
//! come first, `@entity` ahead of `@referenced_by`. Shapes the validator should never produce are
//! logged and skipped; whatever else the node holds is still reported.

use std::collections::BTreeMap;

use super::ErrorEntry;
use crate::log_anomaly;
use crate::log_schema::ANOMALY_UNRECOGNIZED_ERROR_SHAPE;
use crate::tree::{RawErrorNode, ENTITY_KEY, REFERENCED_BY_KEY};

/// Separator between the segments of a nested field path
pub const PATH_DELIMITER: &str = ".";

const OP_CATEGORIZE: &str = "categorize";

/// Categorize every message below `node`, prefixing field paths with `prefix`
///
/// A bare message (or list of messages) at the root is a whole-entity error.
pub fn categorize(node: &RawErrorNode, prefix: &str) -> Vec<ErrorEntry> {
    let mut acc = Vec::new();
    match node {
        RawErrorNode::Node(children) => categorize_into(children, prefix, &mut acc),
        RawErrorNode::Leaf(message) => acc.push(ErrorEntry::entity(message.as_str())),
        RawErrorNode::LeafList(messages) => {
            acc.extend(messages.iter().map(|m| ErrorEntry::entity(m.as_str())));
        }
        RawErrorNode::Unrecognized(_) => {
            log_anomaly!(OP_CATEGORIZE, ANOMALY_UNRECOGNIZED_ERROR_SHAPE, field = prefix);
        }
    }
    acc
}

pub(crate) fn categorize_into(
    children: &BTreeMap<String, RawErrorNode>,
    prefix: &str,
    acc: &mut Vec<ErrorEntry>,
) {
    for (key, value) in children {
        if key == ENTITY_KEY || key == REFERENCED_BY_KEY {
            match value {
                RawErrorNode::Leaf(message) => acc.push(ErrorEntry::entity(message.as_str())),
                RawErrorNode::LeafList(messages) => {
                    acc.extend(messages.iter().map(|m| ErrorEntry::entity(m.as_str())));
                }
                RawErrorNode::Node(_) | RawErrorNode::Unrecognized(_) => {
                    log_anomaly!(
                        OP_CATEGORIZE,
                        ANOMALY_UNRECOGNIZED_ERROR_SHAPE,
                        field = join_path(prefix, key).as_str()
                    );
                }
            }
            continue;
        }

        let path = join_path(prefix, key);
        match value {
            RawErrorNode::Leaf(message) => acc.push(ErrorEntry::field(path, message.as_str())),
            RawErrorNode::LeafList(messages) => {
                acc.extend(
                    messages
                        .iter()
                        .map(|m| ErrorEntry::field(path.as_str(), m.as_str())),
                );
            }
            RawErrorNode::Node(nested) => categorize_into(nested, &path, acc),
            RawErrorNode::Unrecognized(_) => {
                log_anomaly!(
                    OP_CATEGORIZE,
                    ANOMALY_UNRECOGNIZED_ERROR_SHAPE,
                    field = path.as_str()
                );
            }
        }
    }
}

/// Join a field path prefix and a key, omitting empty segments
pub fn join_path(prefix: &str, key: &str) -> String {
    match (prefix.is_empty(), key.is_empty()) {
        (true, _) => key.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{}{}{}", prefix, PATH_DELIMITER, key),
    }
}
