//! confx Core - declarative configuration error correlation
//!
//! This crate turns a schema validator's nested error tree, together with
//! the configuration document it was produced from, into a flat and stable
//! list of per-entity error records. It provides:
//! - The error catalog (stable integer codes, names and message templates)
//! - The structured error builder and its per-operation constructors
//! - A schema registry seam and the foreign-key relationship index built from it
//! - The raw error tree model and the error categorizer
//! - The entity error flattener, which hoists errors of referenced entities
//!   to their own top-level records
//! - A structured logging facility built on `tracing`
//!
//! Nothing in this crate performs I/O or validates values itself.

pub mod catalog;
pub mod errors;
pub mod flatten;
pub mod logging_facility;
pub mod relations;
pub mod schema;
pub mod structured;
pub mod tree;

/// Canonical logging field keys and event names, used by the logging macros
pub use confx_core_types::schema as log_schema;

// Re-export commonly used types
pub use catalog::ErrorCode;
pub use errors::{CoreError, Result};
pub use flatten::{declarative_config_flattened, EntityErrorRecord, ErrorEntry, ErrorEntryKind, Flattener};
pub use relations::{RelationshipEdge, RelationshipIndex, SharedRelationships};
pub use schema::{FieldKind, FieldMeta, SchemaRegistry, StaticSchemaRegistry};
pub use structured::{ErrorFactory, Message, StructuredError};
pub use tree::{EntityInput, RawErrorNode};
