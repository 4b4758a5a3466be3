//! Structured errors
//!
//! A [`StructuredError`] is the value handed back to the API layer: a catalog
//! code and name, an optional rendered message, an optional detail map and,
//! for declarative configuration errors, the flattened per-entity records.
//! Values are only ever produced by [`ErrorFactory`].

mod builder;
mod summary;

pub use builder::ErrorFactory;
pub use summary::pretty;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::catalog::ErrorCode;
use crate::flatten::EntityErrorRecord;

/// Canonical structured error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredError {
    #[serde(serialize_with = "serialize_code")]
    code: ErrorCode,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<Map<String, Value>>,
    #[serde(skip)]
    producer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    flattened_errors: Option<Vec<EntityErrorRecord>>,
}

fn serialize_code<S: Serializer>(code: &ErrorCode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u16(code.code())
}

impl StructuredError {
    /// Get the catalog entry
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the error name (catalog name unless overridden)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the rendered message, if any
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Get the per-field detail map, if any
    pub fn fields(&self) -> Option<&Map<String, Value>> {
        self.fields.as_ref()
    }

    /// Get the options detail map (only set for `INVALID_OPTIONS`)
    pub fn options(&self) -> Option<&Map<String, Value>> {
        self.options.as_ref()
    }

    /// Get the id of the backing strategy that raised this error
    pub fn producer(&self) -> Option<&str> {
        self.producer.as_deref()
    }

    /// Get the flattened per-entity records (declarative configuration only)
    pub fn flattened_errors(&self) -> Option<&[EntityErrorRecord]> {
        self.flattened_errors.as_deref()
    }

    /// Attach flattened per-entity records
    pub fn with_flattened_errors(mut self, records: Vec<EntityErrorRecord>) -> Self {
        self.flattened_errors = Some(records);
        self
    }
}

impl std::fmt::Display for StructuredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = self.message.as_deref().unwrap_or(&self.name);
        match &self.producer {
            Some(producer) => write!(f, "[{}] {}", producer, text),
            None => write!(f, "{}", text),
        }
    }
}

impl std::error::Error for StructuredError {}

/// Message argument accepted by [`ErrorFactory::build`]
///
/// An already-built error passes through the builder unchanged, so call
/// sites can forward whatever a nested layer handed them.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    None,
    Text(String),
    Built(Box<StructuredError>),
}

impl From<&str> for Message {
    fn from(s: &str) -> Self {
        Message::Text(s.to_string())
    }
}

impl From<String> for Message {
    fn from(s: String) -> Self {
        Message::Text(s)
    }
}

impl From<Option<String>> for Message {
    fn from(s: Option<String>) -> Self {
        s.map_or(Message::None, Message::Text)
    }
}

impl From<StructuredError> for Message {
    fn from(err: StructuredError) -> Self {
        Message::Built(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare(message: Option<&str>, producer: Option<&str>) -> StructuredError {
        StructuredError {
            code: ErrorCode::NotFound,
            name: ErrorCode::NotFound.name().to_string(),
            message: message.map(str::to_string),
            fields: None,
            options: None,
            producer: producer.map(str::to_string),
            flattened_errors: None,
        }
    }

    #[test]
    fn test_display_with_producer() {
        assert_eq!(bare(Some("gone"), Some("postgres")).to_string(), "[postgres] gone");
    }

    #[test]
    fn test_display_without_producer() {
        assert_eq!(bare(Some("gone"), None).to_string(), "gone");
    }

    #[test]
    fn test_display_falls_back_to_name() {
        assert_eq!(bare(None, None).to_string(), "not found");
        assert_eq!(bare(None, Some("off")).to_string(), "[off] not found");
    }

    #[test]
    fn test_serialize_omits_absent_parts() {
        let json = serde_json::to_value(bare(Some("gone"), Some("postgres"))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "code": 6, "name": "not found", "message": "gone" })
        );
    }
}
