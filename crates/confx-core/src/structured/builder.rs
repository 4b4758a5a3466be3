use serde_json::{Map, Value};

use super::summary::{pretty, summarize};
use super::{Message, StructuredError};
use crate::catalog::{
    fill, ErrorCode, FOREIGN_KEY_RESTRICTED_TEMPLATE, INVALID_UNIQUE_NAME_TEMPLATE,
    NOT_FOUND_BY_FIELD_TEMPLATE,
};
use crate::errors::{CoreError, Result};
use crate::tree::REFERENCED_BY_KEY;

/// Builds [`StructuredError`] values for one producer
///
/// The producer id names the backing strategy raising the errors and is
/// carried on every error this factory builds.
#[derive(Debug, Clone, Default)]
pub struct ErrorFactory {
    producer: Option<String>,
}

impl ErrorFactory {
    pub fn new(producer: Option<String>) -> Self {
        Self { producer }
    }

    pub fn producer(&self) -> Option<&str> {
        self.producer.as_deref()
    }

    /// Build an error of `code`
    ///
    /// An already-built error passed as `message` is returned unchanged. The
    /// detail map is stored under `options` for `INVALID_OPTIONS` and under
    /// `fields` for every other code.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidArgument`] if `detail` is not a mapping.
    pub fn build(
        &self,
        code: ErrorCode,
        message: impl Into<Message>,
        detail: Option<&Value>,
        name: Option<&str>,
    ) -> Result<StructuredError> {
        let message = match message.into() {
            Message::Built(err) => return Ok(*err),
            Message::Text(text) => Some(text),
            Message::None => None,
        };

        let detail = match detail {
            None => None,
            Some(Value::Object(map)) => Some(map.clone()),
            Some(_) => {
                return Err(CoreError::InvalidArgument {
                    op: "build",
                    arg: "detail",
                    expected: "a table or absent",
                })
            }
        };

        let (fields, options) = if code == ErrorCode::InvalidOptions {
            (None, detail)
        } else {
            (detail, None)
        };

        Ok(StructuredError {
            code,
            name: name.map_or_else(|| code.name().to_string(), str::to_string),
            message,
            fields,
            options,
            producer: self.producer.clone(),
            flattened_errors: None,
        })
    }

    /// Build from loosely-typed parts, as received from a dynamic caller
    ///
    /// # Errors
    /// Returns a contract fault if the code is absent or unknown, if the
    /// message is present but not a string, or if the detail is present but
    /// not a mapping.
    pub fn build_raw(
        &self,
        code: Option<u16>,
        message: Option<&Value>,
        detail: Option<&Value>,
        name: Option<&str>,
    ) -> Result<StructuredError> {
        let code = ErrorCode::lookup(code.ok_or(CoreError::MissingCode)?)?;
        let message = match message {
            None | Some(Value::Null) => Message::None,
            Some(Value::String(text)) => Message::Text(text.clone()),
            Some(_) => {
                return Err(CoreError::InvalidArgument {
                    op: "build",
                    arg: "message",
                    expected: "a string or absent",
                })
            }
        };
        self.build(code, message, detail, name)
    }

    /// Build a message-less error from a catalog constant (e.g. `not_found`)
    ///
    /// # Errors
    /// Returns [`CoreError::UnknownName`] if the name is not in the catalog.
    pub fn by_name(&self, name: &str) -> Result<StructuredError> {
        self.build(ErrorCode::lookup_name(name)?, Message::None, None, None)
    }

    // ========== Per-operation constructors ==========

    pub fn invalid_primary_key(&self, primary_key: &Value) -> Result<StructuredError> {
        self.keyed(ErrorCode::InvalidPrimaryKey, "invalid_primary_key", "primary_key", primary_key)
    }

    pub fn invalid_foreign_key(&self, foreign_key: &Value) -> Result<StructuredError> {
        self.keyed(ErrorCode::InvalidForeignKey, "invalid_foreign_key", "foreign_key", foreign_key)
    }

    pub fn primary_key_violation(&self, primary_key: &Value) -> Result<StructuredError> {
        self.keyed(
            ErrorCode::PrimaryKeyViolation,
            "primary_key_violation",
            "primary_key",
            primary_key,
        )
    }

    pub fn unique_violation(&self, unique_key: &Value) -> Result<StructuredError> {
        self.keyed(ErrorCode::UniqueViolation, "unique_violation", "unique_key", unique_key)
    }

    pub fn not_found(&self, primary_key: &Value) -> Result<StructuredError> {
        self.keyed(ErrorCode::NotFound, "not_found", "primary_key", primary_key)
    }

    pub fn not_found_by_field(&self, filter: &Value) -> Result<StructuredError> {
        require_table("not_found_by_field", "filter", filter)?;
        let message = fill(NOT_FOUND_BY_FIELD_TEMPLATE, &[&pretty(filter)]);
        self.build(ErrorCode::NotFound, message, Some(filter), None)
    }

    /// A child row points at a parent that does not exist
    pub fn foreign_key_violation_invalid_reference(
        &self,
        foreign_key: &Value,
        field_name: &str,
        parent_name: &str,
    ) -> Result<StructuredError> {
        require_table("foreign_key_violation_invalid_reference", "foreign_key", foreign_key)?;
        let code = ErrorCode::ForeignKeyViolation;
        let message = fill(code.template(), &[&pretty(foreign_key), parent_name]);
        let mut detail = Map::new();
        detail.insert(field_name.to_string(), foreign_key.clone());
        self.build(code, message, Some(&Value::Object(detail)), None)
    }

    /// A parent row cannot be removed while a child still references it
    pub fn foreign_key_violation_restricted(
        &self,
        parent_name: &str,
        child_name: &str,
    ) -> Result<StructuredError> {
        let message = fill(FOREIGN_KEY_RESTRICTED_TEMPLATE, &[child_name, parent_name]);
        let mut detail = Map::new();
        detail.insert(REFERENCED_BY_KEY.to_string(), Value::from(child_name));
        self.build(
            ErrorCode::ForeignKeyViolation,
            message,
            Some(&Value::Object(detail)),
            None,
        )
    }

    pub fn invalid_offset(&self, offset: &str, err: &str) -> Result<StructuredError> {
        let code = ErrorCode::InvalidOffset;
        self.build(code, fill(code.template(), &[offset, err]), None, None)
    }

    pub fn database_error(&self, err: Option<&str>) -> Result<StructuredError> {
        self.build(ErrorCode::DatabaseError, err.map(str::to_string), None, None)
    }

    pub fn transformation_error(&self, err: &str) -> Result<StructuredError> {
        self.build(ErrorCode::TransformationError, err, None, None)
    }

    pub fn invalid_size(&self, err: &str) -> Result<StructuredError> {
        self.build(ErrorCode::InvalidSize, err, None, None)
    }

    /// A unique lookup on `field_name` was given an unusable value
    pub fn invalid_unique(&self, field_name: &str, err: &str) -> Result<StructuredError> {
        let name = fill(INVALID_UNIQUE_NAME_TEMPLATE, &[field_name]);
        self.build(ErrorCode::InvalidUnique, err, None, Some(&name))
    }

    pub fn invalid_options(&self, errors: &Value) -> Result<StructuredError> {
        self.summarized(ErrorCode::InvalidOptions, "invalid_options", errors)
    }

    pub fn schema_violation(&self, errors: &Value) -> Result<StructuredError> {
        self.summarized(ErrorCode::SchemaViolation, "schema_violation", errors)
    }

    pub fn foreign_keys_unresolved(&self, errors: &Value) -> Result<StructuredError> {
        self.summarized(ErrorCode::ForeignKeysUnresolved, "foreign_keys_unresolved", errors)
    }

    pub fn operation_unsupported(&self, err: &str) -> Result<StructuredError> {
        self.build(ErrorCode::OperationUnsupported, err, None, None)
    }

    /// Wrap a whole declarative configuration error tree
    pub fn declarative_config(&self, errors: &Value) -> Result<StructuredError> {
        require_table("declarative_config", "errors", errors)?;
        let code = ErrorCode::DeclarativeConfig;
        let message = fill(code.template(), &[&pretty(errors)]);
        self.build(code, message, Some(errors), None)
    }

    pub fn invalid_workspace(&self, workspace_id: &str) -> Result<StructuredError> {
        let code = ErrorCode::InvalidWorkspace;
        self.build(code, fill(code.template(), &[workspace_id]), None, None)
    }

    pub fn invalid_unique_global(&self, name: &str) -> Result<StructuredError> {
        let code = ErrorCode::InvalidUniqueGlobal;
        self.build(code, fill(code.template(), &[name]), None, None)
    }

    fn keyed(
        &self,
        code: ErrorCode,
        op: &'static str,
        arg: &'static str,
        key: &Value,
    ) -> Result<StructuredError> {
        require_table(op, arg, key)?;
        let message = fill(code.template(), &[&pretty(key)]);
        self.build(code, message, Some(key), None)
    }

    fn summarized(
        &self,
        code: ErrorCode,
        op: &'static str,
        errors: &Value,
    ) -> Result<StructuredError> {
        let detail = require_table(op, "errors", errors)?;
        let message = summarize(code, detail);
        self.build(code, message, Some(errors), None)
    }
}

fn require_table<'a>(op: &'static str, arg: &'static str, value: &'a Value) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| CoreError::expected_table(op, arg))
}
