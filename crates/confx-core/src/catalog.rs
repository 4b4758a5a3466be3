//! Error catalog
//!
//! The integer codes, names and constants below are part of the external API
//! contract: API clients match on them. Codes are never renumbered and names
//! are never changed once published.
//!
//! Message templates use `{}` as a positional placeholder and are rendered
//! with [`fill`].

use crate::errors::{CoreError, Result};

/// Template used by the restricted-by-child foreign key violation.
pub const FOREIGN_KEY_RESTRICTED_TEMPLATE: &str = "an existing '{}' entity references this '{}' entity";

/// Template used by the not-found-by-filter constructor.
pub const NOT_FOUND_BY_FIELD_TEMPLATE: &str = "could not find the entity with '{}'";

/// Name template for a field-scoped invalid unique error.
pub const INVALID_UNIQUE_NAME_TEMPLATE: &str = "invalid unique {}";

/// Canonical error kind catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorCode {
    InvalidPrimaryKey,
    SchemaViolation,
    PrimaryKeyViolation,
    ForeignKeyViolation,
    UniqueViolation,
    NotFound,
    InvalidOffset,
    DatabaseError,
    InvalidSize,
    InvalidUnique,
    InvalidOptions,
    OperationUnsupported,
    ForeignKeysUnresolved,
    DeclarativeConfig,
    TransformationError,
    InvalidForeignKey,
    InvalidWorkspace,
    InvalidUniqueGlobal,
}

impl ErrorCode {
    /// Every catalog entry, in code order
    pub const ALL: [ErrorCode; 18] = [
        ErrorCode::InvalidPrimaryKey,
        ErrorCode::SchemaViolation,
        ErrorCode::PrimaryKeyViolation,
        ErrorCode::ForeignKeyViolation,
        ErrorCode::UniqueViolation,
        ErrorCode::NotFound,
        ErrorCode::InvalidOffset,
        ErrorCode::DatabaseError,
        ErrorCode::InvalidSize,
        ErrorCode::InvalidUnique,
        ErrorCode::InvalidOptions,
        ErrorCode::OperationUnsupported,
        ErrorCode::ForeignKeysUnresolved,
        ErrorCode::DeclarativeConfig,
        ErrorCode::TransformationError,
        ErrorCode::InvalidForeignKey,
        ErrorCode::InvalidWorkspace,
        ErrorCode::InvalidUniqueGlobal,
    ];

    /// Get the stable integer code
    pub fn code(&self) -> u16 {
        match self {
            ErrorCode::InvalidPrimaryKey => 1,
            ErrorCode::SchemaViolation => 2,
            ErrorCode::PrimaryKeyViolation => 3,
            ErrorCode::ForeignKeyViolation => 4,
            ErrorCode::UniqueViolation => 5,
            ErrorCode::NotFound => 6,
            ErrorCode::InvalidOffset => 7,
            ErrorCode::DatabaseError => 8,
            ErrorCode::InvalidSize => 9,
            ErrorCode::InvalidUnique => 10,
            ErrorCode::InvalidOptions => 11,
            ErrorCode::OperationUnsupported => 12,
            ErrorCode::ForeignKeysUnresolved => 13,
            ErrorCode::DeclarativeConfig => 14,
            ErrorCode::TransformationError => 15,
            ErrorCode::InvalidForeignKey => 16,
            ErrorCode::InvalidWorkspace => 17,
            ErrorCode::InvalidUniqueGlobal => 18,
        }
    }

    /// Get the canonical human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            ErrorCode::InvalidPrimaryKey => "invalid primary key",
            ErrorCode::SchemaViolation => "schema violation",
            ErrorCode::PrimaryKeyViolation => "primary key violation",
            ErrorCode::ForeignKeyViolation => "foreign key violation",
            ErrorCode::UniqueViolation => "unique constraint violation",
            ErrorCode::NotFound => "not found",
            ErrorCode::InvalidOffset => "invalid offset",
            ErrorCode::DatabaseError => "database error",
            ErrorCode::InvalidSize => "invalid size",
            ErrorCode::InvalidUnique => "invalid unique",
            ErrorCode::InvalidOptions => "invalid options",
            ErrorCode::OperationUnsupported => "operation unsupported",
            ErrorCode::ForeignKeysUnresolved => "foreign keys unresolved",
            ErrorCode::DeclarativeConfig => "invalid declarative configuration",
            ErrorCode::TransformationError => "transformation error",
            ErrorCode::InvalidForeignKey => "invalid foreign key",
            ErrorCode::InvalidWorkspace => "invalid workspace",
            ErrorCode::InvalidUniqueGlobal => "invalid global query",
        }
    }

    /// Get the constant-style identifier (e.g. `SCHEMA_VIOLATION`)
    pub fn constant(&self) -> &'static str {
        match self {
            ErrorCode::InvalidPrimaryKey => "INVALID_PRIMARY_KEY",
            ErrorCode::SchemaViolation => "SCHEMA_VIOLATION",
            ErrorCode::PrimaryKeyViolation => "PRIMARY_KEY_VIOLATION",
            ErrorCode::ForeignKeyViolation => "FOREIGN_KEY_VIOLATION",
            ErrorCode::UniqueViolation => "UNIQUE_VIOLATION",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InvalidOffset => "INVALID_OFFSET",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InvalidSize => "INVALID_SIZE",
            ErrorCode::InvalidUnique => "INVALID_UNIQUE",
            ErrorCode::InvalidOptions => "INVALID_OPTIONS",
            ErrorCode::OperationUnsupported => "OPERATION_UNSUPPORTED",
            ErrorCode::ForeignKeysUnresolved => "FOREIGN_KEYS_UNRESOLVED",
            ErrorCode::DeclarativeConfig => "DECLARATIVE_CONFIG",
            ErrorCode::TransformationError => "TRANSFORMATION_ERROR",
            ErrorCode::InvalidForeignKey => "INVALID_FOREIGN_KEY",
            ErrorCode::InvalidWorkspace => "INVALID_WORKSPACE",
            ErrorCode::InvalidUniqueGlobal => "INVALID_UNIQUE_GLOBAL",
        }
    }

    /// Get the message template
    ///
    /// Kinds whose message is the caller-supplied text verbatim use `"{}"`.
    pub fn template(&self) -> &'static str {
        match self {
            ErrorCode::InvalidPrimaryKey => "invalid primary key: '{}'",
            ErrorCode::SchemaViolation => "schema violation ({})",
            ErrorCode::PrimaryKeyViolation => "primary key violation on key '{}'",
            ErrorCode::ForeignKeyViolation => {
                "the foreign key '{}' does not reference an existing '{}' entity."
            }
            ErrorCode::UniqueViolation => "UNIQUE violation detected on '{}'",
            ErrorCode::NotFound => "could not find the entity with primary key '{}'",
            ErrorCode::InvalidOffset => "'{}' is not a valid offset: {}",
            ErrorCode::InvalidOptions => "invalid option ({})",
            ErrorCode::ForeignKeysUnresolved => "foreign key unresolved ({})",
            ErrorCode::DeclarativeConfig => "declarative config is invalid: {}",
            ErrorCode::InvalidForeignKey => "invalid foreign key: '{}'",
            ErrorCode::InvalidWorkspace => "invalid workspace '{}'",
            ErrorCode::InvalidUniqueGlobal => "unique key {} is invalid for global query",
            ErrorCode::DatabaseError
            | ErrorCode::InvalidSize
            | ErrorCode::InvalidUnique
            | ErrorCode::OperationUnsupported
            | ErrorCode::TransformationError => "{}",
        }
    }

    /// Get the plural summary template, for kinds that summarize a detail map
    ///
    /// The first placeholder takes the number of entries.
    pub fn plural_template(&self) -> Option<&'static str> {
        match self {
            ErrorCode::SchemaViolation => Some("{} schema violations ({})"),
            ErrorCode::InvalidOptions => Some("{} option violations ({})"),
            ErrorCode::ForeignKeysUnresolved => Some("{} foreign keys unresolved ({})"),
            _ => None,
        }
    }

    /// Look up a catalog entry by its integer code
    pub fn from_code(code: u16) -> Option<ErrorCode> {
        ErrorCode::ALL.iter().copied().find(|c| c.code() == code)
    }

    /// Look up a catalog entry by constant, accepting either
    /// `SCHEMA_VIOLATION` or `schema_violation`
    pub fn from_constant(name: &str) -> Option<ErrorCode> {
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|c| c.constant().eq_ignore_ascii_case(name))
    }

    /// Like [`ErrorCode::from_code`], failing with a contract fault
    pub fn lookup(code: u16) -> Result<ErrorCode> {
        ErrorCode::from_code(code).ok_or(CoreError::UnknownCode { code })
    }

    /// Like [`ErrorCode::from_constant`], failing with a contract fault
    pub fn lookup_name(name: &str) -> Result<ErrorCode> {
        ErrorCode::from_constant(name).ok_or_else(|| CoreError::UnknownName {
            name: name.to_string(),
        })
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Render a template by substituting each `{}` with the next argument
///
/// Missing arguments render as empty; surplus arguments are ignored.
pub fn fill(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut rest = template;
    while let Some(pos) = rest.find("{}") {
        out.push_str(&rest[..pos]);
        if let Some(arg) = args.next() {
            out.push_str(arg);
        }
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_contiguous() {
        for (i, code) in ErrorCode::ALL.iter().enumerate() {
            assert_eq!(code.code() as usize, i + 1);
        }
    }

    #[test]
    fn test_from_constant_accepts_lowercase() {
        assert_eq!(
            ErrorCode::from_constant("schema_violation"),
            Some(ErrorCode::SchemaViolation)
        );
        assert_eq!(
            ErrorCode::from_constant("DECLARATIVE_CONFIG"),
            Some(ErrorCode::DeclarativeConfig)
        );
        assert_eq!(ErrorCode::from_constant("nope"), None);
    }

    #[test]
    fn test_fill() {
        assert_eq!(fill("a {} b {}", &["1", "2"]), "a 1 b 2");
        assert_eq!(fill("{}", &["only"]), "only");
        assert_eq!(fill("x {} y", &[]), "x  y");
        assert_eq!(fill("plain", &["ignored"]), "plain");
    }

    #[test]
    fn test_lookup_unknown_code_is_fault() {
        assert_eq!(
            ErrorCode::lookup(0),
            Err(CoreError::UnknownCode { code: 0 })
        );
        assert_eq!(ErrorCode::lookup(19), Err(CoreError::UnknownCode { code: 19 }));
        assert_eq!(ErrorCode::lookup(14), Ok(ErrorCode::DeclarativeConfig));
    }
}
