use thiserror::Error;

/// Result type alias using CoreError
pub type Result<T> = std::result::Result<T, CoreError>;

/// Contract faults raised by this crate
///
/// Every variant describes a caller bug (a wrong argument shape, an unknown
/// error code, a top-level input that is not a mapping). Malformed pieces of
/// otherwise valid data never surface here; the flattener logs and skips them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// No error code was supplied to the builder
    #[error("missing code")]
    MissingCode,

    /// The numeric code is not part of the catalog
    #[error("unknown error code: {code}")]
    UnknownCode { code: u16 },

    /// The name does not resolve to a catalog entry
    #[error("unknown error name: {name}")]
    UnknownName { name: String },

    /// A builder operation received an argument of the wrong shape
    #[error("{op}: {arg} must be {expected}")]
    InvalidArgument {
        op: &'static str,
        arg: &'static str,
        expected: &'static str,
    },

    /// A top-level flattener input is not a mapping
    #[error("{op}: {arg} must be a mapping")]
    InvalidInput { op: &'static str, arg: &'static str },
}

impl CoreError {
    /// Get the stable error code for this fault
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::MissingCode => "ERR_MISSING_CODE",
            CoreError::UnknownCode { .. } => "ERR_UNKNOWN_CODE",
            CoreError::UnknownName { .. } => "ERR_UNKNOWN_NAME",
            CoreError::InvalidArgument { .. } => "ERR_INVALID_ARGUMENT",
            CoreError::InvalidInput { .. } => "ERR_INVALID_INPUT",
        }
    }

    pub(crate) fn expected_table(op: &'static str, arg: &'static str) -> Self {
        CoreError::InvalidArgument {
            op,
            arg,
            expected: "a table",
        }
    }
}
