//! Domain error types for message mutation, serialization and registry loading.
//!
//! Uses `thiserror` for ergonomic error handling with typed variants
//! that can be inspected by callers.

use std::sync::Arc;
use thiserror::Error;

/// Errors raised by message operations and the message factory.
///
/// Each variant is a distinct condition a caller can branch on. Every
/// failing operation leaves the message untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// The key is not part of the active variant's vocabulary.
    #[error("invalid key '{0}'")]
    InvalidKey(String),

    /// The value failed validation or sanitization for its key.
    #[error("invalid value {value:?} for key '{key}'")]
    InvalidValue {
        /// The key the value was offered for.
        key: String,
        /// The offending value.
        value: String,
    },

    /// A call argument was malformed, such as an unknown discriminator.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The key already holds a value and overwriting was not requested.
    #[error("key '{0}' already exists")]
    KeyExists(String),

    /// The key holds no value.
    #[error("key '{0}' does not exist")]
    KeyNotExists(String),

    /// The wire text is not a well-formed JSON document.
    #[error("malformed message document: {0}")]
    MalformedJson(String),

    /// The encoder failed to produce JSON text.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl MessageError {
    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument(reason.into())
    }

    /// Returns `true` if the error names a key outside the vocabulary.
    #[must_use]
    pub const fn is_invalid_key(&self) -> bool {
        matches!(self, Self::InvalidKey(_))
    }

    /// Returns `true` if the error names a rejected value.
    #[must_use]
    pub const fn is_invalid_value(&self) -> bool {
        matches!(self, Self::InvalidValue { .. })
    }
}

impl From<serde_json::Error> for MessageError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_eof() {
            Self::MalformedJson(err.to_string())
        } else {
            Self::Serialization(err.to_string())
        }
    }
}

/// Errors that can occur while loading a harmonization document.
#[derive(Debug, Clone, Error)]
pub enum HarmonizationError {
    /// The document could not be read.
    #[error("failed to read harmonization document: {0}")]
    Io(Arc<std::io::Error>),

    /// The document is not valid harmonization JSON.
    #[error("failed to parse harmonization document: {0}")]
    Parse(String),

    /// A field declares a type name that has no rule.
    #[error("unknown type '{type_name}' for field '{key}'")]
    UnknownType {
        /// The field declaring the type.
        key: String,
        /// The unrecognised type name.
        type_name: String,
    },

    /// The same field is declared with different types in two variants.
    #[error("field '{0}' is declared with conflicting types")]
    ConflictingType(String),

    /// A field is also the dotted prefix of another field.
    #[error("field '{key}' is shadowed by nested field '{nested}'")]
    ShadowedKey {
        /// The leaf field.
        key: String,
        /// The field nested beneath it.
        nested: String,
    },

    /// The document declares a reserved key.
    #[error("field '{0}' is reserved")]
    ReservedKey(String),
}

impl HarmonizationError {
    /// Creates a parse error.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

impl From<std::io::Error> for HarmonizationError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}
