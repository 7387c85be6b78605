//! Error types for keyroute.
//!
//! Errors are organized by domain:
//!
//! - [`ArgumentError`] - Argument lookup, parsing, validation and value resolution
//! - [`ConfigError`] - Configuration file failures
//! - [`DirectoryError`] - Card directory failures
//! - [`CryptoError`] - Failures reported by the crypto collaborator
//! - [`KeyrouteError`] - Top-level error that wraps all of the above
//!
//! # Example
//!
//! ```rust
//! use keyroute_core::error::{ArgumentError, KeyrouteError};
//!
//! fn require(value: Option<&str>) -> Result<&str, KeyrouteError> {
//!     value.ok_or_else(|| ArgumentError::not_found("--in").into())
//! }
//!
//! let err = require(None).unwrap_err();
//! assert_eq!(err.to_string(), "Argument '--in' is not defined.");
//! ```

/// Top-level error type for keyroute.
///
/// Wraps every domain error with automatic conversion via `#[from]`.
/// Argument errors are displayed verbatim since they are the messages a
/// user sees most often.
#[derive(Debug, thiserror::Error)]
pub enum KeyrouteError {
    /// Argument resolution failed.
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Card directory error.
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// Crypto collaborator error.
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

// ============================================================================
// ArgumentError
// ============================================================================

/// Errors raised while resolving command arguments.
///
/// `TypeMismatch` is the only variant that signals a programming fault
/// (an accessor used against the wrong value variant). Every other variant
/// describes bad user input or missing data.
#[derive(Debug, thiserror::Error)]
pub enum ArgumentError {
    /// A required argument was not supplied by any source.
    #[error("Argument '{name}' is not defined.")]
    NotFound {
        /// The argument name (or `{a, b}` for an "any of" read).
        name: String,
    },

    /// Raw input could not be parsed at all.
    #[error("{context}")]
    Parse {
        /// What could not be parsed, with the offending literal.
        context: String,
    },

    /// A token did not have the `key:value[:alias]` shape.
    #[error("Invalid token format: '{token}'. Expected 'key:value[:alias]'.")]
    InvalidToken {
        /// The offending raw token.
        token: String,
    },

    /// A value accessor was used against a value of another kind.
    #[error("Expected {expected}, but found value of the type {actual}.")]
    TypeMismatch {
        /// The kind the caller asked for.
        expected: &'static str,
        /// The kind the value actually holds.
        actual: &'static str,
    },

    /// An argument was supplied with a value outside its domain.
    #[error("Argument '{name}' has unexpected value: '{value}'.")]
    Value {
        /// The argument name.
        name: String,
        /// The rejected value.
        value: String,
    },

    /// An argument failed validation.
    #[error("Argument '{name}' is invalid. {message}")]
    Validation {
        /// The argument name.
        name: String,
        /// The combined validation message.
        message: String,
    },

    /// Every value resolver declined the token.
    #[error("Can not read {kind} from the value: '{token}'.")]
    ValueSourceExhausted {
        /// The kind of domain object requested (e.g. "private key").
        kind: &'static str,
        /// The token, with secrets masked.
        token: String,
    },

    /// A recipient token used an unknown type tag.
    #[error("Invalid recipient type '{tag}'. Expected one of: {}.", valid.join(", "))]
    InvalidRecipient {
        /// The unknown tag.
        tag: String,
        /// Every accepted tag.
        valid: Vec<&'static str>,
    },

    /// A recipient lookup returned nothing.
    #[error("Recipient is not found by {source_type}: '{source_value}'.")]
    RecipientNotFound {
        /// The lookup kind (e.g. "email").
        source_type: String,
        /// The looked up value.
        source_value: String,
    },

    /// A file named by an argument does not exist.
    #[error("File is not found: '{path}'.")]
    FileNotFound {
        /// The missing path.
        path: String,
    },

    /// Reading a file named by an argument failed.
    #[error("{context}: {source}")]
    Io {
        /// What was being read.
        context: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The card directory reported a structural failure.
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),
}

impl ArgumentError {
    /// Create a `NotFound` error.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create a `Parse` error.
    #[must_use]
    pub fn parse(context: impl Into<String>) -> Self {
        Self::Parse {
            context: context.into(),
        }
    }

    /// Create an `InvalidToken` error.
    #[must_use]
    pub fn invalid_token(token: impl Into<String>) -> Self {
        Self::InvalidToken {
            token: token.into(),
        }
    }

    /// Create a `TypeMismatch` error.
    #[must_use]
    pub const fn type_mismatch(expected: &'static str, actual: &'static str) -> Self {
        Self::TypeMismatch { expected, actual }
    }

    /// Create a `Value` error.
    #[must_use]
    pub fn value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Value {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Create a `Validation` error.
    #[must_use]
    pub fn validation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a `ValueSourceExhausted` error.
    #[must_use]
    pub fn value_source_exhausted(kind: &'static str, token: impl Into<String>) -> Self {
        Self::ValueSourceExhausted {
            kind,
            token: token.into(),
        }
    }

    /// Create an `InvalidRecipient` error.
    #[must_use]
    pub fn invalid_recipient(tag: impl Into<String>, valid: &[&'static str]) -> Self {
        Self::InvalidRecipient {
            tag: tag.into(),
            valid: valid.to_vec(),
        }
    }

    /// Create a `RecipientNotFound` error.
    #[must_use]
    pub fn recipient_not_found(
        source_type: impl Into<String>,
        source_value: impl Into<String>,
    ) -> Self {
        Self::RecipientNotFound {
            source_type: source_type.into(),
            source_value: source_value.into(),
        }
    }

    /// Create a `FileNotFound` error.
    #[must_use]
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create an `Io` error.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Returns `true` for errors caused by a programming fault rather than
    /// by user input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}

// ============================================================================
// ConfigError
// ============================================================================

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Failed to parse the configuration file.
    #[error("failed to parse configuration: {context}")]
    ParseFailed {
        /// Context about the parsing failure.
        context: String,
    },

    /// A configuration value is invalid.
    #[error("invalid value for {field}: {value}")]
    InvalidValue {
        /// The field name with the invalid value.
        field: String,
        /// The invalid value.
        value: String,
    },

    /// A required configuration field is missing.
    #[error("missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: String,
    },

    /// The home directory could not be determined.
    #[error("could not determine home directory")]
    NoHomeDirectory,

    /// An I/O error occurred.
    #[error("{context}: {source}")]
    Io {
        /// What was being done.
        context: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Create a `FileNotFound` error.
    #[must_use]
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a `ParseFailed` error.
    #[must_use]
    pub fn parse_failed(context: impl Into<String>) -> Self {
        Self::ParseFailed {
            context: context.into(),
        }
    }

    /// Create an `InvalidValue` error.
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a `MissingField` error.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a `NoHomeDirectory` error.
    #[must_use]
    pub const fn no_home_directory() -> Self {
        Self::NoHomeDirectory
    }

    /// Create an `Io` error.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

// ============================================================================
// DirectoryError
// ============================================================================

/// Errors reported by a card directory.
///
/// `NotFound` is the only variant the value resolution chain treats as a
/// decline; everything else is a structural failure.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// No card matches the request.
    #[error("card not found: {id}")]
    NotFound {
        /// The requested card id or identity.
        id: String,
    },

    /// A card with the same identity already exists.
    #[error("card already exists for identity: {identity}")]
    Conflict {
        /// The conflicting identity.
        identity: String,
    },

    /// A stored card could not be decoded.
    #[error("malformed card {id}: {context}")]
    Malformed {
        /// The card id or file name.
        id: String,
        /// What was wrong with it.
        context: String,
    },

    /// An I/O error occurred.
    #[error("{context}: {source}")]
    Io {
        /// What was being done.
        context: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl DirectoryError {
    /// Create a `NotFound` error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a `Conflict` error.
    #[must_use]
    pub fn conflict(identity: impl Into<String>) -> Self {
        Self::Conflict {
            identity: identity.into(),
        }
    }

    /// Create a `Malformed` error.
    #[must_use]
    pub fn malformed(id: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Malformed {
            id: id.into(),
            context: context.into(),
        }
    }

    /// Create an `Io` error.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Returns `true` if this error means "nothing matched".
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// ============================================================================
// CryptoError
// ============================================================================

/// Errors reported by the crypto collaborator.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// The requested operation is not available for this recipient or backend.
    #[error("unsupported operation: {operation}")]
    Unsupported {
        /// The operation that was requested.
        operation: String,
    },

    /// The operation was attempted and failed.
    #[error("{context}")]
    Failed {
        /// What went wrong.
        context: String,
    },
}

impl CryptoError {
    /// Create an `Unsupported` error.
    #[must_use]
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }

    /// Create a `Failed` error.
    #[must_use]
    pub fn failed(context: impl Into<String>) -> Self {
        Self::Failed {
            context: context.into(),
        }
    }
}

// ============================================================================
// Result type aliases
// ============================================================================

/// A `Result` type alias using [`KeyrouteError`] as the error type.
pub type Result<T> = std::result::Result<T, KeyrouteError>;

/// A `Result` type alias for argument operations.
pub type ArgumentResult<T> = std::result::Result<T, ArgumentError>;

/// A `Result` type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// A `Result` type alias for directory operations.
pub type DirectoryResult<T> = std::result::Result<T, DirectoryError>;

/// A `Result` type alias for crypto collaborator operations.
pub type CryptoResult<T> = std::result::Result<T, CryptoError>;

// ============================================================================
// Unit Tests
// ============================================================================
