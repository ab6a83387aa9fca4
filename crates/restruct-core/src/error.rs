//! Error types for the restruct core library
//!
//! This module defines the error handling system for the mapping engine,
//! using thiserror for ergonomic error definitions and anyhow for flexible
//! error contexts on configuration loading.
//!
//! Copyright (c) 2025 Restruct Team
//! Licensed under the Apache-2.0 license

use thiserror::Error;

/// Main error type for restruct operations
///
/// Every variant is fatal to the mapping invocation that raised it; the engine
/// never returns a partially built output array.
#[derive(Error, Debug)]
pub enum Error {
    /// Source or schema is not a usable structured value
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Raised by the schema validation pass
    #[error("Schema validation error: {message}")]
    SchemaValidation { message: String, field: String },

    /// A transform step names a transform that is not registered
    #[error("Unknown transform \"{name}\" at {field}")]
    UnknownTransform { name: String, field: String },

    /// A registered transform failed on its input
    #[error("Transform \"{transform}\" failed at {field}: {message}")]
    TransformExecution {
        transform: String,
        field: String,
        message: String,
    },

    /// A regular expression in a transform, condition or filter did not compile
    #[error("Invalid regex pattern \"{pattern}\" at {field}: {source}")]
    InvalidRegex {
        pattern: String,
        field: String,
        #[source]
        source: regex::Error,
    },

    /// Cartesian expansion produced more contexts than the configured limit
    #[error("Context limit exceeded: path \"{path}\" expands to more than {limit} rows")]
    ContextLimit { path: String, limit: usize },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn schema(field: impl Into<String>, message: impl Into<String>) -> Self {
        let field = field.into();
        Error::SchemaValidation {
            message: format!("{} {}", field, message.into()),
            field,
        }
    }

    pub(crate) fn invalid_regex(
        pattern: impl Into<String>,
        field: impl Into<String>,
        source: regex::Error,
    ) -> Self {
        Error::InvalidRegex {
            pattern: pattern.into(),
            field: field.into(),
            source,
        }
    }
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Configuration {
            message: err.to_string(),
            source: Some(err),
        }
    }
}
