//! Validation result types
//!
//! Copyright (c) 2025 Restruct Team
//! Licensed under the Apache-2.0 license

use std::fmt;

/// A schema problem with the location it was found at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted location inside the schema document, rooted at `schema`
    pub field_path: String,
    pub message: String,
    pub expected: Option<String>,
    pub severity: ValidationSeverity,
}

impl ValidationError {
    pub fn error(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field_path: field_path.into(),
            message: message.into(),
            expected: None,
            severity: ValidationSeverity::Error,
        }
    }

    pub fn warning(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: ValidationSeverity::Warning,
            ..Self::error(field_path, message)
        }
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == ValidationSeverity::Error
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field_path, self.message)?;
        if let Some(expected) = &self.expected {
            write!(f, " (expected {})", expected)?;
        }
        Ok(())
    }
}

/// Severity levels for validation findings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationSeverity {
    /// The schema cannot be mapped
    Error,
    /// The schema maps, but part of it is ignored
    Warning,
}

/// Which findings [`SchemaValidator::validate`](super::SchemaValidator::validate) reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Errors and warnings
    #[default]
    Strict,
    /// Errors only
    Lenient,
}
