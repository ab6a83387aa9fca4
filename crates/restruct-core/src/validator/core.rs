//! Schema validator
//!
//! Runs every structural check over the raw schema document before it is
//! parsed, reporting all findings instead of stopping at the first one.
//!
//! Copyright (c) 2025 Restruct Team
//! Licensed under the Apache-2.0 license

use super::field_validators::validate_properties;
use super::{ValidationError, ValidationMode};
use crate::value::type_name;
use crate::{Error, Result};
use serde_json::Value;

/// Root location of every finding
pub const SCHEMA_ROOT: &str = "schema";

/// Checks a schema document for problems that would fail or be ignored at
/// mapping time
pub struct SchemaValidator<'a> {
    schema: &'a Value,
    validation_mode: ValidationMode,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(schema: &'a Value) -> Self {
        Self::with_mode(schema, ValidationMode::default())
    }

    pub fn with_mode(schema: &'a Value, mode: ValidationMode) -> Self {
        Self {
            schema,
            validation_mode: mode,
        }
    }

    /// Collect all findings allowed by the validation mode.
    pub fn validate(&self) -> Vec<ValidationError> {
        let errors = match self.schema.as_object() {
            Some(properties) => validate_properties(properties, SCHEMA_ROOT, true),
            None => vec![ValidationError::error(
                SCHEMA_ROOT,
                format!("must be an object, found {}", type_name(self.schema)),
            )],
        };

        for finding in errors.iter().filter(|e| !e.is_error()) {
            log::warn!("{}", finding);
        }
        log::debug!("schema validation produced {} finding(s)", errors.len());

        self.filter_errors_by_mode(errors)
    }

    /// Fail with the first error-level finding, if any.
    pub fn validate_strict(&self) -> Result<()> {
        match self.validate().into_iter().find(ValidationError::is_error) {
            Some(error) => {
                let message = match &error.expected {
                    Some(expected) => format!("{} (expected {})", error.message, expected),
                    None => error.message,
                };
                Err(Error::schema(error.field_path, message))
            }
            None => Ok(()),
        }
    }

    fn filter_errors_by_mode(&self, errors: Vec<ValidationError>) -> Vec<ValidationError> {
        match self.validation_mode {
            ValidationMode::Strict => errors,
            ValidationMode::Lenient => {
                errors.into_iter().filter(ValidationError::is_error).collect()
            }
        }
    }
}
