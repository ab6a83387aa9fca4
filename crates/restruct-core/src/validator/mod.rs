//! Schema validation
//!
//! Optional pre-flight checking of schema documents. Mapping never requires
//! it; enable [`EngineConfig::validate_schema`](crate::EngineConfig) or call
//! [`validate_schema`](crate::validate_schema) directly.
//!
//! - `types`: findings, severities and modes
//! - `core`: the [`SchemaValidator`] driver
//! - `field_validators`: checks for fields, paths, transforms and filters
//!
//! Copyright (c) 2025 Restruct Team
//! Licensed under the Apache-2.0 license

pub mod core;
pub mod field_validators;
pub mod types;


pub use self::core::SchemaValidator;
pub use types::{ValidationError, ValidationMode, ValidationSeverity};
