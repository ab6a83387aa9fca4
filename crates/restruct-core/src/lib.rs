//! Restruct Core - declarative reshaping of nested JSON documents
//!
//! A mapping schema describes the records to produce: each output field
//! names where to read its value in the source document, how to transform
//! it and what to fall back to. Wildcards in field paths fan out over source
//! arrays, producing one record per combination of array elements.
//!
//! # Main Components
//!
//! - **Paths**: tokenizer, wildcard context extraction and value resolution
//! - **Filters**: row-level predicates over the same paths
//! - **Transforms**: built-in value transforms, pipelines and conditionals
//! - **Mapping**: schema parsing, record building and orchestration
//! - **Validation**: optional pre-flight schema checks
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//!
//! let source = json!({
//!     "client": "acme",
//!     "rows": [{"a": 1, "b": "x"}, {"a": 2, "b": "y"}]
//! });
//! let schema = json!({
//!     "client": {"path": "client"},
//!     "va": {"path": "rows.*.a"},
//!     "vb": {"path": "rows.*.b", "transform": "toUpperCase"},
//!     "filter": {"all": [{"path": "rows.*.a", "gt": 1}]}
//! });
//!
//! let records = restruct_core::map(&source, &schema)?;
//! assert_eq!(records, vec![json!({"client": "acme", "va": 2, "vb": "Y"})]);
//! # Ok::<(), restruct_core::Error>(())
//! ```

pub mod builder;
pub mod condition;
pub mod config;
pub mod error;
pub mod filter;
pub mod mapper;
pub mod path;
pub mod schema;
pub mod transformer;
pub mod validator;
pub mod value;


pub use builder::ObjectBuilder;
pub use condition::{Condition, Operator};
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use filter::{apply_filter, Filter, FilterRule};
pub use mapper::Mapper;
pub use path::{extract_contexts, resolve, Context, FieldPath, PathToken};
pub use schema::{FieldConfig, FieldSpec, Schema, SchemaField};
pub use transformer::{TransformKind, TransformPipeline, TransformRegistry, TransformSpec};
pub use validator::{SchemaValidator, ValidationError, ValidationMode, ValidationSeverity};

use serde_json::Value;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Map `source` through `schema` with the default configuration.
pub fn map(source: &Value, schema: &Value) -> Result<Vec<Value>> {
    Mapper::default().map(source, schema)
}

/// Map `source` through `schema` with an explicit configuration.
pub fn map_with_config(
    source: &Value,
    schema: &Value,
    config: &EngineConfig,
) -> Result<Vec<Value>> {
    Mapper::new(config.clone()).map(source, schema)
}

/// Check a schema document, failing on the first error-level finding.
pub fn validate_schema(schema: &Value) -> Result<()> {
    SchemaValidator::new(schema).validate_strict()
}
