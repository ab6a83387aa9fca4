//! Value transformation system
//!
//! Field values resolved from the source document pass through an optional
//! transform specification before defaults are applied.
//!
//! # Module Organization
//!
//! - [`types`] - transform kinds, parsed specifications and step context
//! - [`pipeline`] - applies specifications (pipelines and conditionals)
//! - [`registry`] - immutable name → function table
//! - [`built_in`] - the built-in transform functions
//! - [`datetime`] - date parsing and day.js-style formatting
//!
//! # Examples
//!
//! ```
//! use restruct_core::{EngineConfig, TransformPipeline, TransformRegistry, TransformSpec};
//! use serde_json::json;
//!
//! let registry = TransformRegistry::builtin();
//! let config = EngineConfig::default();
//! let pipeline = TransformPipeline::new(&registry, &config);
//!
//! let steps = json!(["regex:v(\\d+)\\.(\\d+):2", "toNumber"]);
//! let spec = TransformSpec::parse(&steps, "version").unwrap();
//! let minor = pipeline.apply(json!("v1.42"), &spec, "version").unwrap();
//! assert_eq!(minor, json!(42));
//! ```
//!
//! Copyright (c) 2025 Restruct Team
//! Licensed under the Apache-2.0 license

pub mod built_in;
pub mod datetime;
pub mod pipeline;
pub mod registry;
pub mod types;


pub use pipeline::TransformPipeline;
pub use registry::TransformRegistry;
pub use types::{
    ConditionalTransform, TransformContext, TransformKind, TransformParams, TransformSpec,
    TransformStep, TransformerFunction, WhenBranch,
};
