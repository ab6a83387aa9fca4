//! Mapping orchestrator
//!
//! Drives one invocation: derive the canonical path from the schema,
//! enumerate its wildcard contexts, drop the contexts rejected by the
//! schema filter and build one record per surviving context.
//!
//! Copyright (c) 2025 Restruct Team
//! Licensed under the Apache-2.0 license

use crate::builder::ObjectBuilder;
use crate::config::EngineConfig;
use crate::filter::apply_filter;
use crate::path::{extract_contexts_limited, Context};
use crate::schema::Schema;
use crate::transformer::{TransformPipeline, TransformRegistry};
use crate::validator::SchemaValidator;
use crate::value::type_name;
use crate::{Error, Result};
use serde_json::Value;
use tracing::{debug, debug_span};

/// Reusable mapping engine; holds no per-invocation state
#[derive(Debug, Clone, Default)]
pub struct Mapper {
    config: EngineConfig,
    registry: TransformRegistry,
}

impl Mapper {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            registry: TransformRegistry::builtin(),
        }
    }

    /// Use a custom transform table.
    pub fn with_registry(mut self, registry: TransformRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Map `source` through the schema document `schema`.
    pub fn map(&self, source: &Value, schema: &Value) -> Result<Vec<Value>> {
        if !matches!(source, Value::Object(_) | Value::Array(_)) {
            return Err(Error::invalid_input(format!(
                "Source must be a non-null object, found {}",
                type_name(source)
            )));
        }
        if !schema.is_object() {
            return Err(Error::invalid_input(format!(
                "Schema must be a non-null object, found {}",
                type_name(schema)
            )));
        }

        if self.config.validate_schema {
            SchemaValidator::new(schema).validate_strict()?;
        }

        let schema = Schema::parse(schema)?;
        self.map_schema(source, &schema)
    }

    /// Map `source` through an already parsed schema.
    pub fn map_schema(&self, source: &Value, schema: &Schema) -> Result<Vec<Value>> {
        let canonical = schema.canonical_path();
        let span = debug_span!(
            "map",
            canonical = canonical.map(|p| p.as_str()).unwrap_or("<none>")
        );
        let _enter = span.enter();

        let contexts: Vec<Context> = match canonical {
            Some(path) => extract_contexts_limited(source, path, self.config.max_contexts)?
                .into_iter()
                .map(|extracted| extracted.context)
                .collect(),
            None => vec![Context::empty()],
        };
        debug!(contexts = contexts.len(), "extracted contexts");

        let pipeline = TransformPipeline::new(&self.registry, &self.config);
        let builder = ObjectBuilder::new(source, pipeline);
        let mut records = Vec::with_capacity(contexts.len());
        for context in &contexts {
            if !apply_filter(source, context, schema.filter()) {
                log::trace!("context {} rejected by filter", context);
                continue;
            }
            records.push(Value::Object(builder.build(schema, context)?));
        }

        debug!(records = records.len(), "mapping complete");
        Ok(records)
    }
}
