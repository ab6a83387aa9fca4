//! Object builder
//!
//! Produces one output record from a parsed [`Schema`] under a fixed
//! wildcard context. Nested objects are built recursively with the same
//! context so every field of a record refers to the same source row.
//!
//! Copyright (c) 2025 Restruct Team
//! Licensed under the Apache-2.0 license

use crate::path::{resolve_value, Context};
use crate::schema::{FieldConfig, FieldSpec, Schema};
use crate::transformer::TransformPipeline;
use crate::Result;
use serde_json::{Map, Value};

/// Builds records for one mapping invocation
pub struct ObjectBuilder<'a> {
    source: &'a Value,
    pipeline: TransformPipeline<'a>,
}

impl<'a> ObjectBuilder<'a> {
    pub fn new(source: &'a Value, pipeline: TransformPipeline<'a>) -> Self {
        Self { source, pipeline }
    }

    /// Build the record for `context`.
    pub fn build(&self, schema: &Schema, context: &Context) -> Result<Map<String, Value>> {
        self.build_object(schema, context, "")
    }

    fn build_object(
        &self,
        schema: &Schema,
        context: &Context,
        prefix: &str,
    ) -> Result<Map<String, Value>> {
        let mut record = Map::with_capacity(schema.fields().len());

        for field in schema.fields() {
            let label = if prefix.is_empty() {
                field.name.clone()
            } else {
                format!("{}.{}", prefix, field.name)
            };
            let value = match &field.spec {
                FieldSpec::Object(nested) => {
                    Value::Object(self.build_object(nested, context, &label)?)
                }
                FieldSpec::Value(config) => self.build_value(config, context, &label)?,
            };
            record.insert(field.name.clone(), value);
        }

        Ok(record)
    }

    fn build_value(&self, config: &FieldConfig, context: &Context, label: &str) -> Result<Value> {
        let mut value = resolve_value(self.source, &config.paths, context);

        if let Some(spec) = &config.transform {
            value = self.pipeline.apply(value, spec, label)?;
        }

        match &config.default {
            Some(default) if value.is_null() => Ok(default.clone()),
            _ => Ok(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::transformer::TransformRegistry;
    use crate::Error;
    use serde_json::json;

    fn build(source: &Value, schema: &Value, context: &Context) -> Result<Value> {
        let registry = TransformRegistry::builtin();
        let config = EngineConfig::default();
        let schema = Schema::parse(schema)?;
        let builder = ObjectBuilder::new(source, TransformPipeline::new(&registry, &config));
        builder.build(&schema, context).map(Value::Object)
    }

    #[test]
    fn test_nested_objects_share_context() {
        let source = json!({"rows": [{"a": 1, "b": "x"}, {"a": 2, "b": "y"}]});
        let schema = json!({
            "a": {"path": "rows.*.a"},
            "inner": {"type": "object", "properties": {"b": {"path": "rows.*.b"}}}
        });
        let record = build(&source, &schema, &Context::from_indices(vec![1])).unwrap();
        assert_eq!(record, json!({"a": 2, "inner": {"b": "y"}}));
    }

    #[test]
    fn test_default_applies_after_transform() {
        let source = json!({"age": "unknown", "name": "  "});
        let schema = json!({
            "age": {"path": "age", "transform": "toNumber", "default": 0},
            "name": {"path": "name", "transform": "toUpperCase", "default": "N/A"},
            "missing": {"path": "nope", "default": null},
            "kept": {"path": "age", "default": "unused"}
        });
        let record = build(&source, &schema, &Context::empty()).unwrap();
        assert_eq!(
            record,
            json!({"age": 0, "name": "N/A", "missing": null, "kept": "unknown"})
        );
    }

    #[test]
    fn test_output_follows_declaration_order() {
        let source = json!({"x": 1, "y": 2});
        let schema = json!({"y": {"path": "y"}, "x": {"path": "x"}});
        let record = build(&source, &schema, &Context::empty()).unwrap();
        let keys: Vec<&String> = record.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["y", "x"]);
    }

    #[test]
    fn test_transform_error_names_nested_field() {
        let source = json!({"meta": {"raw": "{bad"}});
        let schema = json!({
            "meta": {"type": "object", "properties": {
                "parsed": {"path": "meta.raw", "transform": "toJson"}
            }}
        });
        let err = build(&source, &schema, &Context::empty()).unwrap_err();
        assert!(matches!(
            err,
            Error::TransformExecution { ref field, .. } if field == "meta.parsed"
        ));
    }
}
