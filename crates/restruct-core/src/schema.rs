//! Typed mapping schema
//!
//! A schema is a JSON object whose keys are output field names. Each value
//! is either a field config `{ path, transform?, default? }` or a nested
//! object `{ type: "object", properties: { ... } }`. The reserved key
//! `filter` holds the row filter of the top-level schema.
//!
//! Copyright (c) 2025 Restruct Team
//! Licensed under the Apache-2.0 license

use crate::filter::Filter;
use crate::path::FieldPath;
use crate::transformer::TransformSpec;
use crate::value::type_name;
use crate::{Error, Result};
use serde_json::{Map, Value};

/// Reserved schema key holding the row filter
pub const FILTER_KEY: &str = "filter";

/// A leaf field: where to read and how to post-process
#[derive(Debug, Clone)]
pub struct FieldConfig {
    /// Fallback chain of candidate paths
    pub paths: Vec<FieldPath>,
    pub transform: Option<TransformSpec>,
    /// `Some(Value::Null)` when the schema declares `"default": null`
    pub default: Option<Value>,
}

#[derive(Debug, Clone)]
pub enum FieldSpec {
    Value(FieldConfig),
    Object(Schema),
}

#[derive(Debug, Clone)]
pub struct SchemaField {
    pub name: String,
    pub spec: FieldSpec,
}

/// Parsed schema; fields keep their declaration order
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<SchemaField>,
    filter: Option<Filter>,
}

impl Schema {
    /// Parse a schema document.
    pub fn parse(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            Error::invalid_input(format!(
                "Schema must be a non-null object, found {}",
                type_name(value)
            ))
        })?;

        let mut schema = Self::parse_properties(object, "")?;
        if let Some(filter) = object.get(FILTER_KEY) {
            schema.filter = Some(Filter::parse(filter)?);
        }
        Ok(schema)
    }

    fn parse_properties(object: &Map<String, Value>, prefix: &str) -> Result<Self> {
        let mut fields = Vec::with_capacity(object.len());

        for (name, config) in object {
            // only the top-level filter takes part in mapping
            if name == FILTER_KEY {
                continue;
            }
            let field = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}.{}", prefix, name)
            };
            fields.push(SchemaField {
                name: name.clone(),
                spec: parse_field(config, &field)?,
            });
        }

        Ok(Self {
            fields,
            filter: None,
        })
    }

    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    /// First field path containing a wildcard, depth first in declaration
    /// order. It drives the cartesian expansion of rows. When no field path
    /// has a wildcard, the first wildcarded filter path is used instead.
    pub fn canonical_path(&self) -> Option<&FieldPath> {
        self.first_wildcard_field_path()
            .or_else(|| self.filter.as_ref().and_then(Filter::first_wildcard_path))
    }

    fn first_wildcard_field_path(&self) -> Option<&FieldPath> {
        self.fields.iter().find_map(|field| match &field.spec {
            FieldSpec::Value(config) => config.paths.iter().find(|p| p.has_wildcard()),
            FieldSpec::Object(nested) => nested.first_wildcard_field_path(),
        })
    }
}

fn parse_field(config: &Value, field: &str) -> Result<FieldSpec> {
    let object = config.as_object().ok_or_else(|| {
        Error::invalid_input(format!("{} must be an object, found {}", field, type_name(config)))
    })?;

    if object.get("type").and_then(Value::as_str) == Some("object") {
        let properties = object
            .get("properties")
            .and_then(Value::as_object)
            .ok_or_else(|| Error::invalid_input(format!("{}.properties missing", field)))?;
        return Ok(FieldSpec::Object(Schema::parse_properties(properties, field)?));
    }

    let paths = match object.get("path") {
        Some(path) => parse_paths(path, field)?,
        None => Vec::new(),
    };
    let transform = match object.get("transform") {
        Some(Value::Null) | None => None,
        Some(spec) => Some(TransformSpec::parse(spec, field)?),
    };

    Ok(FieldSpec::Value(FieldConfig {
        paths,
        transform,
        default: object.get("default").cloned(),
    }))
}

/// Parse a `path` value: a single string or a fallback list of strings.
pub(crate) fn parse_paths(value: &Value, field: &str) -> Result<Vec<FieldPath>> {
    match value {
        Value::String(path) => Ok(vec![FieldPath::parse(path.as_str())]),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(FieldPath::parse).ok_or_else(|| {
                    Error::invalid_input(format!("{}.path entries must be strings", field))
                })
            })
            .collect(),
        other => Err(Error::invalid_input(format!(
            "{}.path must be a string or an array of strings, found {}",
            field,
            type_name(other)
        ))),
    }
}
