//! Core types for the transform system
//!
//! Transform specifications arrive as JSON in one of three shapes: a step
//! string (`"toNumber"`, `"regex:(\\d+):1"`), an array of specifications
//! applied left to right, or a conditional object with `when` branches.
//! They are parsed once into [`TransformSpec`].
//!
//! Copyright (c) 2025 Restruct Team
//! Licensed under the Apache-2.0 license

use crate::condition::Condition;
use crate::config::EngineConfig;
use crate::value::type_name;
use crate::{Error, Result};
use chrono_tz::Tz;
use regex::Regex;
use serde_json::Value;
use std::fmt;

/// Every transform the engine knows by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {
    ToNumber,
    ToDateTime,
    CurrentDateTime,
    ToLowerCase,
    ToUpperCase,
    ToTitleCase,
    ToSentenceCase,
    ToCamelCase,
    ToSnakeCase,
    ToKebabCase,
    ToPascalCase,
    ToLowerFirst,
    ToUpperFirst,
    ToCapitalize,
    ToJson,
    ToString,
    ToBoolean,
    Regex,
    Prefix,
    Postfix,
}

impl TransformKind {
    pub const ALL: [TransformKind; 20] = [
        TransformKind::ToNumber,
        TransformKind::ToDateTime,
        TransformKind::CurrentDateTime,
        TransformKind::ToLowerCase,
        TransformKind::ToUpperCase,
        TransformKind::ToTitleCase,
        TransformKind::ToSentenceCase,
        TransformKind::ToCamelCase,
        TransformKind::ToSnakeCase,
        TransformKind::ToKebabCase,
        TransformKind::ToPascalCase,
        TransformKind::ToLowerFirst,
        TransformKind::ToUpperFirst,
        TransformKind::ToCapitalize,
        TransformKind::ToJson,
        TransformKind::ToString,
        TransformKind::ToBoolean,
        TransformKind::Regex,
        TransformKind::Prefix,
        TransformKind::Postfix,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            TransformKind::ToNumber => "toNumber",
            TransformKind::ToDateTime => "toDateTime",
            TransformKind::CurrentDateTime => "currentDateTime",
            TransformKind::ToLowerCase => "toLowerCase",
            TransformKind::ToUpperCase => "toUpperCase",
            TransformKind::ToTitleCase => "toTitleCase",
            TransformKind::ToSentenceCase => "toSentenceCase",
            TransformKind::ToCamelCase => "toCamelCase",
            TransformKind::ToSnakeCase => "toSnakeCase",
            TransformKind::ToKebabCase => "toKebabCase",
            TransformKind::ToPascalCase => "toPascalCase",
            TransformKind::ToLowerFirst => "toLowerFirst",
            TransformKind::ToUpperFirst => "toUpperFirst",
            TransformKind::ToCapitalize => "toCapitalize",
            TransformKind::ToJson => "toJson",
            TransformKind::ToString => "toString",
            TransformKind::ToBoolean => "toBoolean",
            TransformKind::Regex => "regex",
            TransformKind::Prefix => "prefix",
            TransformKind::Postfix => "postfix",
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters parsed from the text after the transform name
#[derive(Debug, Clone)]
pub enum TransformParams {
    None,
    /// `regex:<pattern>[:<group>]`
    Regex { pattern: Regex, group: usize },
    /// `toDateTime[:<format>[:<timezone>]]`
    DateTime {
        format: Option<String>,
        timezone: Option<Tz>,
    },
    /// `prefix:<text>` / `postfix:<text>`
    Text(String),
}

/// One named step, e.g. `toDateTime:YYYY-MM-DD:Asia/Tokyo`
#[derive(Debug, Clone)]
pub struct TransformStep {
    pub kind: TransformKind,
    pub params: TransformParams,
    raw: String,
}

impl TransformStep {
    /// Parse a step string. Unknown names are an error.
    pub fn parse(raw: &str, field: &str) -> Result<Self> {
        let (name, rest) = match raw.split_once(':') {
            Some((name, rest)) => (name, Some(rest)),
            None => (raw, None),
        };

        let kind = TransformKind::from_name(name).ok_or_else(|| Error::UnknownTransform {
            name: name.to_string(),
            field: field.to_string(),
        })?;

        let params = match (kind, rest) {
            (TransformKind::Regex, rest) => parse_regex_params(rest.unwrap_or(""), field)?,
            (TransformKind::ToDateTime, Some(rest)) => parse_datetime_params(rest),
            (TransformKind::ToDateTime, None) => TransformParams::DateTime {
                format: None,
                timezone: None,
            },
            (TransformKind::Prefix | TransformKind::Postfix, rest) => {
                TransformParams::Text(rest.unwrap_or("").to_string())
            }
            _ => TransformParams::None,
        };

        Ok(Self {
            kind,
            params,
            raw: raw.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn parse_regex_params(rest: &str, field: &str) -> Result<TransformParams> {
    let (pattern, group) = match rest.rsplit_once(':') {
        Some((pattern, group))
            if !group.is_empty() && group.bytes().all(|b| b.is_ascii_digit()) =>
        {
            (pattern, group.parse::<usize>().unwrap_or(0))
        }
        _ => (rest, 0),
    };
    let regex = Regex::new(pattern).map_err(|e| Error::invalid_regex(pattern, field, e))?;
    Ok(TransformParams::Regex { pattern: regex, group })
}

/// Formats may contain `:` themselves (`HH:mm:ss`), so the text after the
/// last `:` only counts as the timezone when it names a known zone.
fn parse_datetime_params(rest: &str) -> TransformParams {
    if let Some((format, zone)) = rest.rsplit_once(':') {
        if let Ok(tz) = zone.parse::<Tz>() {
            return TransformParams::DateTime {
                format: (!format.is_empty()).then(|| format.to_string()),
                timezone: Some(tz),
            };
        }
    }
    TransformParams::DateTime {
        format: (!rest.is_empty()).then(|| rest.to_string()),
        timezone: None,
    }
}

/// One `{ "if": ..., "then": ... }` entry of a conditional transform
#[derive(Debug, Clone)]
pub struct WhenBranch {
    pub condition: Condition,
    pub then: TransformSpec,
}

/// `{ "when": [...], "default"?: ... }`
#[derive(Debug, Clone)]
pub struct ConditionalTransform {
    pub branches: Vec<WhenBranch>,
    pub default: Option<Box<TransformSpec>>,
}

/// A parsed transform specification
#[derive(Debug, Clone)]
pub enum TransformSpec {
    Single(TransformStep),
    Pipeline(Vec<TransformSpec>),
    Conditional(ConditionalTransform),
}

impl TransformSpec {
    /// Parse the `transform` value of a field config.
    pub fn parse(value: &Value, field: &str) -> Result<Self> {
        match value {
            Value::String(step) => Ok(TransformSpec::Single(TransformStep::parse(step, field)?)),
            Value::Array(steps) => steps
                .iter()
                .enumerate()
                .map(|(i, step)| TransformSpec::parse(step, &format!("{}.transform[{}]", field, i)))
                .collect::<Result<Vec<_>>>()
                .map(TransformSpec::Pipeline),
            Value::Object(object) if object.contains_key("when") => {
                Self::parse_conditional(object, field).map(TransformSpec::Conditional)
            }
            other => Err(Error::invalid_input(format!(
                "{}.transform invalid type {}",
                field,
                type_name(other)
            ))),
        }
    }

    fn parse_conditional(
        object: &serde_json::Map<String, Value>,
        field: &str,
    ) -> Result<ConditionalTransform> {
        let when = object["when"].as_array().ok_or_else(|| {
            Error::invalid_input(format!("{}.transform.when must be an array", field))
        })?;

        let mut branches = Vec::with_capacity(when.len());
        for (i, rule) in when.iter().enumerate() {
            let location = format!("{}.transform.when[{}]", field, i);
            let (condition, then) = match (rule.get("if"), rule.get("then")) {
                (Some(condition), Some(then)) => (condition, then),
                _ => {
                    return Err(Error::invalid_input(format!(
                        "{} must contain if and then",
                        location
                    )))
                }
            };
            let condition_object = condition.as_object().ok_or_else(|| {
                Error::invalid_input(format!("{}.if must be an object", location))
            })?;
            branches.push(WhenBranch {
                condition: Condition::parse(condition_object, &[], &format!("{}.if", location))?,
                then: TransformSpec::parse(then, &format!("{}.then", location))?,
            });
        }

        let default = object
            .get("default")
            .map(|spec| TransformSpec::parse(spec, &format!("{}.default", field)))
            .transpose()?
            .map(Box::new);

        Ok(ConditionalTransform { branches, default })
    }
}

/// Context information available to transform functions
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    pub params: &'a TransformParams,
    pub config: &'a EngineConfig,
    /// Schema field being built, for error messages
    pub field: &'a str,
    pub kind: TransformKind,
}

impl TransformContext<'_> {
    /// Build a [`Error::TransformExecution`] for this step.
    pub fn error(&self, message: impl Into<String>) -> Error {
        Error::TransformExecution {
            transform: self.kind.name().to_string(),
            field: self.field.to_string(),
            message: message.into(),
        }
    }
}

/// A function that can transform a JSON value
pub type TransformerFunction = fn(&Value, &TransformContext<'_>) -> Result<Value>;
