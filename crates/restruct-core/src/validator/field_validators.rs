//! Per-construct schema checks
//!
//! Each function inspects one construct of the raw schema document and
//! returns its findings. Locations are dotted and rooted at `schema`.
//!
//! Copyright (c) 2025 Restruct Team
//! Licensed under the Apache-2.0 license

use super::ValidationError;
use crate::condition::Operator;
use crate::schema::FILTER_KEY;
use crate::transformer::TransformStep;
use crate::value::{coerce_to_string, type_name};
use crate::Error;
use regex::Regex;
use serde_json::{Map, Value};

const FIELD_KEYS: [&str; 5] = ["path", "transform", "default", "type", "properties"];
const COMPOSITE_KEYS: [&str; 4] = ["not", "and", "all", "or"];

/// Validate every entry of a properties object.
pub fn validate_properties(
    properties: &Map<String, Value>,
    prefix: &str,
    top_level: bool,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (name, config) in properties {
        let location = format!("{}.{}", prefix, name);
        if name == FILTER_KEY {
            if top_level {
                errors.extend(validate_filter(config, &location));
            } else {
                errors.push(ValidationError::warning(
                    location,
                    "is only honored at the top level and will be ignored",
                ));
            }
            continue;
        }
        errors.extend(validate_field(config, &location));
    }

    errors
}

/// Validate one field config or nested object.
pub fn validate_field(config: &Value, location: &str) -> Vec<ValidationError> {
    let object = match config.as_object() {
        Some(object) => object,
        None => {
            return vec![ValidationError::error(
                location,
                format!("must be an object, found {}", type_name(config)),
            )
            .with_expected("field config object")]
        }
    };

    let mut errors = Vec::new();
    for key in object.keys().filter(|k| !FIELD_KEYS.contains(&k.as_str())) {
        errors.push(ValidationError::warning(
            format!("{}.{}", location, key),
            "is not a recognized field key",
        ));
    }

    if object.get("type").and_then(Value::as_str) == Some("object") {
        match object.get("properties") {
            Some(Value::Object(properties)) => {
                errors.extend(validate_properties(properties, location, false))
            }
            _ => errors.push(
                ValidationError::error(
                    format!("{}.properties", location),
                    "is required for object fields",
                )
                .with_expected("object"),
            ),
        }
        return errors;
    }

    match object.get("path") {
        Some(path) => errors.extend(validate_path(path, &format!("{}.path", location))),
        None => errors.push(ValidationError::error(format!("{}.path", location), "is required")),
    }
    if let Some(transform) = object.get("transform") {
        errors.extend(validate_transform(transform, &format!("{}.transform", location)));
    }

    errors
}

/// Validate a `path` value: a non-empty string or a non-empty list of them.
pub fn validate_path(path: &Value, location: &str) -> Vec<ValidationError> {
    match path {
        Value::String(path) => validate_path_string(path, location).into_iter().collect(),
        Value::Array(items) if items.is_empty() => {
            vec![ValidationError::error(location, "must not be an empty array")]
        }
        Value::Array(items) => items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| {
                let location = format!("{}[{}]", location, i);
                match item.as_str() {
                    Some(path) => validate_path_string(path, &location),
                    None => Some(ValidationError::error(
                        location,
                        format!("must be a string, found {}", type_name(item)),
                    )),
                }
            })
            .collect(),
        other => vec![ValidationError::error(
            location,
            format!("has invalid type {}", type_name(other)),
        )
        .with_expected("string or array of strings")],
    }
}

fn validate_path_string(path: &str, location: &str) -> Option<ValidationError> {
    if path.trim().is_empty() {
        Some(ValidationError::error(location, "must not be empty"))
    } else if has_empty_segment(path) {
        Some(ValidationError::error(location, format!("\"{}\" contains an empty segment", path)))
    } else {
        None
    }
}

/// True when a dot-separated segment is empty. Quoted bracket groups such as
/// `['Ref..No']` are opaque.
fn has_empty_segment(path: &str) -> bool {
    let mut segment_empty = true;
    let mut i = 0;
    while i < path.len() {
        let rest = &path[i..];
        if rest.starts_with('.') {
            if segment_empty {
                return true;
            }
            segment_empty = true;
            i += 1;
            continue;
        }
        i += match quoted_group_len(rest) {
            Some(len) => len,
            None => rest.chars().next().map_or(1, char::len_utf8),
        };
        segment_empty = false;
    }
    segment_empty
}

/// Byte length of a terminated `['...']` or `["..."]` group at the start of
/// `text`.
fn quoted_group_len(text: &str) -> Option<usize> {
    let inner = text.strip_prefix('[')?;
    let quote = inner.chars().next().filter(|c| matches!(c, '\'' | '"'))?;
    let name_len = inner[1..].find(&format!("{}]", quote))?;
    Some(name_len + 4)
}

/// Validate a transform specification.
pub fn validate_transform(transform: &Value, location: &str) -> Vec<ValidationError> {
    match transform {
        Value::String(step) => validate_step(step, location).into_iter().collect(),
        Value::Array(steps) => steps
            .iter()
            .enumerate()
            .flat_map(|(i, step)| validate_transform(step, &format!("{}[{}]", location, i)))
            .collect(),
        Value::Object(object) if object.contains_key("when") => {
            validate_conditional(object, location)
        }
        other => vec![ValidationError::error(
            location,
            format!("has invalid type {}", type_name(other)),
        )
        .with_expected("string, array or {when} object")],
    }
}

fn validate_step(step: &str, location: &str) -> Option<ValidationError> {
    match TransformStep::parse(step, location) {
        Ok(_) => None,
        Err(Error::UnknownTransform { name, .. }) => Some(ValidationError::error(
            location,
            format!("uses unknown transform \"{}\"", name),
        )),
        Err(Error::InvalidRegex { pattern, source, .. }) => Some(ValidationError::error(
            location,
            format!("has invalid regex \"{}\": {}", pattern, source),
        )),
        Err(e) => Some(ValidationError::error(location, e.to_string())),
    }
}

fn validate_conditional(object: &Map<String, Value>, location: &str) -> Vec<ValidationError> {
    let when_location = format!("{}.when", location);
    let branches = match object.get("when") {
        Some(Value::Array(branches)) => branches,
        _ => return vec![ValidationError::error(when_location, "must be an array")],
    };

    let mut errors = Vec::new();
    for (i, branch) in branches.iter().enumerate() {
        let branch_location = format!("{}[{}]", when_location, i);
        match (branch.get("if"), branch.get("then")) {
            (Some(condition), Some(then)) => {
                let if_location = format!("{}.if", branch_location);
                match condition.as_object() {
                    Some(condition) => {
                        errors.extend(validate_condition(condition, &[], &if_location))
                    }
                    None => errors.push(ValidationError::error(if_location, "must be an object")),
                }
                errors.extend(validate_transform(then, &format!("{}.then", branch_location)));
            }
            _ => errors.push(ValidationError::error(
                branch_location,
                "must contain both if and then",
            )),
        }
    }
    if let Some(default) = object.get("default") {
        errors.extend(validate_transform(default, &format!("{}.default", location)));
    }

    errors
}

/// Validate that `object` carries exactly one known operator.
pub fn validate_condition(
    object: &Map<String, Value>,
    skip: &[&str],
    location: &str,
) -> Vec<ValidationError> {
    let keys: Vec<&String> = object.keys().filter(|k| !skip.contains(&k.as_str())).collect();
    let key = match keys.as_slice() {
        [key] => *key,
        _ => {
            return vec![ValidationError::error(
                location,
                format!("must contain exactly one operator, found {}", keys.len()),
            )]
        }
    };

    let operand = &object[key.as_str()];
    match Operator::from_key(key) {
        None => vec![ValidationError::error(
            format!("{}.{}", location, key),
            "is not a supported operator",
        )
        .with_expected("eq, ne, gt, lt, gte, lte, in, regex or exists")],
        Some(Operator::In) if !operand.is_array() => vec![ValidationError::error(
            format!("{}.in", location),
            format!("must be an array, found {}", type_name(operand)),
        )],
        Some(Operator::Regex) => {
            let pattern = coerce_to_string(operand);
            match Regex::new(&pattern) {
                Ok(_) => Vec::new(),
                Err(e) => vec![ValidationError::error(
                    format!("{}.regex", location),
                    format!("has invalid regex \"{}\": {}", pattern, e),
                )],
            }
        }
        Some(_) => Vec::new(),
    }
}

/// Validate the top-level `filter` value.
pub fn validate_filter(filter: &Value, location: &str) -> Vec<ValidationError> {
    let object = match filter.as_object() {
        Some(object) => object,
        None => {
            return vec![ValidationError::error(
                location,
                format!("must be an object, found {}", type_name(filter)),
            )]
        }
    };

    match object.get("all") {
        Some(Value::Array(rules)) => validate_rule_list(rules, &format!("{}.all", location)),
        _ => vec![ValidationError::error(format!("{}.all", location), "is required")
            .with_expected("array of rules")],
    }
}

fn validate_rule_list(rules: &[Value], location: &str) -> Vec<ValidationError> {
    rules
        .iter()
        .enumerate()
        .flat_map(|(i, rule)| validate_rule(rule, &format!("{}[{}]", location, i)))
        .collect()
}

fn validate_rule(rule: &Value, location: &str) -> Vec<ValidationError> {
    let object = match rule.as_object() {
        Some(object) => object,
        None => {
            return vec![ValidationError::error(
                location,
                format!("must be an object, found {}", type_name(rule)),
            )]
        }
    };

    if let Some(key) = COMPOSITE_KEYS.iter().find(|k| object.contains_key(**k)) {
        let nested_location = format!("{}.{}", location, key);
        return match (&object[*key], *key) {
            (Value::Array(rules), _) => validate_rule_list(rules, &nested_location),
            (single @ Value::Object(_), "not") => validate_rule(single, &nested_location),
            (other, _) => vec![ValidationError::error(
                nested_location,
                format!("has invalid type {}", type_name(other)),
            )
            .with_expected("array of rules")],
        };
    }

    let mut errors = match object.get("path") {
        Some(path) => validate_path(path, &format!("{}.path", location)),
        None => vec![ValidationError::error(format!("{}.path", location), "is required")],
    };
    errors.extend(validate_condition(object, &["path"], location));
    errors
}
