//! Value resolution under a fixed context
//!
//! A field may list several candidate paths. Candidates are tried in order
//! and the first one that resolves to a non-null value wins. Inside one
//! candidate the Nth wildcard takes its index from context entry N.
//!
//! Copyright (c) 2025 Restruct Team
//! Licensed under the Apache-2.0 license

use super::context::Context;
use super::token::PathToken;
use super::FieldPath;
use crate::value::coerce_to_string;
use serde_json::Value;

/// Resolve the first candidate path yielding a non-null value.
///
/// Returns `None` when there are no candidates or every candidate is absent
/// or null.
pub fn resolve<'a>(source: &'a Value, paths: &[FieldPath], context: &Context) -> Option<&'a Value> {
    for path in paths {
        match resolve_path(source, path, context) {
            Some(value) if !value.is_null() => return Some(value),
            _ => log::trace!("path {} did not resolve under {}", path, context),
        }
    }
    None
}

/// Owned variant of [`resolve`]; unresolved fields become `null`.
pub fn resolve_value(source: &Value, paths: &[FieldPath], context: &Context) -> Value {
    resolve(source, paths, context).cloned().unwrap_or(Value::Null)
}

/// Walk one path. `None` means some step along the way was absent.
pub fn resolve_path<'a>(
    source: &'a Value,
    path: &FieldPath,
    context: &Context,
) -> Option<&'a Value> {
    let mut current = source;
    let mut depth = 0;

    for token in path.tokens() {
        current = match token {
            PathToken::Wildcard => {
                let index = context.index_at(depth)?;
                depth += 1;
                current.as_array()?.get(index)?
            }
            other => lookup(current, other)?,
        };
    }

    Some(current)
}

/// Apply one non-wildcard token to a value.
pub(crate) fn lookup<'a>(value: &'a Value, token: &PathToken) -> Option<&'a Value> {
    match token {
        PathToken::Field(name) | PathToken::BracketedField(name) => property(value, name),
        PathToken::ArraySelector { array, key, value: expected } => {
            let items = property(value, array)?.as_array()?;
            items.iter().find(|item| {
                item.get(key.as_str())
                    .map(|v| coerce_to_string(v) == *expected)
                    .unwrap_or(false)
            })
        }
        PathToken::Wildcard => None,
    }
}

fn property<'a>(value: &'a Value, name: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(name),
        Value::Array(items) => name.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}
