//! Built-in transform functions
//!
//! Each function receives the current pipeline value and the step context.
//! Text transforms trim their input and map null or empty text to null, so a
//! field `default` can take over.
//!
//! Copyright (c) 2025 Restruct Team
//! Licensed under the Apache-2.0 license

use super::datetime::{format_instant, parse_instant};
use super::types::{TransformContext, TransformKind, TransformParams, TransformerFunction};
use crate::value::{coerce_to_string, is_truthy, number_from_f64, type_name};
use crate::Result;
use chrono::Utc;
use serde_json::Value;

/// Function implementing `kind`. The match is exhaustive, so every kind has
/// exactly one implementation.
pub fn function_for(kind: TransformKind) -> TransformerFunction {
    match kind {
        TransformKind::ToNumber => to_number,
        TransformKind::ToDateTime => to_date_time,
        TransformKind::CurrentDateTime => current_date_time,
        TransformKind::ToLowerCase => to_lower_case,
        TransformKind::ToUpperCase => to_upper_case,
        TransformKind::ToTitleCase => to_title_case,
        TransformKind::ToSentenceCase => to_sentence_case,
        TransformKind::ToCamelCase => to_camel_case,
        TransformKind::ToSnakeCase => to_snake_case,
        TransformKind::ToKebabCase => to_kebab_case,
        TransformKind::ToPascalCase => to_pascal_case,
        TransformKind::ToLowerFirst => to_lower_first,
        TransformKind::ToUpperFirst => to_upper_first,
        TransformKind::ToCapitalize => to_capitalize,
        TransformKind::ToJson => to_json,
        TransformKind::ToString => to_string,
        TransformKind::ToBoolean => to_boolean,
        TransformKind::Regex => regex_extract,
        TransformKind::Prefix => prefix,
        TransformKind::Postfix => postfix,
    }
}

/// Trimmed text of a scalar; `None` for null and empty text.
fn text_input(value: &Value, ctx: &TransformContext<'_>) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::Array(_) | Value::Object(_) => Err(ctx.error(format!(
            "expected text, found {}",
            type_name(value)
        ))),
        other => {
            let text = coerce_to_string(other).trim().to_string();
            Ok((!text.is_empty()).then_some(text))
        }
    }
}

fn text_transform(
    value: &Value,
    ctx: &TransformContext<'_>,
    f: impl FnOnce(&str) -> String,
) -> Result<Value> {
    Ok(text_input(value, ctx)?
        .map(|text| Value::String(f(&text)))
        .unwrap_or(Value::Null))
}

fn to_number(value: &Value, _ctx: &TransformContext<'_>) -> Result<Value> {
    let number = match value {
        Value::Number(_) => value.clone(),
        Value::Bool(b) => Value::from(u8::from(*b)),
        Value::String(s) if s.trim().is_empty() => Value::Null,
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(f) => number_from_f64(f),
            Err(_) => {
                log::warn!("toNumber: \"{}\" is not numeric, using null", s);
                Value::Null
            }
        },
        _ => Value::Null,
    };
    Ok(number)
}

fn to_date_time(value: &Value, ctx: &TransformContext<'_>) -> Result<Value> {
    if value.is_null() || value.as_str().map(|s| s.trim().is_empty()).unwrap_or(false) {
        return Ok(Value::Null);
    }

    let (format, timezone) = match ctx.params {
        TransformParams::DateTime { format, timezone } => (format.as_deref(), *timezone),
        _ => (None, None),
    };
    let local = ctx.config.default_tz()?;
    let tz = timezone.unwrap_or(local);
    let format = format.unwrap_or(ctx.config.datetime_format.as_str());

    let instant = parse_instant(value, local)
        .ok_or_else(|| ctx.error(format!("cannot parse {} as a date", value)))?;

    Ok(Value::String(format_instant(&instant, tz, format)))
}

fn current_date_time(_value: &Value, ctx: &TransformContext<'_>) -> Result<Value> {
    let tz = ctx.config.default_tz()?;
    Ok(Value::String(format_instant(
        &Utc::now(),
        tz,
        &ctx.config.datetime_format,
    )))
}

fn to_lower_case(value: &Value, ctx: &TransformContext<'_>) -> Result<Value> {
    text_transform(value, ctx, str::to_lowercase)
}

fn to_upper_case(value: &Value, ctx: &TransformContext<'_>) -> Result<Value> {
    text_transform(value, ctx, str::to_uppercase)
}

fn to_title_case(value: &Value, ctx: &TransformContext<'_>) -> Result<Value> {
    text_transform(value, ctx, |text| {
        text.split_whitespace()
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ")
    })
}

fn to_sentence_case(value: &Value, ctx: &TransformContext<'_>) -> Result<Value> {
    text_transform(value, ctx, |text| {
        let mut out = String::with_capacity(text.len());
        let mut start_of_sentence = true;
        let mut after_terminator = false;
        for ch in text.to_lowercase().chars() {
            if after_terminator && ch.is_whitespace() {
                start_of_sentence = true;
            }
            after_terminator = matches!(ch, '.' | '!' | '?');
            if start_of_sentence && ch.is_alphanumeric() {
                out.extend(ch.to_uppercase());
                start_of_sentence = false;
            } else {
                out.push(ch);
            }
        }
        out
    })
}

fn to_camel_case(value: &Value, ctx: &TransformContext<'_>) -> Result<Value> {
    text_transform(value, ctx, |text| {
        split_words(text)
            .iter()
            .enumerate()
            .map(|(i, word)| if i == 0 { word.to_lowercase() } else { capitalize(word) })
            .collect()
    })
}

fn to_pascal_case(value: &Value, ctx: &TransformContext<'_>) -> Result<Value> {
    text_transform(value, ctx, |text| {
        split_words(text).iter().map(|w| capitalize(w)).collect()
    })
}

fn to_snake_case(value: &Value, ctx: &TransformContext<'_>) -> Result<Value> {
    text_transform(value, ctx, |text| join_lower(text, "_"))
}

fn to_kebab_case(value: &Value, ctx: &TransformContext<'_>) -> Result<Value> {
    text_transform(value, ctx, |text| join_lower(text, "-"))
}

fn to_lower_first(value: &Value, ctx: &TransformContext<'_>) -> Result<Value> {
    text_transform(value, ctx, |text| map_first(text, |c| c.to_lowercase().collect()))
}

fn to_upper_first(value: &Value, ctx: &TransformContext<'_>) -> Result<Value> {
    text_transform(value, ctx, |text| map_first(text, |c| c.to_uppercase().collect()))
}

fn to_capitalize(value: &Value, ctx: &TransformContext<'_>) -> Result<Value> {
    text_transform(value, ctx, capitalize)
}

fn to_json(value: &Value, ctx: &TransformContext<'_>) -> Result<Value> {
    match value {
        Value::String(text) => serde_json::from_str(text)
            .map_err(|e| ctx.error(format!("JSON parse error: {}", e))),
        other => Ok(other.clone()),
    }
}

fn to_string(value: &Value, _ctx: &TransformContext<'_>) -> Result<Value> {
    Ok(match value {
        Value::Null => Value::Null,
        Value::String(_) => value.clone(),
        other => Value::String(coerce_to_string(other)),
    })
}

fn to_boolean(value: &Value, _ctx: &TransformContext<'_>) -> Result<Value> {
    Ok(Value::Bool(is_truthy(value)))
}

fn regex_extract(value: &Value, ctx: &TransformContext<'_>) -> Result<Value> {
    let (pattern, group) = match ctx.params {
        TransformParams::Regex { pattern, group } => (pattern, *group),
        _ => return Err(ctx.error("missing pattern")),
    };
    if value.is_null() {
        return Ok(Value::Null);
    }

    let text = coerce_to_string(value);
    Ok(pattern
        .captures(&text)
        .and_then(|caps| caps.get(group))
        .map(|m| Value::String(m.as_str().to_string()))
        .unwrap_or(Value::Null))
}

fn affix_text<'a>(ctx: &'a TransformContext<'_>) -> &'a str {
    match ctx.params {
        TransformParams::Text(text) => text,
        _ => "",
    }
}

fn prefix(value: &Value, ctx: &TransformContext<'_>) -> Result<Value> {
    Ok(match text_or_null(value) {
        Some(text) => Value::String(format!("{}{}", affix_text(ctx), text)),
        None => Value::Null,
    })
}

fn postfix(value: &Value, ctx: &TransformContext<'_>) -> Result<Value> {
    Ok(match text_or_null(value) {
        Some(text) => Value::String(format!("{}{}", text, affix_text(ctx))),
        None => Value::Null,
    })
}

/// Untrimmed string form; null and empty text yield `None`.
fn text_or_null(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        other => Some(coerce_to_string(other)),
    }
}

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    map_first(&lower, |c| c.to_uppercase().collect())
}

fn map_first(text: &str, f: impl FnOnce(char) -> String) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => f(first) + chars.as_str(),
        None => String::new(),
    }
}

fn join_lower(text: &str, separator: &str) -> String {
    split_words(text)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Split on whitespace, `_`, `-`, `.` and lower-to-upper case boundaries.
fn split_words(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in text.chars() {
        if ch.is_whitespace() || matches!(ch, '_' | '-' | '.') {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}
