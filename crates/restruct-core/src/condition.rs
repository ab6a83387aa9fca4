//! Single-operator value conditions
//!
//! Shared by filter leaf rules and the `if` clause of conditional
//! transforms. A condition object carries exactly one operator key:
//! `eq`, `ne`, `gt`, `lt`, `gte`, `lte`, `in`, `regex` or `exists`.
//!
//! Copyright (c) 2025 Restruct Team
//! Licensed under the Apache-2.0 license

use crate::value::{coerce_to_string, compare, is_truthy, loose_eq, type_name};
use crate::{Error, Result};
use regex::Regex;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;

/// Comparison operator keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
    In,
    Regex,
    Exists,
}

impl Operator {
    pub const ALL: [Operator; 9] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Lt,
        Operator::Gte,
        Operator::Lte,
        Operator::In,
        Operator::Regex,
        Operator::Exists,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == key)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Gt => "gt",
            Operator::Lt => "lt",
            Operator::Gte => "gte",
            Operator::Lte => "lte",
            Operator::In => "in",
            Operator::Regex => "regex",
            Operator::Exists => "exists",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed condition with its operand
#[derive(Debug, Clone)]
pub enum Condition {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Lt(Value),
    Gte(Value),
    Lte(Value),
    In(Vec<Value>),
    Matches(Regex),
    Exists(bool),
}

impl Condition {
    /// Parse the single operator of `object`, ignoring the keys in `skip`.
    ///
    /// `field` names the location for error messages.
    pub fn parse(object: &Map<String, Value>, skip: &[&str], field: &str) -> Result<Self> {
        let mut keys = object.keys().filter(|k| !skip.contains(&k.as_str()));
        let (key, extra) = (keys.next(), keys.next());

        let key = match (key, extra) {
            (Some(key), None) => key,
            _ => {
                return Err(Error::invalid_input(format!(
                    "{} must contain exactly one condition",
                    field
                )))
            }
        };

        let operator = Operator::from_key(key).ok_or_else(|| {
            Error::invalid_input(format!("{} unsupported operator \"{}\"", field, key))
        })?;

        Self::from_operand(operator, &object[key.as_str()], field)
    }

    pub fn from_operand(operator: Operator, operand: &Value, field: &str) -> Result<Self> {
        let condition = match operator {
            Operator::Eq => Condition::Eq(operand.clone()),
            Operator::Ne => Condition::Ne(operand.clone()),
            Operator::Gt => Condition::Gt(operand.clone()),
            Operator::Lt => Condition::Lt(operand.clone()),
            Operator::Gte => Condition::Gte(operand.clone()),
            Operator::Lte => Condition::Lte(operand.clone()),
            Operator::In => match operand {
                Value::Array(items) => Condition::In(items.clone()),
                other => {
                    return Err(Error::invalid_input(format!(
                        "{}.in must be an array, found {}",
                        field,
                        type_name(other)
                    )))
                }
            },
            Operator::Regex => {
                let pattern = coerce_to_string(operand);
                let regex = Regex::new(&pattern)
                    .map_err(|e| Error::invalid_regex(pattern.clone(), field, e))?;
                Condition::Matches(regex)
            }
            Operator::Exists => Condition::Exists(is_truthy(operand)),
        };
        Ok(condition)
    }

    pub fn operator(&self) -> Operator {
        match self {
            Condition::Eq(_) => Operator::Eq,
            Condition::Ne(_) => Operator::Ne,
            Condition::Gt(_) => Operator::Gt,
            Condition::Lt(_) => Operator::Lt,
            Condition::Gte(_) => Operator::Gte,
            Condition::Lte(_) => Operator::Lte,
            Condition::In(_) => Operator::In,
            Condition::Matches(_) => Operator::Regex,
            Condition::Exists(_) => Operator::Exists,
        }
    }

    /// Test `value` against this condition. Values are never coerced for
    /// ordering: a string never compares greater than a number.
    pub fn evaluate(&self, value: &Value) -> bool {
        match self {
            Condition::Eq(operand) => loose_eq(value, operand),
            Condition::Ne(operand) => !loose_eq(value, operand),
            Condition::Gt(operand) => compare(value, operand) == Some(Ordering::Greater),
            Condition::Lt(operand) => compare(value, operand) == Some(Ordering::Less),
            Condition::Gte(operand) => {
                matches!(compare(value, operand), Some(Ordering::Greater | Ordering::Equal))
            }
            Condition::Lte(operand) => {
                matches!(compare(value, operand), Some(Ordering::Less | Ordering::Equal))
            }
            Condition::In(items) => items.iter().any(|item| loose_eq(value, item)),
            Condition::Matches(regex) => regex.is_match(&coerce_to_string(value)),
            Condition::Exists(expected) => !value.is_null() == *expected,
        }
    }
}
