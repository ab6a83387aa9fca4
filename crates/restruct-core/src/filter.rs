//! Row-level filter evaluation
//!
//! The schema's reserved `filter` key holds `{ "all": [rule, ...] }`. A rule
//! is either a leaf `{ "path": ..., <operator>: operand }` or a composite
//! `not` / `and` / `or`. A context becomes an output row only if every rule
//! in `all` holds.
//!
//! Copyright (c) 2025 Restruct Team
//! Licensed under the Apache-2.0 license

use crate::condition::Condition;
use crate::path::{resolve_value, Context, FieldPath};
use crate::schema::parse_paths;
use crate::value::type_name;
use crate::{Error, Result};
use serde_json::Value;

/// A node of the filter rule tree
#[derive(Debug, Clone)]
pub enum FilterRule {
    /// Resolve `paths` under the row context and test the value
    Compare {
        paths: Vec<FieldPath>,
        condition: Condition,
    },
    /// Negation of the conjunction of the nested rules
    Not(Vec<FilterRule>),
    And(Vec<FilterRule>),
    Or(Vec<FilterRule>),
}

impl FilterRule {
    pub fn parse(value: &Value, field: &str) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            Error::invalid_input(format!("{} must be an object, found {}", field, type_name(value)))
        })?;

        if let Some(nested) = object.get("not") {
            let rules = match nested {
                Value::Array(_) => parse_rule_list(nested, &format!("{}.not", field))?,
                single => vec![FilterRule::parse(single, &format!("{}.not", field))?],
            };
            return Ok(FilterRule::Not(rules));
        }
        if let Some(nested) = object.get("and").or_else(|| object.get("all")) {
            return Ok(FilterRule::And(parse_rule_list(nested, &format!("{}.and", field))?));
        }
        if let Some(nested) = object.get("or") {
            return Ok(FilterRule::Or(parse_rule_list(nested, &format!("{}.or", field))?));
        }

        let path = object
            .get("path")
            .ok_or_else(|| Error::invalid_input(format!("{}.path missing", field)))?;
        let paths = parse_paths(path, field)?;
        let condition = Condition::parse(object, &["path"], field)?;

        Ok(FilterRule::Compare { paths, condition })
    }

    /// First wildcarded path of this rule, depth first in declaration order.
    pub fn first_wildcard_path(&self) -> Option<&FieldPath> {
        match self {
            FilterRule::Compare { paths, .. } => paths.iter().find(|p| p.has_wildcard()),
            FilterRule::Not(rules) | FilterRule::And(rules) | FilterRule::Or(rules) => {
                rules.iter().find_map(FilterRule::first_wildcard_path)
            }
        }
    }

    pub fn evaluate(&self, source: &Value, context: &Context) -> bool {
        match self {
            FilterRule::Compare { paths, condition } => {
                let value = resolve_value(source, paths, context);
                condition.evaluate(&value)
            }
            FilterRule::Not(rules) => !rules.iter().all(|r| r.evaluate(source, context)),
            FilterRule::And(rules) => rules.iter().all(|r| r.evaluate(source, context)),
            FilterRule::Or(rules) => rules.iter().any(|r| r.evaluate(source, context)),
        }
    }
}

fn parse_rule_list(value: &Value, field: &str) -> Result<Vec<FilterRule>> {
    let items = value.as_array().ok_or_else(|| {
        Error::invalid_input(format!("{} must be an array, found {}", field, type_name(value)))
    })?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| FilterRule::parse(item, &format!("{}[{}]", field, i)))
        .collect()
}

/// Schema-level filter: an implicit conjunction
#[derive(Debug, Clone, Default)]
pub struct Filter {
    rules: Vec<FilterRule>,
}

impl Filter {
    pub fn new(rules: Vec<FilterRule>) -> Self {
        Self { rules }
    }

    /// Parse the value stored under the schema's `filter` key.
    pub fn parse(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            Error::invalid_input(format!("filter must be an object, found {}", type_name(value)))
        })?;
        let rules = match object.get("all") {
            Some(all) => parse_rule_list(all, "filter.all")?,
            None => Vec::new(),
        };
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    pub fn first_wildcard_path(&self) -> Option<&FieldPath> {
        self.rules.iter().find_map(FilterRule::first_wildcard_path)
    }

    pub fn matches(&self, source: &Value, context: &Context) -> bool {
        self.rules.iter().all(|rule| rule.evaluate(source, context))
    }
}

/// Decide whether a context survives; no filter keeps everything.
pub fn apply_filter(source: &Value, context: &Context, filter: Option<&Filter>) -> bool {
    filter.map_or(true, |f| f.matches(source, context))
}
