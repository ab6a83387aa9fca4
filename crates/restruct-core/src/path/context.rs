//! Wildcard contexts and cartesian context extraction
//!
//! A [`Context`] records the array index chosen at each wildcard along the
//! canonical path; one context is one output row. [`extract_contexts`] walks
//! the canonical path and fans out at every wildcard, producing contexts in
//! row-major order (outer index ascending, inner index ascending).
//!
//! Copyright (c) 2025 Restruct Team
//! Licensed under the Apache-2.0 license

use super::resolver::lookup;
use super::token::PathToken;
use super::FieldPath;
use crate::{Error, Result};
use serde_json::Value;
use std::convert::Infallible;
use std::fmt;

/// Array index per wildcard occurrence
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Context {
    indices: Vec<usize>,
}

impl Context {
    /// Context of a schema without wildcards
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_indices(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    /// Index chosen for the wildcard at `depth`
    pub fn index_at(&self, depth: usize) -> Option<usize> {
        self.indices.get(depth).copied()
    }

    pub fn depth(&self) -> usize {
        self.indices.len()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Whether every wildcard of `path` has an entry in this context
    pub fn covers(&self, path: &FieldPath) -> bool {
        path.wildcard_count() <= self.depth()
    }

    fn extended(&self, index: usize) -> Self {
        let mut indices = Vec::with_capacity(self.indices.len() + 1);
        indices.extend_from_slice(&self.indices);
        indices.push(index);
        Self { indices }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.indices)
    }
}

/// One worklist entry after extraction
#[derive(Debug, Clone)]
pub struct ExtractedContext<'a> {
    /// Value reached at the end of the walk; `None` when absent
    pub value: Option<&'a Value>,
    pub context: Context,
}

/// Enumerate every context of `path` over `source`.
pub fn extract_contexts<'a>(source: &'a Value, path: &FieldPath) -> Vec<ExtractedContext<'a>> {
    match walk(source, path, |_| Ok::<(), Infallible>(())) {
        Ok(contexts) => contexts,
        Err(never) => match never {},
    }
}

/// Like [`extract_contexts`] but fails once more than `limit` contexts exist.
pub fn extract_contexts_limited<'a>(
    source: &'a Value,
    path: &FieldPath,
    limit: Option<usize>,
) -> Result<Vec<ExtractedContext<'a>>> {
    walk(source, path, |count| match limit {
        Some(limit) if count > limit => Err(Error::ContextLimit {
            path: path.to_string(),
            limit,
        }),
        _ => Ok(()),
    })
}

/// Walk `path` up to its last wildcard. `check` sees the running context
/// count after each array is fanned out.
fn walk<'a, E>(
    source: &'a Value,
    path: &FieldPath,
    mut check: impl FnMut(usize) -> std::result::Result<(), E>,
) -> std::result::Result<Vec<ExtractedContext<'a>>, E> {
    let tokens = path.tokens();
    let walked = match tokens.iter().rposition(PathToken::is_wildcard) {
        Some(last) => &tokens[..=last],
        None => &tokens[..0],
    };

    let mut worklist = vec![ExtractedContext {
        value: Some(source),
        context: Context::empty(),
    }];

    for token in walked {
        if token.is_wildcard() {
            let mut next = Vec::new();
            for entry in &worklist {
                if let Some(Value::Array(items)) = entry.value {
                    next.extend(items.iter().enumerate().map(|(i, item)| ExtractedContext {
                        value: Some(item),
                        context: entry.context.extended(i),
                    }));
                }
                check(next.len())?;
            }
            worklist = next;
        } else {
            for entry in &mut worklist {
                entry.value = entry.value.and_then(|v| lookup(v, token));
            }
        }
    }

    Ok(worklist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn indices(contexts: &[ExtractedContext<'_>]) -> Vec<Vec<usize>> {
        contexts.iter().map(|c| c.context.indices().to_vec()).collect()
    }

    #[test]
    fn test_single_wildcard() {
        let source = json!({"rows": [{"a": 1}, {"a": 2}, {"a": 3}]});
        let contexts = extract_contexts(&source, &FieldPath::parse("rows.*.a"));
        assert_eq!(indices(&contexts), vec![vec![0], vec![1], vec![2]]);
        assert_eq!(contexts[1].value, Some(&json!({"a": 2})));
    }

    #[test]
    fn test_cartesian_row_major_order() {
        let source = json!({
            "orders": [
                {"items": [1, 2, 3]},
                {"items": [4, 5]}
            ]
        });
        let contexts = extract_contexts(&source, &FieldPath::parse("orders.*.items.*"));
        assert_eq!(
            indices(&contexts),
            vec![vec![0, 0], vec![0, 1], vec![0, 2], vec![1, 0], vec![1, 1]]
        );
    }

    #[test]
    fn test_non_array_at_wildcard_drops_branch() {
        let source = json!({
            "orders": [
                {"items": [1, 2]},
                {"items": "none"},
                {},
                {"items": [3]}
            ]
        });
        let contexts = extract_contexts(&source, &FieldPath::parse("orders.*.items.*.sku"));
        assert_eq!(indices(&contexts), vec![vec![0, 0], vec![0, 1], vec![3, 0]]);
    }

    #[test]
    fn test_no_wildcard_yields_single_empty_context() {
        let source = json!({"a": 1});
        let contexts = extract_contexts(&source, &FieldPath::parse("a.b"));
        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0].context, Context::empty());
    }

    #[test]
    fn test_missing_root_array_yields_nothing() {
        let source = json!({"other": []});
        assert!(extract_contexts(&source, &FieldPath::parse("rows.*.a")).is_empty());
    }

    #[test]
    fn test_selector_before_wildcard() {
        let source = json!({
            "sheets": [
                {"name": "a", "rows": [1]},
                {"name": "b", "rows": [1, 2]}
            ]
        });
        let contexts = extract_contexts(&source, &FieldPath::parse("sheets[name=b].rows.*"));
        assert_eq!(indices(&contexts), vec![vec![0], vec![1]]);
    }

    #[test]
    fn test_context_limit() {
        let source = json!({"rows": [1, 2, 3]});
        let path = FieldPath::parse("rows.*");
        let err = extract_contexts_limited(&source, &path, Some(2)).unwrap_err();
        assert!(matches!(err, Error::ContextLimit { limit: 2, .. }));
        assert_eq!(extract_contexts_limited(&source, &path, Some(3)).unwrap().len(), 3);
    }

    #[test]
    fn test_unlimited_walk_matches_limited_walk() {
        let rows: Vec<Value> = (0..500).map(|i| json!({"t": [i, i + 1]})).collect();
        let source = json!({ "rows": rows });
        let path = FieldPath::parse("rows.*.t.*");
        let unlimited = extract_contexts(&source, &path);
        let limited = extract_contexts_limited(&source, &path, None).unwrap();
        assert_eq!(unlimited.len(), 1000);
        assert_eq!(indices(&unlimited), indices(&limited));
    }

    #[test]
    fn test_context_value_semantics() {
        let a = Context::from_indices(vec![1, 2]);
        let b = Context::empty().extended(1).extended(2);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "[1, 2]");
        assert!(a.covers(&FieldPath::parse("x.*.y.*")));
        assert!(!a.covers(&FieldPath::parse("x.*.y.*.z.*")));
    }
}
