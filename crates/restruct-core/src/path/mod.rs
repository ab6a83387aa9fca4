//! Path addressing for source documents
//!
//! - [`token`] - tokenizer for dotted / bracketed / wildcard path strings
//! - [`context`] - wildcard contexts and cartesian context extraction
//! - [`resolver`] - value resolution under a fixed context
//!
//! Copyright (c) 2025 Restruct Team
//! Licensed under the Apache-2.0 license

pub mod context;
pub mod resolver;
pub mod token;

pub use context::{extract_contexts, extract_contexts_limited, Context, ExtractedContext};
pub use resolver::{resolve, resolve_value};
pub use token::{tokenize, PathToken};

use std::fmt;

/// A path string together with its tokens, compiled once per schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    raw: String,
    tokens: Vec<PathToken>,
}

impl FieldPath {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let tokens = tokenize(&raw);
        Self { raw, tokens }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn tokens(&self) -> &[PathToken] {
        &self.tokens
    }

    /// Number of wildcard tokens along this path
    pub fn wildcard_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.is_wildcard()).count()
    }

    pub fn has_wildcard(&self) -> bool {
        self.tokens.iter().any(PathToken::is_wildcard)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for FieldPath {
    fn from(raw: &str) -> Self {
        FieldPath::parse(raw)
    }
}
