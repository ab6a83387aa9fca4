//! Name → function table for transform steps
//!
//! The table is built once and never changes afterwards. It covers every
//! [`TransformKind`]; individual entries can be replaced at construction
//! time with [`TransformRegistry::with_function`].
//!
//! Copyright (c) 2025 Restruct Team
//! Licensed under the Apache-2.0 license

use super::built_in;
use super::types::{TransformContext, TransformKind, TransformStep, TransformerFunction};
use crate::config::EngineConfig;
use crate::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;

/// Immutable transform function table
#[derive(Debug, Clone)]
pub struct TransformRegistry {
    functions: HashMap<TransformKind, TransformerFunction>,
}

impl TransformRegistry {
    /// Registry with every built-in transform
    pub fn builtin() -> Self {
        let functions = TransformKind::ALL
            .into_iter()
            .map(|kind| (kind, built_in::function_for(kind)))
            .collect();
        Self { functions }
    }

    /// Replace the function behind `kind`.
    pub fn with_function(mut self, kind: TransformKind, function: TransformerFunction) -> Self {
        self.functions.insert(kind, function);
        self
    }

    pub fn contains(&self, kind: TransformKind) -> bool {
        self.functions.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Run one step on `value`.
    pub fn invoke(
        &self,
        step: &TransformStep,
        value: &Value,
        config: &EngineConfig,
        field: &str,
    ) -> Result<Value> {
        let function = self.functions.get(&step.kind).ok_or_else(|| Error::UnknownTransform {
            name: step.kind.name().to_string(),
            field: field.to_string(),
        })?;
        let ctx = TransformContext {
            params: &step.params,
            config,
            field,
            kind: step.kind,
        };
        function(value, &ctx)
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
