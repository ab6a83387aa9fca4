//! Transform pipeline implementation
//!
//! Applies a [`TransformSpec`] to a resolved value. Pipelines feed each
//! step's output into the next step; conditionals pick the first `when`
//! branch whose condition holds for the current value.
//!
//! Copyright (c) 2025 Restruct Team
//! Licensed under the Apache-2.0 license

use super::registry::TransformRegistry;
use super::types::{ConditionalTransform, TransformSpec};
use crate::config::EngineConfig;
use crate::Result;
use serde_json::Value;

/// Applies transform specifications using a registry and engine config
#[derive(Debug, Clone, Copy)]
pub struct TransformPipeline<'a> {
    registry: &'a TransformRegistry,
    config: &'a EngineConfig,
}

impl<'a> TransformPipeline<'a> {
    pub fn new(registry: &'a TransformRegistry, config: &'a EngineConfig) -> Self {
        Self { registry, config }
    }

    /// Apply `spec` to `value`. `field` names the schema field in errors.
    pub fn apply(&self, value: Value, spec: &TransformSpec, field: &str) -> Result<Value> {
        match spec {
            TransformSpec::Single(step) => {
                let result = self.registry.invoke(step, &value, self.config, field)?;
                log::trace!("{}: {} -> {} via {}", field, value, result, step.as_str());
                Ok(result)
            }
            TransformSpec::Pipeline(steps) => steps
                .iter()
                .try_fold(value, |current, step| self.apply(current, step, field)),
            TransformSpec::Conditional(conditional) => {
                self.apply_conditional(value, conditional, field)
            }
        }
    }

    fn apply_conditional(
        &self,
        value: Value,
        conditional: &ConditionalTransform,
        field: &str,
    ) -> Result<Value> {
        if let Some(branch) = conditional
            .branches
            .iter()
            .find(|branch| branch.condition.evaluate(&value))
        {
            return self.apply(value, &branch.then, field);
        }

        match &conditional.default {
            Some(default) => self.apply(value, default, field),
            None => Ok(value),
        }
    }
}
