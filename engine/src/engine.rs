// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use mal_expressions::{DownsamplingHint, MalExpression};
use mal_model::{MeterEntity, Sample, SampleFamily};
use mal_retag::KubernetesOracle;
use tracing::warn;

use crate::cancellation::CancellationToken;
use crate::diagnostic::DiagnosticLevel;
use crate::error::EngineError;
use crate::evaluator::{evaluate_to_emission, EvalContext};
use crate::rate_state::{ExpressionId, StateTable};

/// One `MeterEntity`-bound sample produced by evaluating a compiled
/// expression (spec §6 `EmittedMetric`). `name` is supplied by the caller
/// (the rule loader knows the `metricPrefix + "_" + name` composition; the
/// evaluation core itself is name-agnostic).
#[derive(Debug, Clone)]
pub struct EmittedMetric {
    pub entity: MeterEntity,
    pub name: Box<str>,
    pub sample: Sample,
    pub downsampling_hint: Option<DownsamplingHint>,
}

/// Configurable behavior shared by every expression evaluated through one
/// `Engine` (spec §7 "the dispatcher logs at a configurable level").
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOptions {
    pub diagnostic_level: DiagnosticLevel,
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_diagnostic_level(mut self, level: DiagnosticLevel) -> Self {
        self.diagnostic_level = level;
        self
    }
}

/// The evaluation core (component C3): walks one compiled `MalExpression`
/// against a scrape's input map, owning the windowed-operator state table
/// shared across every expression that runs through it. Loading rule files
/// and naming emitted metrics is the rule loader's job (component C5); this
/// type never reads YAML or a manifest.
pub struct Engine {
    options: EngineOptions,
    states: StateTable,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::new_with_options(EngineOptions::new())
    }

    pub fn new_with_options(options: EngineOptions) -> Self {
        Self { options, states: StateTable::new() }
    }

    /// Evaluates one compiled expression, identified by `expression_id` so
    /// its rate-family state never collides with another expression's (spec
    /// §5 "No expression mutates another expression's state"). Per-spec
    /// §7.3, a panic inside the tree walk is caught and reported as a
    /// per-expression error rather than unwinding out of `evaluate`.
    pub fn evaluate(
        &self,
        expression_id: ExpressionId,
        metric_name: impl Into<Box<str>>,
        expression: &MalExpression,
        input: &HashMap<Box<str>, SampleFamily>,
        oracle: &dyn KubernetesOracle,
        cancellation: &CancellationToken,
    ) -> Result<Vec<EmittedMetric>, EngineError> {
        let metric_name = metric_name.into();
        let ctx = EvalContext {
            input,
            oracle,
            cancellation,
            states: &self.states,
            expression_id,
        };

        let result = panic::catch_unwind(AssertUnwindSafe(|| evaluate_to_emission(expression, &ctx)));

        match result {
            Ok(Ok(emission)) => {
                if self.options.diagnostic_level >= DiagnosticLevel::Warn {
                    for missing in &emission.missing_scope_labels {
                        warn!(
                            metric = %metric_name,
                            scope = missing.scope_kind,
                            missing_key = %missing.missing_key,
                            "sample dropped at scope binding: missing label"
                        );
                    }
                }
                Ok(emission
                    .bound
                    .into_iter()
                    .map(|(entity, sample)| EmittedMetric {
                        entity,
                        name: metric_name.clone(),
                        sample,
                        downsampling_hint: emission.downsampling_hint,
                    })
                    .collect())
            }
            Ok(Err(error)) => {
                if self.options.diagnostic_level >= DiagnosticLevel::Warn {
                    warn!(metric = %metric_name, error = %error, "expression evaluation failed");
                }
                Err(error)
            }
            Err(panic_payload) => {
                let message = panic_message(&panic_payload);
                warn!(metric = %metric_name, panic = %message, "expression evaluation panicked");
                Err(EngineError::Panicked(message))
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
