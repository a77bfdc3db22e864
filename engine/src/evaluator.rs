// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use mal_expressions::{DownsamplingHint, MalExpression, PipelineOperation};
use mal_model::{MeterEntity, Sample, SampleFamily};
use mal_retag::KubernetesOracle;

use crate::broadcast;
use crate::cancellation::CancellationToken;
use crate::error::EngineError;
use crate::rate_state::{ExpressionId, StateTable};
use crate::scope::MissingScopeLabel;
use crate::{aggregate, filter, histogram, rewrite, scope, windowed};

pub(crate) struct EvalContext<'a> {
    pub input: &'a HashMap<Box<str>, SampleFamily>,
    pub oracle: &'a dyn KubernetesOracle,
    pub cancellation: &'a CancellationToken,
    pub states: &'a StateTable,
    pub expression_id: ExpressionId,
}

/// Output of binding the tail of a pipeline to a scope (spec §4.2 "Scope
/// binder"): every sample that could be bound, plus any downsampling hint
/// observed along the way (spec §4.2 "a hint to the downstream aggregator;
/// carried on the result").
pub struct Emission {
    pub bound: Vec<(MeterEntity, Sample)>,
    pub downsampling_hint: Option<DownsamplingHint>,
    pub missing_scope_labels: Vec<MissingScopeLabel>,
}

/// Evaluates a fully-formed expression (ending in a scope binder) against
/// one scrape's input map (spec §4.7, §5).
pub(crate) fn evaluate_to_emission(
    expression: &MalExpression,
    ctx: &EvalContext,
) -> Result<Emission, EngineError> {
    let MalExpression::Pipe { base, operation: PipelineOperation::Scope(scope_expr) } = expression else {
        return Err(EngineError::NotScoped);
    };

    let (family, downsampling_hint) = evaluate_family(base, ctx)?;
    let (bound, missing_scope_labels) = scope::bind(scope_expr, &family);
    Ok(Emission { bound, downsampling_hint, missing_scope_labels })
}

/// Evaluates the non-terminal part of a pipeline to a `SampleFamily`,
/// threading along any downsampling hint observed in a nested step (spec
/// §4.2 "does not change evaluator output").
fn evaluate_family(
    expression: &MalExpression,
    ctx: &EvalContext,
) -> Result<(SampleFamily, Option<DownsamplingHint>), EngineError> {
    if ctx.cancellation.is_cancelled() {
        return Err(EngineError::Cancelled);
    }

    match expression {
        MalExpression::Source(source) => Ok((
            ctx.input.get(source.sample_name()).cloned().unwrap_or_default(),
            None,
        )),
        MalExpression::Literal(_, value) => {
            let family = SampleFamily::new(vec![Sample::new("", mal_model::Labels::new(), *value, 0)]);
            Ok((family, None))
        }
        MalExpression::Arithmetic { operator, left, right, .. } => {
            let (left_family, left_hint) = evaluate_family(left, ctx)?;
            let (right_family, right_hint) = evaluate_family(right, ctx)?;
            let joined = broadcast::apply(*operator, &left_family, &right_family);
            Ok((joined, left_hint.or(right_hint)))
        }
        MalExpression::Pipe { base, operation } => {
            let (base_family, base_hint) = evaluate_family(base, ctx)?;
            apply_operation(operation, base_family, base_hint, ctx)
        }
    }
}

fn apply_operation(
    operation: &PipelineOperation,
    family: SampleFamily,
    hint: Option<DownsamplingHint>,
    ctx: &EvalContext,
) -> Result<(SampleFamily, Option<DownsamplingHint>), EngineError> {
    match operation {
        PipelineOperation::Filter(f) => Ok((filter::apply(f, &family), hint)),
        PipelineOperation::Rewrite(r) => Ok((rewrite::apply(r, &family), hint)),
        PipelineOperation::Retag(r) => Ok((
            mal_retag::apply_retag(r.rule(), r.new_key(), r.input_keys(), &family, ctx.oracle),
            hint,
        )),
        PipelineOperation::Aggregate(a) => Ok((aggregate::apply(a, &family), hint)),
        PipelineOperation::Windowed(w) => {
            let (out, new_hint) = windowed::apply(w, &family, ctx.states, ctx.expression_id);
            Ok((out, hint.or(new_hint)))
        }
        PipelineOperation::Histogram(_) => Ok((family, hint)),
        PipelineOperation::HistogramPercentile(h) => Ok((histogram::percentiles(h, &family), hint)),
        PipelineOperation::Scope(_) => Err(EngineError::NotScoped),
    }
}
