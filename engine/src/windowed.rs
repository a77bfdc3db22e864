// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use mal_expressions::{DownsamplingHint, WindowedExpression};
use mal_model::SampleFamily;

use crate::rate_state::{ExpressionId, RateState, StateTable};

/// Applies a windowed operator to every observed label set in `family`
/// (spec §4.6). `rate`/`increase` compute using the most recently primed
/// sample for that label set regardless of how much wall-clock time passed
/// — the window argument is a multiplier (`rate`) or inert metadata
/// (`increase`), never a gate, per spec §4.6's explicit clarification that
/// overrides the looser "if window elapsed" phrasing in the operator table.
/// `downsampling` is a pure passthrough whose hint is reported separately
/// for the scope-binding step to attach to the emitted metric.
pub fn apply(
    windowed: &WindowedExpression,
    family: &SampleFamily,
    states: &StateTable,
    expression_id: ExpressionId,
) -> (SampleFamily, Option<DownsamplingHint>) {
    match windowed {
        WindowedExpression::Rate(op) => {
            let window_seconds = op.window_seconds();
            (
                compute_delta(family, states, expression_id, move |delta, elapsed_ms| {
                    if elapsed_ms == 0 {
                        None
                    } else {
                        Some(delta / (elapsed_ms as f64 / 1000.0) * window_seconds)
                    }
                }),
                None,
            )
        }
        WindowedExpression::Increase(_) => (
            compute_delta(family, states, expression_id, |delta, _elapsed_ms| Some(delta)),
            None,
        ),
        WindowedExpression::Irate(_) => (
            compute_delta(family, states, expression_id, |delta, elapsed_ms| {
                if elapsed_ms == 0 {
                    None
                } else {
                    Some(delta / elapsed_ms as f64 * 1000.0)
                }
            }),
            None,
        ),
        WindowedExpression::Downsampling(hint) => (family.clone(), Some(hint.hint())),
    }
}

fn compute_delta(
    family: &SampleFamily,
    states: &StateTable,
    expression_id: ExpressionId,
    formula: impl Fn(f64, i64) -> Option<f64>,
) -> SampleFamily {
    family
        .iter()
        .filter_map(|sample| {
            let label_key = sample.labels().canonical_key();
            states.advance(expression_id, label_key, |previous| {
                let next = RateState::Primed {
                    value: sample.value(),
                    timestamp_ms: sample.timestamp_ms(),
                };
                let output = match previous {
                    RateState::Empty => None,
                    RateState::Primed { value: old_value, timestamp_ms: old_ts } => {
                        let effective_old = if sample.value() < old_value { 0.0 } else { old_value };
                        let delta = sample.value() - effective_old;
                        let elapsed_ms = sample.timestamp_ms() - old_ts;
                        formula(delta, elapsed_ms)
                    }
                };
                (output, next)
            })
            .map(|value| sample.with_value(value))
            .filter(|s| s.value().is_finite())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mal_expressions::{QueryLocation, WindowedOperation};
    use mal_model::{Labels, Sample};

    fn sample(value: f64, timestamp_ms: i64) -> Sample {
        Sample::new("m", Labels::from_pairs([("host", "a")]), value, timestamp_ms)
    }

    #[test]
    fn rate_has_no_output_on_first_observation() {
        let states = StateTable::new();
        let family = SampleFamily::new(vec![sample(10.0, 1000)]);
        let windowed = WindowedExpression::Rate(WindowedOperation::new(QueryLocation::new_fake(), 60.0));

        let (out, _) = apply(&windowed, &family, &states, ExpressionId(1));
        assert!(out.is_empty());
    }

    #[test]
    fn rate_multiplies_delta_by_window_seconds() {
        let states = StateTable::new();
        let windowed = WindowedExpression::Rate(WindowedOperation::new(QueryLocation::new_fake(), 60.0));

        apply(&windowed, &SampleFamily::new(vec![sample(100.0, 0)]), &states, ExpressionId(1));
        let (out, _) = apply(
            &windowed,
            &SampleFamily::new(vec![sample(160.0, 30_000)]),
            &states,
            ExpressionId(1),
        );

        assert_eq!(out.samples()[0].value(), 120.0);
    }

    #[test]
    fn counter_reset_treats_old_value_as_zero() {
        let states = StateTable::new();
        let windowed = WindowedExpression::Increase(WindowedOperation::new(QueryLocation::new_fake(), 60.0));

        apply(&windowed, &SampleFamily::new(vec![sample(500.0, 0)]), &states, ExpressionId(7));
        let (out, _) = apply(
            &windowed,
            &SampleFamily::new(vec![sample(5.0, 1000)]),
            &states,
            ExpressionId(7),
        );

        assert_eq!(out.samples()[0].value(), 5.0);
    }
}
