// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use mal_expressions::ArithmeticOperator;
use mal_model::{Sample, SampleFamily};

/// Joins two families under binary arithmetic (spec §4.3). Samples are
/// matched by their label set with the `le` key stripped, so histogram
/// buckets join bucket-wise under equal `le`. A single-sample family with
/// empty labels broadcasts across every sample on the other side.
/// Divide-by-zero yields no sample for that key rather than failing the
/// whole expression; a non-finite result (NaN, ±∞) is dropped silently
/// (spec §4.7).
pub fn apply(operator: ArithmeticOperator, left: &SampleFamily, right: &SampleFamily) -> SampleFamily {
    if let Some(scalar) = as_broadcast_scalar(left) {
        return map_scalar_left(operator, scalar, right);
    }
    if let Some(scalar) = as_broadcast_scalar(right) {
        return map_scalar_right(operator, left, scalar);
    }

    let mut right_by_key: HashMap<u64, &Sample> = HashMap::new();
    for sample in right.iter() {
        right_by_key.insert(join_key(sample), sample);
    }

    let mut out = SampleFamily::empty();
    for left_sample in left.iter() {
        let Some(right_sample) = right_by_key.get(&join_key(left_sample)) else {
            continue;
        };
        if let Some(value) = operator.apply(left_sample.value(), right_sample.value()) {
            if value.is_finite() {
                out.push(Sample::new(
                    left_sample.name(),
                    left_sample.labels().without_histogram_bucket(),
                    value,
                    left_sample.timestamp_ms().max(right_sample.timestamp_ms()),
                ));
            }
        }
    }
    out
}

/// A family broadcasts as a scalar when it carries exactly one sample with
/// no labels at all (spec §4.3 "If either side is a single-sample family
/// with labels ∅").
fn as_broadcast_scalar(family: &SampleFamily) -> Option<&Sample> {
    match family.samples() {
        [only] if only.labels().is_empty() => Some(only),
        _ => None,
    }
}

fn map_scalar_left(operator: ArithmeticOperator, scalar: &Sample, right: &SampleFamily) -> SampleFamily {
    right
        .iter()
        .filter_map(|sample| {
            let value = operator.apply(scalar.value(), sample.value())?;
            value.is_finite().then(|| {
                Sample::new(
                    sample.name(),
                    sample.labels().clone(),
                    value,
                    sample.timestamp_ms().max(scalar.timestamp_ms()),
                )
            })
        })
        .collect()
}

fn map_scalar_right(operator: ArithmeticOperator, left: &SampleFamily, scalar: &Sample) -> SampleFamily {
    left.iter()
        .filter_map(|sample| {
            let value = operator.apply(sample.value(), scalar.value())?;
            value.is_finite().then(|| {
                Sample::new(
                    sample.name(),
                    sample.labels().clone(),
                    value,
                    sample.timestamp_ms().max(scalar.timestamp_ms()),
                )
            })
        })
        .collect()
}

fn join_key(sample: &Sample) -> u64 {
    sample.labels().without_histogram_bucket().canonical_key()
}

/// Used when a histogram's two sides must line up bucket-for-bucket instead
/// of having their `le` key stripped (spec §4.3 "for histograms, the
/// operation is applied bucket-wise under equal `le`").
pub fn apply_histogram_bucketwise(
    operator: ArithmeticOperator,
    left: &SampleFamily,
    right: &SampleFamily,
) -> SampleFamily {
    let mut right_by_key: HashMap<u64, &Sample> = HashMap::new();
    for sample in right.iter() {
        right_by_key.insert(sample.labels().canonical_key(), sample);
    }

    let mut out = SampleFamily::empty();
    for left_sample in left.iter() {
        let Some(right_sample) = right_by_key.get(&left_sample.labels().canonical_key()) else {
            continue;
        };
        if let Some(value) = operator.apply(left_sample.value(), right_sample.value()) {
            if value.is_finite() {
                out.push(Sample::new(
                    left_sample.name(),
                    left_sample.labels().clone(),
                    value,
                    left_sample.timestamp_ms().max(right_sample.timestamp_ms()),
                ));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mal_model::Labels;

    fn sample(labels: &[(&str, &str)], value: f64) -> Sample {
        Sample::new("m", Labels::from_pairs(labels.iter().copied()), value, 1000)
    }

    #[test]
    fn joins_on_shared_labels() {
        let left = SampleFamily::new(vec![sample(&[("host", "a")], 10.0)]);
        let right = SampleFamily::new(vec![sample(&[("host", "a")], 4.0)]);

        let out = apply(ArithmeticOperator::Divide, &left, &right);
        assert_eq!(out.samples()[0].value(), 2.5);
    }

    #[test]
    fn disjoint_label_sets_yield_empty() {
        let left = SampleFamily::new(vec![sample(&[("host", "a")], 10.0)]);
        let right = SampleFamily::new(vec![sample(&[("host", "b")], 4.0)]);

        assert!(apply(ArithmeticOperator::Add, &left, &right).is_empty());
    }

    #[test]
    fn scalar_broadcasts_across_family() {
        let left = SampleFamily::new(vec![sample(&[], 100.0)]);
        let right = SampleFamily::new(vec![
            sample(&[("host", "a")], 10.0),
            sample(&[("host", "b")], 25.0),
        ]);

        let out = apply(ArithmeticOperator::Subtract, &left, &right);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn divide_by_zero_drops_the_key() {
        let left = SampleFamily::new(vec![sample(&[("host", "a")], 10.0)]);
        let right = SampleFamily::new(vec![sample(&[("host", "a")], 0.0)]);

        assert!(apply(ArithmeticOperator::Divide, &left, &right).is_empty());
    }
}
