// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use mal_expressions::{AggregationExpression, AggregationOperator};
use mal_model::{Labels, Sample, SampleFamily};

struct Group {
    labels: Labels,
    sum: f64,
    count: usize,
    max: f64,
    min: f64,
    latest_timestamp_ms: i64,
}

/// Groups samples by the projected tuple of `group_keys` and reduces each
/// group to one sample (spec §4.2 "Grouped reduction"). A sample missing
/// one of the requested keys still participates: its projection simply
/// omits that key, which naturally separates it into its own bucket from
/// samples that do carry the key (spec's "distinguished empty bucket").
pub fn apply(aggregation: &AggregationExpression, family: &SampleFamily) -> SampleFamily {
    let keys: Vec<&str> = aggregation.group_keys().iter().map(|k| k.as_ref()).collect();
    let mut groups: HashMap<u64, Group> = HashMap::new();

    for sample in family.iter() {
        let projected = sample.labels().project(&keys);
        let group_key = projected.canonical_key();
        let entry = groups.entry(group_key).or_insert_with(|| Group {
            labels: projected,
            sum: 0.0,
            count: 0,
            max: f64::NEG_INFINITY,
            min: f64::INFINITY,
            latest_timestamp_ms: i64::MIN,
        });
        entry.sum += sample.value();
        entry.count += 1;
        entry.max = entry.max.max(sample.value());
        entry.min = entry.min.min(sample.value());
        entry.latest_timestamp_ms = entry.latest_timestamp_ms.max(sample.timestamp_ms());
    }

    let name = family.samples().first().map(|s| s.name()).unwrap_or("").to_string();

    groups
        .into_values()
        .map(|group| {
            let value = match aggregation.operator() {
                AggregationOperator::Sum => group.sum,
                AggregationOperator::Avg => group.sum / group.count as f64,
                AggregationOperator::Max => group.max,
                AggregationOperator::Min => group.min,
            };
            Sample::new(name.clone(), group.labels, value, group.latest_timestamp_ms)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mal_expressions::QueryLocation;

    fn sample(host: &str, direction: &str, value: f64) -> Sample {
        Sample::new(
            "kong_bandwidth_bytes",
            Labels::from_pairs([("host_name", host), ("direction", direction)]),
            value,
            1000,
        )
    }

    #[test]
    fn sums_within_group() {
        let family = SampleFamily::new(vec![
            sample("a", "in", 1.0),
            sample("a", "in", 2.0),
            sample("b", "in", 5.0),
        ]);
        let agg = AggregationExpression::new(
            QueryLocation::new_fake(),
            AggregationOperator::Sum,
            vec!["host_name".into(), "direction".into()],
        );

        let out = apply(&agg, &family);
        assert_eq!(out.len(), 2);
        let total: f64 = out.iter().map(|s| s.value()).sum();
        assert_eq!(total, 8.0);
    }

    #[test]
    fn avg_divides_by_group_count() {
        let family = SampleFamily::new(vec![sample("a", "in", 2.0), sample("a", "in", 4.0)]);
        let agg = AggregationExpression::new(
            QueryLocation::new_fake(),
            AggregationOperator::Avg,
            vec!["host_name".into()],
        );

        let out = apply(&agg, &family);
        assert_eq!(out.samples()[0].value(), 3.0);
    }
}
