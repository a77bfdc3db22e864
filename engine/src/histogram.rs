// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use mal_expressions::HistogramPercentileExpression;
use mal_model::{Labels, Sample, SampleFamily};

struct Bucket {
    bound: f64,
    is_inf: bool,
    cumulative: f64,
}

/// Computes one sample per (non-`le` label set, percentile) pair by linear
/// interpolation over cumulative histogram buckets (spec §4.2). The `+Inf`
/// bucket is treated as an open upper bound; when the target percentile
/// falls into it, the second-highest finite bound is used as a conservative
/// estimate of its upper edge (spec §4.2).
pub fn percentiles(expression: &HistogramPercentileExpression, family: &SampleFamily) -> SampleFamily {
    let mut groups: HashMap<u64, (Labels, Vec<Bucket>)> = HashMap::new();

    for sample in family.iter() {
        let Some(le) = sample.labels().get(Labels::HISTOGRAM_BUCKET_KEY) else {
            continue;
        };
        let is_inf = le == Labels::HISTOGRAM_INF_BOUND;
        let bound = if is_inf {
            f64::INFINITY
        } else {
            match le.parse::<f64>() {
                Ok(b) => b,
                Err(_) => continue,
            }
        };

        let rest = sample.labels().without_histogram_bucket();
        let group_key = rest.canonical_key();
        let entry = groups.entry(group_key).or_insert_with(|| (rest, Vec::new()));
        entry.1.push(Bucket { bound, is_inf, cumulative: sample.value() });
    }

    let name = family.samples().first().map(|s| s.name()).unwrap_or("").to_string();
    let mut out = SampleFamily::empty();

    for (labels, mut buckets) in groups.into_values() {
        buckets.sort_by(|a, b| a.bound.partial_cmp(&b.bound).unwrap_or(std::cmp::Ordering::Equal));
        let Some(total) = buckets.last().map(|b| b.cumulative) else {
            continue;
        };
        if total <= 0.0 {
            continue;
        }

        let second_highest_bound = buckets
            .iter()
            .rev()
            .find(|b| !b.is_inf)
            .map(|b| b.bound)
            .unwrap_or(0.0);

        for &percentile in expression.percentiles() {
            let target = total * (percentile / 100.0);
            let mut lower_bound = 0.0;
            let mut lower_cumulative = 0.0;
            let mut estimate = None;

            for bucket in &buckets {
                if bucket.cumulative >= target {
                    let upper_bound = if bucket.is_inf { second_highest_bound } else { bucket.bound };
                    estimate = Some(if bucket.cumulative == lower_cumulative {
                        upper_bound
                    } else {
                        lower_bound
                            + (target - lower_cumulative) / (bucket.cumulative - lower_cumulative)
                                * (upper_bound - lower_bound)
                    });
                    break;
                }
                lower_bound = if bucket.is_inf { second_highest_bound } else { bucket.bound };
                lower_cumulative = bucket.cumulative;
            }

            if let Some(value) = estimate {
                let mut labels = labels.clone();
                labels.insert("p", format!("{percentile}"));
                out.push(Sample::new(name.clone(), labels, value, 0));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mal_expressions::QueryLocation;

    fn bucket(le: &str, cumulative: f64) -> Sample {
        Sample::new(
            "http_server_requests_latency",
            Labels::from_pairs([(Labels::HISTOGRAM_BUCKET_KEY, le)]),
            cumulative,
            1000,
        )
    }

    #[test]
    fn interpolates_within_matching_bucket() {
        let family = SampleFamily::new(vec![
            bucket("0.1", 10.0),
            bucket("0.5", 40.0),
            bucket("1.0", 50.0),
            bucket("+Inf", 50.0),
        ]);
        let expr = HistogramPercentileExpression::new(QueryLocation::new_fake(), vec![50.0]);

        let out = percentiles(&expr, &family);
        assert_eq!(out.len(), 1);
        assert!(out.samples()[0].value() > 0.1 && out.samples()[0].value() <= 0.5);
    }

    #[test]
    fn empty_histogram_yields_no_percentiles() {
        let family = SampleFamily::empty();
        let expr = HistogramPercentileExpression::new(QueryLocation::new_fake(), vec![99.0]);
        assert!(percentiles(&expr, &family).is_empty());
    }
}
