// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use crate::compiled::CompiledMetric;

/// Indexes every compiled metric by the source sample names its expression
/// reads, so a scrape only evaluates expressions whose inputs are actually
/// present (spec §4.5 "The dispatcher parses each expression's source-sample
/// usage... to build an index `sampleName -> [expression]`").
pub struct Dispatcher {
    compiled: Vec<CompiledMetric>,
    by_sample_name: HashMap<Box<str>, Vec<usize>>,
}

impl Dispatcher {
    pub(crate) fn new(compiled: Vec<CompiledMetric>) -> Self {
        let mut by_sample_name: HashMap<Box<str>, Vec<usize>> = HashMap::new();
        for (index, metric) in compiled.iter().enumerate() {
            let mut names = Vec::new();
            metric.expression.collect_source_names(&mut names);
            for name in names {
                by_sample_name.entry(name.into()).or_default().push(index);
            }
        }
        Self { compiled, by_sample_name }
    }

    pub fn compiled_metrics(&self) -> &[CompiledMetric] {
        &self.compiled
    }

    /// Every compiled metric that names `sample_name` as one of its
    /// sources, the set a scrape carrying that sample should evaluate.
    pub fn metrics_for_sample(&self, sample_name: &str) -> impl Iterator<Item = &CompiledMetric> {
        self.by_sample_name
            .get(sample_name)
            .into_iter()
            .flatten()
            .map(|&index| &self.compiled[index])
    }

    /// Every compiled metric whose required source samples are present in
    /// `input`, deduplicated across the metrics that share more than one
    /// source — one expression never runs twice for the same scrape (spec
    /// §5 "The dispatcher therefore partitions work by expression
    /// identity").
    pub fn metrics_for_input<'a>(
        &'a self,
        input: &HashMap<Box<str>, mal_model::SampleFamily>,
    ) -> Vec<&'a CompiledMetric> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for sample_name in input.keys() {
            for metric in self.metrics_for_sample(sample_name) {
                if seen.insert(metric.expression_id) {
                    out.push(metric);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mal_engine::ExpressionId;
    use mal_expressions::{MalExpression, PipelineOperation, QueryLocation, ScopeExpression, ServiceScope, SourceExpression};

    fn scoped_expr(source_name: &str) -> MalExpression {
        MalExpression::Source(SourceExpression::new(QueryLocation::new_fake(), source_name)).pipe(
            PipelineOperation::Scope(ScopeExpression::Service(ServiceScope::new(
                QueryLocation::new_fake(),
                vec!["service".into()],
                "GENERAL",
            ))),
        )
    }

    #[test]
    fn indexes_metrics_by_source_name() {
        let compiled = vec![CompiledMetric {
            qualified_id: "kong_bandwidth".into(),
            metric_name: "kong_bandwidth".into(),
            expression: scoped_expr("kong_bandwidth_bytes"),
            expression_hash: "abc".into(),
            expression_id: ExpressionId(0),
            source_path: "kong-rules.yaml".into(),
        }];
        let dispatcher = Dispatcher::new(compiled);

        assert_eq!(dispatcher.metrics_for_sample("kong_bandwidth_bytes").count(), 1);
        assert_eq!(dispatcher.metrics_for_sample("other").count(), 0);
    }
}
