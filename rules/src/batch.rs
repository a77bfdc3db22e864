// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use mal_engine::{CancellationToken, EmittedMetric, Engine, EngineError};
use mal_model::SampleFamily;
use mal_retag::KubernetesOracle;

use crate::dispatcher::Dispatcher;

/// The outcome of evaluating one dispatched metric against a scrape (spec
/// §3's success/data/error triple, realized at dispatch granularity rather
/// than inside a single expression: each metric either emitted samples or
/// carries the `EngineError` that stopped it, and one metric failing never
/// stops its siblings).
pub struct MetricOutcome {
    pub qualified_id: Box<str>,
    pub result: Result<Vec<EmittedMetric>, EngineError>,
}

/// Evaluates every metric the dispatcher selects for `input`, continuing
/// past individual failures (spec §7.3 "the dispatcher logs at a
/// configurable level and continues"; cancellation is the one error that
/// should realistically stop the whole sweep, but callers that want strict
/// fail-fast on cancellation can inspect each `MetricOutcome` and bail out
/// themselves).
pub fn evaluate_all(
    dispatcher: &Dispatcher,
    engine: &Engine,
    input: &HashMap<Box<str>, SampleFamily>,
    oracle: &dyn KubernetesOracle,
    cancellation: &CancellationToken,
) -> Vec<MetricOutcome> {
    dispatcher
        .metrics_for_input(input)
        .into_iter()
        .map(|metric| {
            let result =
                engine.evaluate(metric.expression_id, metric.metric_name.clone(), &metric.expression, input, oracle, cancellation);
            MetricOutcome { qualified_id: metric.qualified_id.clone(), result }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mal_expressions::{MalExpression, PipelineOperation, QueryLocation, ScopeExpression, ServiceScope, SourceExpression};
    use mal_model::{Labels, Sample};
    use mal_retag::StaticOracle;

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
    fn one_failing_metric_does_not_suppress_others() {
        let compiled = vec![
            crate::compiled::CompiledMetric {
                qualified_id: "meter_cpu".into(),
                metric_name: "meter_cpu".into(),
                expression: scoped_expr("process_cpu_usage"),
                expression_hash: "a".into(),
                expression_id: mal_engine::ExpressionId(0),
                source_path: "a.yaml".into(),
            },
            crate::compiled::CompiledMetric {
                qualified_id: "meter_mem".into(),
                metric_name: "meter_mem".into(),
                expression: MalExpression::Source(SourceExpression::new(QueryLocation::new_fake(), "process_mem_usage")),
                expression_hash: "b".into(),
                expression_id: mal_engine::ExpressionId(1),
                source_path: "a.yaml".into(),
            },
        ];
        let dispatcher = Dispatcher::new(compiled);
        let engine = Engine::new();
        let oracle = StaticOracle::new();
        let cancellation = CancellationToken::new();

        let mut input = HashMap::new();
        input.insert(
            Box::from("process_cpu_usage"),
            SampleFamily::new(vec![Sample::new("process_cpu_usage", Labels::from_pairs([("service", "checkout")]), 0.5, 1000)]),
        );
        input.insert(
            Box::from("process_mem_usage"),
            SampleFamily::new(vec![Sample::new("process_mem_usage", Labels::new(), 100.0, 1000)]),
        );

        let outcomes = evaluate_all(&dispatcher, &engine, &input, &oracle, &cancellation);

        assert_eq!(outcomes.len(), 2);
        let cpu = outcomes.iter().find(|o| &*o.qualified_id == "meter_cpu").unwrap();
        assert!(cpu.result.is_ok());
        let mem = outcomes.iter().find(|o| &*o.qualified_id == "meter_mem").unwrap();
        assert!(matches!(mem.result, Err(EngineError::NotScoped)));
    }
}
