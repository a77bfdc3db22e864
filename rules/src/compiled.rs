// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use mal_engine::ExpressionId;
use mal_expressions::MalExpression;

/// One compiled, fully-composed metric rule (spec §4.5, §6). `qualified_id`
/// is the manifest key: the bare metric name, or `metricName_N` when the
/// combination pattern disambiguated it against same-named rules from other
/// sources.
#[derive(Debug, Clone)]
pub struct CompiledMetric {
    pub qualified_id: Box<str>,
    pub metric_name: Box<str>,
    pub expression: MalExpression,
    pub expression_hash: Box<str>,
    pub expression_id: ExpressionId,
    pub source_path: Box<str>,
}
