// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use crate::{Expression, QueryLocation};

/// Grouped-reduction category of spec §4.2: `sum`/`avg`/`max`/`min`, all
/// sharing the same grouping shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationOperator {
    Sum,
    Avg,
    Max,
    Min,
}

#[derive(Debug, Clone)]
pub struct AggregationExpression {
    query_location: QueryLocation,
    operator: AggregationOperator,
    group_keys: Vec<Box<str>>,
}

impl AggregationExpression {
    pub fn new(
        query_location: QueryLocation,
        operator: AggregationOperator,
        group_keys: Vec<Box<str>>,
    ) -> Self {
        Self {
            query_location,
            operator,
            group_keys,
        }
    }

    pub fn operator(&self) -> AggregationOperator {
        self.operator
    }

    pub fn group_keys(&self) -> &[Box<str>] {
        &self.group_keys
    }
}

impl Expression for AggregationExpression {
    fn get_query_location(&self) -> &QueryLocation {
        &self.query_location
    }

    fn get_name(&self) -> &'static str {
        match self.operator {
            AggregationOperator::Sum => "AggregationExpression(Sum)",
            AggregationOperator::Avg => "AggregationExpression(Avg)",
            AggregationOperator::Max => "AggregationExpression(Max)",
            AggregationOperator::Min => "AggregationExpression(Min)",
        }
    }
}
