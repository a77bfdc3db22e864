// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use crate::{Expression, QueryLocation};

/// `.histogram()` — asserts the family is a cumulative histogram with `le`
/// labels; marks it as histogram-shaped for the evaluator (spec §4.2).
#[derive(Debug, Clone)]
pub struct HistogramExpression {
    query_location: QueryLocation,
}

impl HistogramExpression {
    pub fn new(query_location: QueryLocation) -> Self {
        Self { query_location }
    }
}

impl Expression for HistogramExpression {
    fn get_query_location(&self) -> &QueryLocation {
        &self.query_location
    }

    fn get_name(&self) -> &'static str {
        "HistogramExpression"
    }
}

/// `.histogram_percentile([p...])` — linear-interpolation percentile over
/// buckets (spec §4.2).
#[derive(Debug, Clone)]
pub struct HistogramPercentileExpression {
    query_location: QueryLocation,
    percentiles: Vec<f64>,
}

impl HistogramPercentileExpression {
    pub fn new(query_location: QueryLocation, percentiles: Vec<f64>) -> Self {
        Self {
            query_location,
            percentiles,
        }
    }

    pub fn percentiles(&self) -> &[f64] {
        &self.percentiles
    }
}

impl Expression for HistogramPercentileExpression {
    fn get_query_location(&self) -> &QueryLocation {
        &self.query_location
    }

    fn get_name(&self) -> &'static str {
        "HistogramPercentileExpression"
    }
}
