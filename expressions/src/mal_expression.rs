// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use crate::{
    AggregationExpression, ArithmeticOperator, Expression, HistogramExpression,
    HistogramPercentileExpression, QueryLocation, RetagExpression, ScopeExpression,
    SourceExpression, TagFilterExpression, TagRewriteExpression, WindowedExpression,
};

/// One step applied to the `SampleFamily` flowing through a pipeline.
/// Everything in spec §4.2 except "Source" and "Arithmetic" is a
/// `PipelineOperation` chained via `MalExpression::Pipe`.
#[derive(Debug, Clone)]
pub enum PipelineOperation {
    Filter(TagFilterExpression),
    Rewrite(TagRewriteExpression),
    Retag(RetagExpression),
    Aggregate(AggregationExpression),
    Windowed(WindowedExpression),
    Histogram(HistogramExpression),
    HistogramPercentile(HistogramPercentileExpression),
    Scope(ScopeExpression),
}

impl PipelineOperation {
    /// `true` for scope binders, the only pipeline step that terminates a
    /// chain in an emission rather than another `SampleFamily` (spec §4.2
    /// "Scope binder").
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineOperation::Scope(_))
    }
}

impl Expression for PipelineOperation {
    fn get_query_location(&self) -> &QueryLocation {
        match self {
            PipelineOperation::Filter(e) => e.get_query_location(),
            PipelineOperation::Rewrite(e) => e.get_query_location(),
            PipelineOperation::Retag(e) => e.get_query_location(),
            PipelineOperation::Aggregate(e) => e.get_query_location(),
            PipelineOperation::Windowed(e) => e.get_query_location(),
            PipelineOperation::Histogram(e) => e.get_query_location(),
            PipelineOperation::HistogramPercentile(e) => e.get_query_location(),
            PipelineOperation::Scope(e) => e.get_query_location(),
        }
    }

    fn get_name(&self) -> &'static str {
        match self {
            PipelineOperation::Filter(e) => e.get_name(),
            PipelineOperation::Rewrite(e) => e.get_name(),
            PipelineOperation::Retag(e) => e.get_name(),
            PipelineOperation::Aggregate(e) => e.get_name(),
            PipelineOperation::Windowed(e) => e.get_name(),
            PipelineOperation::Histogram(e) => e.get_name(),
            PipelineOperation::HistogramPercentile(e) => e.get_name(),
            PipelineOperation::Scope(e) => e.get_name(),
        }
    }
}

/// The normalized AST for one composed rule expression (spec §4.2): a
/// recursive tree rooted at either a named source or a binary arithmetic
/// join of two sub-trees, with zero or more pipeline operations chained on
/// top via `Pipe`.
#[derive(Debug, Clone)]
pub enum MalExpression {
    Source(SourceExpression),
    /// A literal constant, used as the scalar side of `a * k`, `k / a`,
    /// `100 - a`, `1 / a` forms (spec §4.2 "Arithmetic").
    Literal(QueryLocation, f64),
    Arithmetic {
        query_location: QueryLocation,
        operator: ArithmeticOperator,
        left: Box<MalExpression>,
        right: Box<MalExpression>,
    },
    Pipe {
        base: Box<MalExpression>,
        operation: PipelineOperation,
    },
}

impl MalExpression {
    pub fn pipe(self, operation: PipelineOperation) -> MalExpression {
        MalExpression::Pipe {
            base: Box::new(self),
            operation,
        }
    }

    /// Walks the tree collecting every distinct source sample name this
    /// expression consumes (spec §4.5, used by the dispatcher's
    /// `sampleName -> [expression]` index).
    pub fn collect_source_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            MalExpression::Source(s) => out.push(s.sample_name()),
            MalExpression::Literal(_, _) => {}
            MalExpression::Arithmetic { left, right, .. } => {
                left.collect_source_names(out);
                right.collect_source_names(out);
            }
            MalExpression::Pipe { base, .. } => base.collect_source_names(out),
        }
    }

    /// `true` if the root of this tree (after unwrapping any trailing
    /// pipeline operations) is a scope binder.
    pub fn is_scoped(&self) -> bool {
        match self {
            MalExpression::Pipe { operation, .. } => operation.is_terminal(),
            _ => false,
        }
    }
}

impl Expression for MalExpression {
    fn get_query_location(&self) -> &QueryLocation {
        match self {
            MalExpression::Source(s) => s.get_query_location(),
            MalExpression::Literal(loc, _) => loc,
            MalExpression::Arithmetic { query_location, .. } => query_location,
            MalExpression::Pipe { operation, .. } => operation.get_query_location(),
        }
    }

    fn get_name(&self) -> &'static str {
        match self {
            MalExpression::Source(_) => "MalExpression(Source)",
            MalExpression::Literal(_, _) => "MalExpression(Literal)",
            MalExpression::Arithmetic { .. } => "MalExpression(Arithmetic)",
            MalExpression::Pipe { .. } => "MalExpression(Pipe)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> QueryLocation {
        QueryLocation::new_fake()
    }

    #[test]
    fn collects_both_sides_of_arithmetic() {
        let left = MalExpression::Source(SourceExpression::new(loc(), "a"));
        let right = MalExpression::Source(SourceExpression::new(loc(), "b"));
        let tree = MalExpression::Arithmetic {
            query_location: loc(),
            operator: ArithmeticOperator::Add,
            left: Box::new(left),
            right: Box::new(right),
        };

        let mut names = Vec::new();
        tree.collect_source_names(&mut names);
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn literal_contributes_no_source_name() {
        let tree = MalExpression::Arithmetic {
            query_location: loc(),
            operator: ArithmeticOperator::Multiply,
            left: Box::new(MalExpression::Source(SourceExpression::new(loc(), "cpu"))),
            right: Box::new(MalExpression::Literal(loc(), 100.0)),
        };

        let mut names = Vec::new();
        tree.collect_source_names(&mut names);
        assert_eq!(names, vec!["cpu"]);
    }
}
