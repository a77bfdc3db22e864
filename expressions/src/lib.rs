// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

//! The closed expression grammar (component C2) described in spec §4.2: a
//! fixed set of operators, normalized into an AST rooted at
//! [`MalExpression`]. There is no user-defined-function path and no loop
//! construct in the evaluator; `mal_parser` builds this tree from a rule
//! expression string and `mal_engine` walks it.

mod aggregation_expressions;
mod arithmetic_expressions;
mod expression;
mod expression_error;
mod histogram_expressions;
mod mal_expression;
mod retag_expression;
mod scope_expressions;
mod source_expression;
mod tag_filter_expressions;
mod tag_rewrite_expression;
mod windowed_expressions;

pub use aggregation_expressions::{AggregationExpression, AggregationOperator};
pub use arithmetic_expressions::ArithmeticOperator;
pub use expression::{Expression, QueryLocation};
pub use expression_error::ExpressionError;
pub use histogram_expressions::{HistogramExpression, HistogramPercentileExpression};
pub use mal_expression::{MalExpression, PipelineOperation};
pub use retag_expression::{RetagExpression, RetagRuleKind};
pub use scope_expressions::{
    EndpointScope, InstanceScope, ProcessRelationScope, ScopeExpression, ServiceRelationScope,
    ServiceScope,
};
pub use source_expression::SourceExpression;
pub use tag_filter_expressions::{
    TagFilterExpression, TagLiteralFilter, TagRegexFilter, ValueLiteralFilter,
};
pub use tag_rewrite_expression::{TagClosure, TagRewriteExpression};
pub use windowed_expressions::{
    DownsamplingExpression, DownsamplingHint, WindowedExpression, WindowedOperation,
};
