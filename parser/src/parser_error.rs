// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use mal_expressions::{ExpressionError, QueryLocation};
use thiserror::Error;

/// Rule-load-time parse failures (spec §7.1). The loader treats every
/// variant as fail-fast: the engine does not start with a rule file it
/// cannot fully parse.
#[derive(Error, Debug)]
pub enum ParserError {
    #[error("{1}")]
    UnexpectedToken(QueryLocation, String),

    #[error("{1}")]
    UnexpectedEndOfInput(QueryLocation, String),

    #[error("unknown operator '{1}'")]
    UnknownOperator(QueryLocation, String),

    #[error("{1}")]
    InvalidLiteral(QueryLocation, String),

    #[error("closure '{1}' does not match a supported pattern")]
    UnsupportedClosure(QueryLocation, String),
}

impl From<ExpressionError> for ParserError {
    fn from(value: ExpressionError) -> Self {
        ParserError::InvalidLiteral(value.get_query_location().clone(), value.to_string())
    }
}
