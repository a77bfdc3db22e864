// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use mal_parser::ParserError;
use thiserror::Error;

/// Rule-load errors (spec §7.1): malformed YAML, or an expression that
/// fails to parse. Every variant is fail-fast — the dispatcher is never
/// constructed from a rule file it cannot fully load.
#[derive(Error, Debug)]
pub enum RuleLoadError {
    #[error("{path}: invalid rule-file YAML: {source}")]
    InvalidYaml {
        path: Box<str>,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{path}: metric '{metric_name}' failed to parse: {source}")]
    ExpressionParse {
        path: Box<str>,
        metric_name: Box<str>,
        #[source]
        source: ParserError,
    },
}
