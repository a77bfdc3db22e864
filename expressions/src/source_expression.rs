// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use crate::{Expression, QueryLocation};

/// Names a `SampleFamily` from the evaluation's input map (spec §4.2,
/// "Source" category). Every expression tree has exactly one source node at
/// its root (or two, joined by an arithmetic node).
#[derive(Debug, Clone, PartialEq)]
pub struct SourceExpression {
    query_location: QueryLocation,
    sample_name: Box<str>,
}

impl SourceExpression {
    pub fn new(query_location: QueryLocation, sample_name: impl Into<Box<str>>) -> Self {
        Self {
            query_location,
            sample_name: sample_name.into(),
        }
    }

    pub fn sample_name(&self) -> &str {
        &self.sample_name
    }
}

impl Expression for SourceExpression {
    fn get_query_location(&self) -> &QueryLocation {
        &self.query_location
    }

    fn get_name(&self) -> &'static str {
        "SourceExpression"
    }
}
