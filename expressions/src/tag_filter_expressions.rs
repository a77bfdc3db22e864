// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use regex::Regex;

use crate::{Expression, QueryLocation};

/// Tag-filter category of spec §4.2: every variant keeps a sample or drops
/// it, never rewrites it.
#[derive(Debug, Clone)]
pub enum TagFilterExpression {
    /// `tagEqual(k, v)` — keep samples with `labels[k] == v`.
    TagEqual(TagLiteralFilter),
    /// `tagNotEqual(k, v)` — keep where `labels[k] != v`.
    TagNotEqual(TagLiteralFilter),
    /// `tagMatch(k, regex)` — keep where `labels[k]` matches a
    /// fully-anchored regular expression.
    TagMatch(TagRegexFilter),
    /// `tagNotMatch(k, regex)` — keep where it does not match.
    TagNotMatch(TagRegexFilter),
    /// `valueEqual(x)` — keep samples with `value == x`.
    ValueEqual(ValueLiteralFilter),
}

#[derive(Debug, Clone)]
pub struct TagLiteralFilter {
    query_location: QueryLocation,
    key: Box<str>,
    value: Box<str>,
}

impl TagLiteralFilter {
    pub fn new(query_location: QueryLocation, key: impl Into<Box<str>>, value: impl Into<Box<str>>) -> Self {
        Self {
            query_location,
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

#[derive(Debug, Clone)]
pub struct TagRegexFilter {
    query_location: QueryLocation,
    key: Box<str>,
    pattern: Box<str>,
    /// Spec §4.2 requires the regex be "fully-anchored"; the pattern text is
    /// wrapped in `^(?:...)$` once at parse time so matching is a single
    /// `Regex::is_match` call rather than a re-anchoring check per sample.
    regex: Regex,
}

impl TagRegexFilter {
    pub fn new(
        query_location: QueryLocation,
        key: impl Into<Box<str>>,
        pattern: impl Into<Box<str>>,
        regex: Regex,
    ) -> Self {
        Self {
            query_location,
            key: key.into(),
            pattern: pattern.into(),
            regex,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

#[derive(Debug, Clone)]
pub struct ValueLiteralFilter {
    query_location: QueryLocation,
    value: f64,
}

impl ValueLiteralFilter {
    pub fn new(query_location: QueryLocation, value: f64) -> Self {
        Self {
            query_location,
            value,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl Expression for TagFilterExpression {
    fn get_query_location(&self) -> &QueryLocation {
        match self {
            TagFilterExpression::TagEqual(f) | TagFilterExpression::TagNotEqual(f) => {
                &f.query_location
            }
            TagFilterExpression::TagMatch(f) | TagFilterExpression::TagNotMatch(f) => {
                &f.query_location
            }
            TagFilterExpression::ValueEqual(f) => &f.query_location,
        }
    }

    fn get_name(&self) -> &'static str {
        match self {
            TagFilterExpression::TagEqual(_) => "TagFilterExpression(TagEqual)",
            TagFilterExpression::TagNotEqual(_) => "TagFilterExpression(TagNotEqual)",
            TagFilterExpression::TagMatch(_) => "TagFilterExpression(TagMatch)",
            TagFilterExpression::TagNotMatch(_) => "TagFilterExpression(TagNotMatch)",
            TagFilterExpression::ValueEqual(_) => "TagFilterExpression(ValueEqual)",
        }
    }
}
