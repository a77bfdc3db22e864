// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use crate::{Expression, QueryLocation};

/// `tag(closure)` (spec §4.2, §9). The source rule corpus embeds closures
/// that read like dynamic-language code, but every one observed belongs to a
/// small finite family of patterns. Each pattern is its own tagged-variant
/// AST node parsed from the closure text by `mal_parser`'s closure matcher;
/// the engine never interprets arbitrary code (spec §9).
#[derive(Debug, Clone)]
pub enum TagClosure {
    /// `k = literal + existing[k]` — string-concat rewrite.
    ConcatPrefix {
        key: Box<str>,
        prefix: Box<str>,
    },
    /// `forEach([k1, k2, ...], { ... })` — for each listed key, apply a
    /// key-indexed literal replacement table.
    ForEachRemap {
        keys: Vec<Box<str>>,
        table: Vec<(Box<str>, Box<str>)>,
    },
    /// Remove a key entirely.
    RemoveKey { key: Box<str> },
    /// Copy the value of one key to another.
    CopyKey { from: Box<str>, to: Box<str> },
    /// `if existing[k] == v1 then k = v2` — conditional rewrite.
    ConditionalRewrite {
        key: Box<str>,
        when_equals: Box<str>,
        new_value: Box<str>,
    },
}

#[derive(Debug, Clone)]
pub struct TagRewriteExpression {
    query_location: QueryLocation,
    closure: TagClosure,
}

impl TagRewriteExpression {
    pub fn new(query_location: QueryLocation, closure: TagClosure) -> Self {
        Self {
            query_location,
            closure,
        }
    }

    pub fn closure(&self) -> &TagClosure {
        &self.closure
    }
}

impl Expression for TagRewriteExpression {
    fn get_query_location(&self) -> &QueryLocation {
        &self.query_location
    }

    fn get_name(&self) -> &'static str {
        "TagRewriteExpression"
    }
}
