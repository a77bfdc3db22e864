// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use crate::{Expression, QueryLocation};

/// The closed set of retag rules (spec §4.4). Each rule specifies which
/// label names on the input sample are consulted and how the K8s oracle's
/// answer populates the new key; the rule kind itself carries no logic here
/// — `mal_retag` interprets it against an oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetagRuleKind {
    /// Resolve a pod (by IP, or by name+namespace) to the service that
    /// fronts it.
    Pod2Service,
    /// Resolve a service object id to one of its backing pods.
    Service2Pod,
    /// Resolve a pod IP directly to a service name, skipping the
    /// intermediate pod object lookup.
    PodIp2Service,
}

impl RetagRuleKind {
    pub fn parse(name: &str) -> Option<RetagRuleKind> {
        match name {
            "Pod2Service" => Some(RetagRuleKind::Pod2Service),
            "Service2Pod" => Some(RetagRuleKind::Service2Pod),
            "PodIp2Service" => Some(RetagRuleKind::PodIp2Service),
            _ => None,
        }
    }
}

/// `retagByK8sMeta(newKey, rule, inputKey1, inputKey2)` (spec §4.2, §4.4).
#[derive(Debug, Clone)]
pub struct RetagExpression {
    query_location: QueryLocation,
    new_key: Box<str>,
    rule: RetagRuleKind,
    input_keys: Vec<Box<str>>,
}

impl RetagExpression {
    pub fn new(
        query_location: QueryLocation,
        new_key: impl Into<Box<str>>,
        rule: RetagRuleKind,
        input_keys: Vec<Box<str>>,
    ) -> Self {
        Self {
            query_location,
            new_key: new_key.into(),
            rule,
            input_keys,
        }
    }

    pub fn new_key(&self) -> &str {
        &self.new_key
    }

    pub fn rule(&self) -> RetagRuleKind {
        self.rule
    }

    pub fn input_keys(&self) -> &[Box<str>] {
        &self.input_keys
    }
}

impl Expression for RetagExpression {
    fn get_query_location(&self) -> &QueryLocation {
        &self.query_location
    }

    fn get_name(&self) -> &'static str {
        "RetagExpression"
    }
}
