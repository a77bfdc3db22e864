// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use mal_rules::Dispatcher;
use sha2::{Digest, Sha256};

use crate::error::ManifestError;
use crate::properties;

/// The `qualifiedId=sha256(exprText)` mapping (spec §6): disambiguates the
/// combination pattern at lookup time by pairing a *compiled unit* with the
/// hash of the exact expression text that produced it. Keyed by
/// `qualifiedId`, not bare `metricName` — under the combination pattern two
/// or more compiled metrics share the same `metricName` but carry different
/// expression hashes, and a `metricName`-keyed lookup would only ever see
/// the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpressionHashes {
    entries: Vec<(Box<str>, Box<str>)>,
}

impl ExpressionHashes {
    pub fn from_dispatcher(dispatcher: &Dispatcher) -> Self {
        let mut entries: Vec<(Box<str>, Box<str>)> = dispatcher
            .compiled_metrics()
            .iter()
            .map(|metric| (metric.qualified_id.clone(), metric.expression_hash.clone()))
            .collect();
        entries.sort();
        Self { entries }
    }

    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        Ok(Self { entries: properties::parse(text)? })
    }

    pub fn render(&self) -> String {
        properties::render(&self.entries)
    }

    pub fn hash_for(&self, qualified_id: &str) -> Option<&str> {
        self.entries.iter().find(|(id, _)| id.as_ref() == qualified_id).map(|(_, hash)| hash.as_ref())
    }

    /// True if `qualified_id`'s recorded hash still matches `expr_text`,
    /// i.e. that specific compiled unit has not drifted since the manifest
    /// was generated.
    pub fn matches(&self, qualified_id: &str, expr_text: &str) -> bool {
        let live = hex::encode(Sha256::digest(expr_text.as_bytes()));
        self.hash_for(qualified_id).is_some_and(|recorded| recorded == live)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_a_matching_expression() {
        let hash = hex::encode(Sha256::digest(b"sum(foo)"));
        let hashes = ExpressionHashes { entries: vec![("foo_total".into(), hash.into())] };
        assert!(hashes.matches("foo_total", "sum(foo)"));
        assert!(!hashes.matches("foo_total", "sum(bar)"));
    }

    #[test]
    fn unknown_qualified_id_never_matches() {
        let hashes = ExpressionHashes::default();
        assert!(!hashes.matches("absent", "anything"));
    }

    #[test]
    fn combination_members_sharing_a_metric_name_keep_distinct_hashes() {
        let hash_a = hex::encode(Sha256::digest(b"sum(foo)"));
        let hash_b = hex::encode(Sha256::digest(b"sum(bar)"));
        let hashes = ExpressionHashes {
            entries: vec![("foo_total_1".into(), hash_a.into()), ("foo_total_2".into(), hash_b.into())],
        };

        assert!(hashes.matches("foo_total_1", "sum(foo)"));
        assert!(hashes.matches("foo_total_2", "sum(bar)"));
        assert!(!hashes.matches("foo_total_1", "sum(bar)"));
    }
}
