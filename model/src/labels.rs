// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

/// A mapping from string keys to string values, keys unique.
///
/// Backed by a `BTreeMap` rather than a hash map so that iteration order is
/// deterministic within a process (spec §3): derived hashes and test output
/// do not depend on insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels {
    entries: BTreeMap<Box<str>, Box<str>>,
}

impl Labels {
    /// The label key used on cumulative histogram bucket samples (spec §3
    /// invariant 5).
    pub const HISTOGRAM_BUCKET_KEY: &'static str = "le";

    /// The sentinel value for the open-topped histogram bucket.
    pub const HISTOGRAM_INF_BOUND: &'static str = "+Inf";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Box<str>>,
        V: Into<Box<str>>,
    {
        let mut entries = BTreeMap::new();
        for (k, v) in pairs {
            let _ = entries.insert(k.into(), v.into());
        }
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|v| v.as_ref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<Box<str>>, value: impl Into<Box<str>>) {
        let _ = self.entries.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Box<str>> {
        self.entries.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_ref(), v.as_ref()))
    }

    /// Returns a copy of this label set retaining only the given keys, in
    /// the order the keys were requested losing no information about
    /// which keys were missing (those are simply absent from the result).
    pub fn project(&self, keys: &[&str]) -> Labels {
        let mut out = Labels::new();
        for key in keys {
            if let Some(value) = self.get(key) {
                out.insert(*key, value);
            }
        }
        out
    }

    /// Returns a copy of this label set without the `le` key, used when
    /// joining two families under the non-histogram join keys (spec §4.3).
    pub fn without_histogram_bucket(&self) -> Labels {
        let mut out = self.clone();
        let _ = out.remove(Self::HISTOGRAM_BUCKET_KEY);
        out
    }

    /// A hash of this label set stable across process runs and independent
    /// of insertion order, used to key rate-family state tables and
    /// grouped-reduction buckets (spec §9).
    pub fn canonical_key(&self) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        for (k, v) in &self.entries {
            k.hash(&mut hasher);
            0u8.hash(&mut hasher);
            v.hash(&mut hasher);
            1u8.hash(&mut hasher);
        }
        hasher.finish()
    }
}

impl FromIterator<(Box<str>, Box<str>)> for Labels {
    fn from_iter<I: IntoIterator<Item = (Box<str>, Box<str>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_keeps_only_requested_keys() {
        let labels = Labels::from_pairs([("a", "1"), ("b", "2"), ("c", "3")]);
        let projected = labels.project(&["a", "c", "missing"]);

        assert_eq!(projected.get("a"), Some("1"));
        assert_eq!(projected.get("c"), Some("3"));
        assert_eq!(projected.get("b"), None);
        assert_eq!(projected.get("missing"), None);
        assert_eq!(projected.len(), 2);
    }

    #[test]
    fn canonical_key_is_order_independent() {
        let a = Labels::from_pairs([("a", "1"), ("b", "2")]);
        let b = Labels::from_pairs([("b", "2"), ("a", "1")]);

        assert_eq!(a.canonical_key(), b.canonical_key());
    }

    #[test]
    fn canonical_key_distinguishes_values() {
        let a = Labels::from_pairs([("a", "1")]);
        let b = Labels::from_pairs([("a", "2")]);

        assert_ne!(a.canonical_key(), b.canonical_key());
    }
}
