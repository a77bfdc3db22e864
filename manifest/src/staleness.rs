// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use sha2::{Digest, Sha256};

use crate::error::ManifestError;
use crate::properties;

/// `staleness.properties` (spec §6): `yamlRelPath=sha256` of every rule
/// file tracked when a manifest was generated. A check tool compares the
/// recorded hashes against the live files and fails when drift is
/// detected, prompting test-artifact regeneration rather than silently
/// evaluating against a manifest that no longer matches the rules on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StalenessRecord {
    entries: Vec<(Box<str>, Box<str>)>,
}

/// One rule file found to have drifted from its recorded hash, or to be
/// missing from the recorded set entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Drift {
    Changed { yaml_rel_path: Box<str> },
    Untracked { yaml_rel_path: Box<str> },
}

impl StalenessRecord {
    pub fn from_files(files: &[(&str, &str)]) -> Self {
        let mut entries: Vec<(Box<str>, Box<str>)> =
            files.iter().map(|(path, text)| ((*path).into(), hash_text(text))).collect();
        entries.sort();
        Self { entries }
    }

    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        Ok(Self { entries: properties::parse(text)? })
    }

    pub fn render(&self) -> String {
        properties::render(&self.entries)
    }

    /// Compares this recorded snapshot against the live `(path, text)`
    /// pairs, returning every file whose content no longer matches, or
    /// that carries no recorded hash at all. An empty result means the
    /// manifest is still current.
    pub fn check(&self, live_files: &[(&str, &str)]) -> Vec<Drift> {
        let mut drift = Vec::new();
        for (path, text) in live_files {
            let live_hash = hash_text(text);
            match self.entries.iter().find(|(recorded_path, _)| recorded_path.as_ref() == *path) {
                Some((_, recorded_hash)) if recorded_hash.as_ref() == live_hash.as_ref() => {}
                Some(_) => drift.push(Drift::Changed { yaml_rel_path: (*path).into() }),
                None => drift.push(Drift::Untracked { yaml_rel_path: (*path).into() }),
            }
        }
        drift
    }
}

fn hash_text(text: &str) -> Box<str> {
    hex::encode(Sha256::digest(text.as_bytes())).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_drift_when_content_is_unchanged() {
        let record = StalenessRecord::from_files(&[("kong-rules.yaml", "metricPrefix: kong")]);
        assert!(record.check(&[("kong-rules.yaml", "metricPrefix: kong")]).is_empty());
    }

    #[test]
    fn reports_a_changed_file() {
        let record = StalenessRecord::from_files(&[("kong-rules.yaml", "metricPrefix: kong")]);
        let drift = record.check(&[("kong-rules.yaml", "metricPrefix: kong2")]);
        assert_eq!(drift, vec![Drift::Changed { yaml_rel_path: "kong-rules.yaml".into() }]);
    }

    #[test]
    fn reports_an_untracked_file() {
        let record = StalenessRecord::default();
        let drift = record.check(&[("new-rules.yaml", "metricPrefix: new")]);
        assert_eq!(drift, vec![Drift::Untracked { yaml_rel_path: "new-rules.yaml".into() }]);
    }
}
