// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use mal_rules::Dispatcher;

use crate::error::ManifestError;
use crate::properties;

/// The `metricName=qualifiedId` mapping (spec §6 "meter-entry → compiled-
/// class" manifest): for every metric a rule set emits, which compiled
/// expression currently owns that name. Built directly from a loaded
/// [`Dispatcher`] so the manifest always reflects what was actually
/// compiled, never a hand-maintained copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<(Box<str>, Box<str>)>,
}

impl Manifest {
    pub fn from_dispatcher(dispatcher: &Dispatcher) -> Self {
        let mut entries: Vec<(Box<str>, Box<str>)> = dispatcher
            .compiled_metrics()
            .iter()
            .map(|metric| (metric.metric_name.clone(), metric.qualified_id.clone()))
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

    pub fn qualified_id(&self, metric_name: &str) -> Option<&str> {
        self.entries.iter().find(|(name, _)| name.as_ref() == metric_name).map(|(_, id)| id.as_ref())
    }

    pub fn entries(&self) -> &[(Box<str>, Box<str>)] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_properties_text() {
        let manifest = Manifest { entries: vec![("kong_bandwidth".into(), "kong_bandwidth".into())] };
        let rendered = manifest.render();
        let parsed = Manifest::parse(&rendered).unwrap();
        assert_eq!(manifest, parsed);
        assert_eq!(parsed.qualified_id("kong_bandwidth"), Some("kong_bandwidth"));
    }

    #[test]
    fn missing_metric_resolves_to_none() {
        let manifest = Manifest::default();
        assert_eq!(manifest.qualified_id("absent"), None);
    }
}
