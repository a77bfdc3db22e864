// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use mal_expressions::{TagClosure, TagRewriteExpression};
use mal_model::{Sample, SampleFamily};

/// Applies a `tag(closure)` rewrite to every sample in `family` (spec §4.2,
/// §9). Each `TagClosure` variant is one pattern from the closed family the
/// parser recognized; there is no general interpretation step here.
pub fn apply(rewrite: &TagRewriteExpression, family: &SampleFamily) -> SampleFamily {
    family
        .iter()
        .map(|sample| {
            let mut labels = sample.labels().clone();
            match rewrite.closure() {
                TagClosure::ConcatPrefix { key, prefix } => {
                    let existing = labels.get(key).unwrap_or("").to_string();
                    labels.insert(key.clone(), format!("{prefix}{existing}"));
                }
                TagClosure::ForEachRemap { keys, table } => {
                    for key in keys.iter() {
                        if let Some(current) = labels.get(key) {
                            if let Some((_, to)) = table.iter().find(|(from, _)| from.as_ref() == current) {
                                labels.insert(key.clone(), to.clone());
                            }
                        }
                    }
                }
                TagClosure::RemoveKey { key } => {
                    let _ = labels.remove(key);
                }
                TagClosure::CopyKey { from, to } => {
                    if let Some(value) = labels.get(from) {
                        labels.insert(to.clone(), value.to_string());
                    }
                }
                TagClosure::ConditionalRewrite { key, when_equals, new_value } => {
                    if labels.get(key) == Some(when_equals.as_ref()) {
                        labels.insert(key.clone(), new_value.clone());
                    }
                }
            }
            Sample::new(sample.name(), labels, sample.value(), sample.timestamp_ms())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mal_expressions::QueryLocation;
    use mal_model::Labels;

    #[test]
    fn concat_prefix_prepends_existing_value() {
        let family = SampleFamily::new(vec![Sample::new(
            "m",
            Labels::from_pairs([("cluster", "es")]),
            1.0,
            0,
        )]);
        let rewrite = TagRewriteExpression::new(
            QueryLocation::new_fake(),
            TagClosure::ConcatPrefix { key: "cluster".into(), prefix: "elasticsearch::".into() },
        );

        let out = apply(&rewrite, &family);
        assert_eq!(out.samples()[0].labels().get("cluster"), Some("elasticsearch::es"));
    }

    #[test]
    fn remove_key_drops_label() {
        let family = SampleFamily::new(vec![Sample::new(
            "m",
            Labels::from_pairs([("service", "x")]),
            1.0,
            0,
        )]);
        let rewrite = TagRewriteExpression::new(
            QueryLocation::new_fake(),
            TagClosure::RemoveKey { key: "service".into() },
        );

        let out = apply(&rewrite, &family);
        assert!(out.samples()[0].labels().get("service").is_none());
    }
}
