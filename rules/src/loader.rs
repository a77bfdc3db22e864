// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use mal_engine::ExpressionId;
use sha2::{Digest, Sha256};

use crate::compiled::CompiledMetric;
use crate::compose::compose;
use crate::dispatcher::Dispatcher;
use crate::error::RuleLoadError;
use crate::rule_file::RuleFile;

/// One rule file as read from disk, before parsing.
pub struct RawRuleFile {
    pub path: Box<str>,
    pub yaml_text: String,
}

impl RawRuleFile {
    pub fn new(path: impl Into<Box<str>>, yaml_text: impl Into<String>) -> Self {
        Self { path: path.into(), yaml_text: yaml_text.into() }
    }
}

/// Loads a set of rule files into a ready-to-evaluate [`Dispatcher`] (spec
/// §4.5). Files are processed in the order given; that order is also the
/// deterministic tie-break order the combination pattern uses to assign
/// `_1, _2, ...` suffixes to metrics with the same emitted name.
pub fn load(files: &[RawRuleFile]) -> Result<Dispatcher, RuleLoadError> {
    let mut by_metric_name: HashMap<Box<str>, Vec<CompiledMetric>> = HashMap::new();
    let mut next_id = 0u64;

    for file in files {
        let parsed: RuleFile = serde_yaml::from_str(&file.yaml_text)
            .map_err(|source| RuleLoadError::InvalidYaml { path: file.path.clone(), source })?;

        for rule in &parsed.metrics_rules {
            let composed = compose(&rule.exp, parsed.exp_prefix.as_deref(), parsed.exp_suffix.as_deref());
            let expression = mal_parser::parse(&composed).map_err(|source| RuleLoadError::ExpressionParse {
                path: file.path.clone(),
                metric_name: rule.name.as_str().into(),
                source,
            })?;

            let metric_name: Box<str> = format!("{}_{}", parsed.metric_prefix, rule.name).into();
            let expression_hash = sha256_hex(&composed);
            let expression_id = ExpressionId(next_id);
            next_id += 1;

            by_metric_name.entry(metric_name.clone()).or_default().push(CompiledMetric {
                qualified_id: metric_name.clone(),
                metric_name,
                expression,
                expression_hash: expression_hash.into(),
                expression_id,
                source_path: file.path.clone(),
            });
        }
    }

    Ok(Dispatcher::new(assign_combination_suffixes(by_metric_name)))
}

/// The combination pattern (spec §4.5): a metric name defined by more than
/// one rule file gets its `qualified_id` suffixed `_1, _2, ...` in file
/// processing order; a metric defined by exactly one file keeps its bare
/// name.
fn assign_combination_suffixes(by_metric_name: HashMap<Box<str>, Vec<CompiledMetric>>) -> Vec<CompiledMetric> {
    let mut out = Vec::new();
    for (metric_name, group) in by_metric_name {
        if group.len() == 1 {
            out.extend(group);
        } else {
            for (index, mut metric) in group.into_iter().enumerate() {
                metric.qualified_id = format!("{metric_name}_{}", index + 1).into();
                out.push(metric);
            }
        }
    }
    out.sort_by(|a, b| a.expression_id.cmp(&b.expression_id));
    out
}

fn sha256_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_a_single_metric_rule() {
        let files = vec![RawRuleFile::new(
            "process-rules.yaml",
            r#"
metricPrefix: meter
metricsRules:
  - name: cpu
    exp: process_cpu_usage.service(['service'],'GENERAL')
"#,
        )];

        let dispatcher = load(&files).unwrap();
        assert_eq!(dispatcher.compiled_metrics().len(), 1);
        assert_eq!(&*dispatcher.compiled_metrics()[0].qualified_id, "meter_cpu");
    }

    #[test]
    fn duplicate_metric_names_get_combination_suffixes() {
        let files = vec![
            RawRuleFile::new(
                "a.yaml",
                r#"
metricPrefix: meter
metricsRules:
  - name: cpu
    exp: process_cpu_usage.service(['service'],'GENERAL')
"#,
            ),
            RawRuleFile::new(
                "b.yaml",
                r#"
metricPrefix: meter
metricsRules:
  - name: cpu
    exp: other_cpu_usage.service(['service'],'GENERAL')
"#,
            ),
        ];

        let dispatcher = load(&files).unwrap();
        let mut ids: Vec<&str> = dispatcher.compiled_metrics().iter().map(|m| &*m.qualified_id).collect();
        ids.sort();
        assert_eq!(ids, vec!["meter_cpu_1", "meter_cpu_2"]);
    }

    #[test]
    fn malformed_yaml_fails_fast() {
        let files = vec![RawRuleFile::new("bad.yaml", "not: [valid")];
        assert!(load(&files).is_err());
    }

    #[test]
    fn unparseable_expression_fails_fast() {
        let files = vec![RawRuleFile::new(
            "bad.yaml",
            r#"
metricPrefix: meter
metricsRules:
  - name: cpu
    exp: process_cpu_usage.bogusStep()
"#,
        )];
        assert!(load(&files).is_err());
    }
}
