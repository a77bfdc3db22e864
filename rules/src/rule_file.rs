// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;

/// One rule-file's YAML schema (spec §6). The `zabbix-rules/*` dialect
/// names the metric array `metrics` instead of `metricsRules`; loaders
/// accept either spelling via `serde(alias)`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleFile {
    pub metric_prefix: String,
    #[serde(default)]
    pub exp_prefix: Option<String>,
    #[serde(default)]
    pub exp_suffix: Option<String>,
    /// Precondition expression gating the whole file. Parsed and carried
    /// through the manifest for forward compatibility; the dispatcher does
    /// not currently evaluate it (see the project's design notes).
    #[serde(default)]
    pub filter: Option<String>,
    /// Runs once at load time. Carried through like `filter`; not executed
    /// by this loader.
    #[serde(default)]
    pub init_exp: Option<String>,
    #[serde(alias = "metrics")]
    pub metrics_rules: Vec<MetricRule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricRule {
    pub name: String,
    pub exp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_metrics_rules_dialect() {
        let yaml = r#"
metricPrefix: kong
expSuffix: sum(['le'])
metricsRules:
  - name: bandwidth
    exp: kong_bandwidth_bytes
"#;
        let file: RuleFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.metric_prefix, "kong");
        assert_eq!(file.metrics_rules.len(), 1);
    }

    #[test]
    fn parses_metrics_alias_dialect() {
        let yaml = r#"
metricPrefix: zabbix
metrics:
  - name: cpu
    exp: zabbix_cpu_usage
"#;
        let file: RuleFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.metrics_rules.len(), 1);
        assert_eq!(file.metrics_rules[0].name, "cpu");
    }
}
