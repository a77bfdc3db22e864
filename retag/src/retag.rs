// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use mal_expressions::RetagRuleKind;
use mal_model::{Sample, SampleFamily};

use crate::KubernetesOracle;

/// Applies one `retagByK8sMeta` rule to every sample in `family`, writing the
/// resolved value (or `""` on a miss) into `new_key` (spec §4.4). This is a
/// pure function of the family and the oracle: no sample is ever dropped
/// here, so a miss is visible to the rest of the pipeline as an empty-string
/// tag rather than an error (typically filtered out downstream with
/// `tagNotEqual(newKey, '')`).
pub fn apply_retag(
    rule: RetagRuleKind,
    new_key: &str,
    input_keys: &[Box<str>],
    family: &SampleFamily,
    oracle: &dyn KubernetesOracle,
) -> SampleFamily {
    family
        .iter()
        .map(|sample| {
            let resolved = resolve(rule, input_keys, sample, oracle);
            let mut labels = sample.labels().clone();
            labels.insert(new_key, resolved);
            Sample::new(sample.name(), labels, sample.value(), sample.timestamp_ms())
        })
        .collect()
}

fn resolve(
    rule: RetagRuleKind,
    input_keys: &[Box<str>],
    sample: &Sample,
    oracle: &dyn KubernetesOracle,
) -> Box<str> {
    let labels = sample.labels();

    match rule {
        RetagRuleKind::Pod2Service => {
            let pod = match input_keys {
                [ip_key] => labels.get(ip_key).and_then(|ip| oracle.pod_by_ip(ip)),
                [name_key, namespace_key] => labels
                    .get(name_key)
                    .zip(labels.get(namespace_key))
                    .and_then(|(name, namespace)| oracle.pod_by_name(name, namespace)),
                _ => None,
            };
            pod.and_then(|pod| pod.service_object_id)
                .and_then(|service_id| oracle.service(&service_id))
                .map(|service| service.name)
                .unwrap_or_default()
        }
        RetagRuleKind::Service2Pod => input_keys
            .first()
            .and_then(|key| labels.get(key))
            .map(|service_id| oracle.pods_for_service(service_id))
            .and_then(|mut pods| if pods.is_empty() { None } else { Some(pods.remove(0)) })
            .map(|pod| pod.name)
            .unwrap_or_default(),
        RetagRuleKind::PodIp2Service => input_keys
            .first()
            .and_then(|key| labels.get(key))
            .and_then(|ip| oracle.pod_by_ip(ip))
            .and_then(|pod| pod.service_object_id)
            .and_then(|service_id| oracle.service(&service_id))
            .map(|service| service.name)
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::static_oracle::StaticOracle;
    use crate::{Pod, Service};
    use mal_model::Labels;

    fn sample_with_ip(ip: &str) -> Sample {
        Sample::new(
            "node_pod_cpu",
            Labels::from_pairs([("pod_ip", ip)]),
            1.0,
            1000,
        )
    }

    #[test]
    fn pod2service_resolves_via_ip() {
        let oracle = StaticOracle::new()
            .with_pod(Pod::new("10.0.0.1", "web-a", "default", Some("svc-1".into())))
            .with_service(Service::new("svc-1", "web", "default"));
        let family = SampleFamily::new(vec![sample_with_ip("10.0.0.1")]);

        let retagged = apply_retag(
            RetagRuleKind::Pod2Service,
            "service",
            &["pod_ip".into()],
            &family,
            &oracle,
        );

        assert_eq!(retagged.samples()[0].labels().get("service"), Some("web"));
    }

    #[test]
    fn miss_resolves_to_empty_string() {
        let oracle = StaticOracle::new();
        let family = SampleFamily::new(vec![sample_with_ip("10.0.0.9")]);

        let retagged = apply_retag(
            RetagRuleKind::PodIp2Service,
            "service",
            &["pod_ip".into()],
            &family,
            &oracle,
        );

        assert_eq!(retagged.samples()[0].labels().get("service"), Some(""));
    }
}
