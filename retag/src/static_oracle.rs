// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use crate::{KubernetesOracle, Pod, Service};

/// A fixed-table oracle for tests: the engine's contract requires the real
/// oracle to be injectable (spec §4.4 "The oracle is behind an interface so
/// that tests can inject a deterministic implementation").
#[derive(Debug, Default, Clone)]
pub struct StaticOracle {
    pods_by_ip: HashMap<Box<str>, Pod>,
    pods_by_name: HashMap<(Box<str>, Box<str>), Pod>,
    services: HashMap<Box<str>, Service>,
    pods_by_service: HashMap<Box<str>, Vec<Pod>>,
}

impl StaticOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pod(mut self, pod: Pod) -> Self {
        if let Some(service_id) = &pod.service_object_id {
            self.pods_by_service
                .entry(service_id.clone())
                .or_default()
                .push(pod.clone());
        }
        self.pods_by_name
            .insert((pod.name.clone(), pod.namespace.clone()), pod.clone());
        self.pods_by_ip.insert(pod.ip.clone(), pod);
        self
    }

    pub fn with_service(mut self, service: Service) -> Self {
        self.services.insert(service.object_id.clone(), service);
        self
    }
}

impl KubernetesOracle for StaticOracle {
    fn pod_by_ip(&self, ip: &str) -> Option<Pod> {
        self.pods_by_ip.get(ip).cloned()
    }

    fn pod_by_name(&self, name: &str, namespace: &str) -> Option<Pod> {
        self.pods_by_name.get(&(name.into(), namespace.into())).cloned()
    }

    fn service(&self, object_id: &str) -> Option<Service> {
        self.services.get(object_id).cloned()
    }

    fn pods_for_service(&self, object_id: &str) -> Vec<Pod> {
        let mut pods = self.pods_by_service.get(object_id).cloned().unwrap_or_default();
        pods.sort_by(|a, b| a.name.cmp(&b.name));
        pods
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_pod_by_ip_then_service() {
        let oracle = StaticOracle::new()
            .with_pod(Pod::new("10.0.0.1", "web-abc", "default", Some("svc-1".into())))
            .with_service(Service::new("svc-1", "web", "default"));

        let pod = oracle.pod_by_ip("10.0.0.1").unwrap();
        let service = oracle.service(pod.service_object_id.as_ref().unwrap()).unwrap();
        assert_eq!(&*service.name, "web");
    }

    #[test]
    fn pods_for_service_are_sorted() {
        let oracle = StaticOracle::new()
            .with_pod(Pod::new("10.0.0.2", "web-b", "default", Some("svc-1".into())))
            .with_pod(Pod::new("10.0.0.1", "web-a", "default", Some("svc-1".into())));

        let pods = oracle.pods_for_service("svc-1");
        assert_eq!(pods[0].name.as_ref(), "web-a");
    }
}
