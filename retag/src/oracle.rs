// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use crate::{Pod, Service};

/// The read-only metadata lookup `retagByK8sMeta` joins against (spec §4.4).
/// The engine never calls the network itself: an implementation owns its own
/// cache and refresh discipline, and every method here MUST be non-blocking
/// (spec §5 "Suspension").
pub trait KubernetesOracle: Send + Sync {
    fn pod_by_ip(&self, ip: &str) -> Option<Pod>;
    fn pod_by_name(&self, name: &str, namespace: &str) -> Option<Pod>;
    fn service(&self, object_id: &str) -> Option<Service>;
    /// Pods fronted by a service, in a deterministic order (spec's
    /// `Service2Pod` rule picks the first entry).
    fn pods_for_service(&self, object_id: &str) -> Vec<Pod>;
}
