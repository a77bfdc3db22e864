// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

/// A Kubernetes pod as known to the [`crate::KubernetesOracle`] (spec §4.4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pod {
    pub ip: Box<str>,
    pub name: Box<str>,
    pub namespace: Box<str>,
    /// The service object id fronting this pod, if the oracle has resolved
    /// one. `None` here is distinct from "pod not found" — the lookup
    /// succeeded but this pod is unfronted.
    pub service_object_id: Option<Box<str>>,
}

impl Pod {
    pub fn new(
        ip: impl Into<Box<str>>,
        name: impl Into<Box<str>>,
        namespace: impl Into<Box<str>>,
        service_object_id: Option<Box<str>>,
    ) -> Self {
        Self {
            ip: ip.into(),
            name: name.into(),
            namespace: namespace.into(),
            service_object_id,
        }
    }
}
