// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

/// A Kubernetes service object as known to the [`crate::KubernetesOracle`]
/// (spec §4.4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub object_id: Box<str>,
    pub name: Box<str>,
    pub namespace: Box<str>,
}

impl Service {
    pub fn new(
        object_id: impl Into<Box<str>>,
        name: impl Into<Box<str>>,
        namespace: impl Into<Box<str>>,
    ) -> Self {
        Self {
            object_id: object_id.into(),
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}
