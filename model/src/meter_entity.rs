// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

/// A tagged union over the five observability scope kinds (spec §3). The
/// entity's identity is the tuple of its fields: two identically-constructed
/// entities collapse in downstream storage, so every variant derives
/// `PartialEq`/`Eq`/`Hash` and is freely copied (cloned) for the lifetime of
/// one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MeterEntity {
    Service(ServiceEntity),
    Instance(InstanceEntity),
    Endpoint(EndpointEntity),
    ServiceRelation(ServiceRelationEntity),
    ProcessRelation(ProcessRelationEntity),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceEntity {
    pub layer: Box<str>,
    pub service_name: Box<str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceEntity {
    pub layer: Box<str>,
    pub service_name: Box<str>,
    pub instance_name: Box<str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointEntity {
    pub layer: Box<str>,
    pub service_name: Box<str>,
    pub endpoint_name: Box<str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceRelationEntity {
    pub detect_point: Box<str>,
    pub source_layer: Box<str>,
    pub source_service: Box<str>,
    pub dest_layer: Box<str>,
    pub dest_service: Box<str>,
}

/// Which side of a process-to-process relation this sample describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessRelationSide {
    Source,
    Dest,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcessRelationEntity {
    pub service_name: Box<str>,
    pub instance_name: Box<str>,
    pub component_id: Box<str>,
    pub source_process_id: Box<str>,
    pub dest_process_id: Box<str>,
    pub side: ProcessRelationSide,
}

impl MeterEntity {
    pub fn kind(&self) -> &'static str {
        match self {
            MeterEntity::Service(_) => "Service",
            MeterEntity::Instance(_) => "Instance",
            MeterEntity::Endpoint(_) => "Endpoint",
            MeterEntity::ServiceRelation(_) => "ServiceRelation",
            MeterEntity::ProcessRelation(_) => "ProcessRelation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_entities_are_equal() {
        let a = MeterEntity::Service(ServiceEntity {
            layer: "GENERAL".into(),
            service_name: "svc".into(),
        });
        let b = MeterEntity::Service(ServiceEntity {
            layer: "GENERAL".into(),
            service_name: "svc".into(),
        });

        assert_eq!(a, b);
    }

    #[test]
    fn differing_layer_is_distinct() {
        let a = MeterEntity::Service(ServiceEntity {
            layer: "GENERAL".into(),
            service_name: "svc".into(),
        });
        let b = MeterEntity::Service(ServiceEntity {
            layer: "MESH".into(),
            service_name: "svc".into(),
        });

        assert_ne!(a, b);
    }
}
