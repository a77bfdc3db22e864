// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use crate::{Expression, QueryLocation};

/// Scope-binder category of spec §4.2: the tail of an expression pipeline,
/// binding each terminal sample to a `MeterEntity` and emitting it. If the
/// scope operator has no input sample to bind to, nothing is emitted — not
/// an error (spec §3 invariant 1).
#[derive(Debug, Clone)]
pub enum ScopeExpression {
    Service(ServiceScope),
    Instance(InstanceScope),
    Endpoint(EndpointScope),
    ServiceRelation(ServiceRelationScope),
    ProcessRelation(ProcessRelationScope),
}

#[derive(Debug, Clone)]
pub struct ServiceScope {
    query_location: QueryLocation,
    service_keys: Vec<Box<str>>,
    layer: Box<str>,
}

impl ServiceScope {
    pub fn new(query_location: QueryLocation, service_keys: Vec<Box<str>>, layer: impl Into<Box<str>>) -> Self {
        Self {
            query_location,
            service_keys,
            layer: layer.into(),
        }
    }

    pub fn service_keys(&self) -> &[Box<str>] {
        &self.service_keys
    }

    pub fn layer(&self) -> &str {
        &self.layer
    }
}

#[derive(Debug, Clone)]
pub struct InstanceScope {
    query_location: QueryLocation,
    service_keys: Vec<Box<str>>,
    instance_keys: Vec<Box<str>>,
    layer: Box<str>,
}

impl InstanceScope {
    pub fn new(
        query_location: QueryLocation,
        service_keys: Vec<Box<str>>,
        instance_keys: Vec<Box<str>>,
        layer: impl Into<Box<str>>,
    ) -> Self {
        Self {
            query_location,
            service_keys,
            instance_keys,
            layer: layer.into(),
        }
    }

    pub fn service_keys(&self) -> &[Box<str>] {
        &self.service_keys
    }

    pub fn instance_keys(&self) -> &[Box<str>] {
        &self.instance_keys
    }

    pub fn layer(&self) -> &str {
        &self.layer
    }
}

#[derive(Debug, Clone)]
pub struct EndpointScope {
    query_location: QueryLocation,
    service_keys: Vec<Box<str>>,
    endpoint_keys: Vec<Box<str>>,
    layer: Box<str>,
}

impl EndpointScope {
    pub fn new(
        query_location: QueryLocation,
        service_keys: Vec<Box<str>>,
        endpoint_keys: Vec<Box<str>>,
        layer: impl Into<Box<str>>,
    ) -> Self {
        Self {
            query_location,
            service_keys,
            endpoint_keys,
            layer: layer.into(),
        }
    }

    pub fn service_keys(&self) -> &[Box<str>] {
        &self.service_keys
    }

    pub fn endpoint_keys(&self) -> &[Box<str>] {
        &self.endpoint_keys
    }

    pub fn layer(&self) -> &str {
        &self.layer
    }
}

#[derive(Debug, Clone)]
pub struct ServiceRelationScope {
    query_location: QueryLocation,
    detect_point: Box<str>,
    source_keys: Vec<Box<str>>,
    dest_keys: Vec<Box<str>>,
    layer: Box<str>,
}

impl ServiceRelationScope {
    pub fn new(
        query_location: QueryLocation,
        detect_point: impl Into<Box<str>>,
        source_keys: Vec<Box<str>>,
        dest_keys: Vec<Box<str>>,
        layer: impl Into<Box<str>>,
    ) -> Self {
        Self {
            query_location,
            detect_point: detect_point.into(),
            source_keys,
            dest_keys,
            layer: layer.into(),
        }
    }

    pub fn detect_point(&self) -> &str {
        &self.detect_point
    }

    pub fn source_keys(&self) -> &[Box<str>] {
        &self.source_keys
    }

    pub fn dest_keys(&self) -> &[Box<str>] {
        &self.dest_keys
    }

    pub fn layer(&self) -> &str {
        &self.layer
    }
}

#[derive(Debug, Clone)]
pub struct ProcessRelationScope {
    query_location: QueryLocation,
    side_key: Box<str>,
    service_keys: Vec<Box<str>>,
    instance_keys: Vec<Box<str>>,
    source_process_key: Box<str>,
    dest_process_key: Box<str>,
    component_key: Box<str>,
}

impl ProcessRelationScope {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        query_location: QueryLocation,
        side_key: impl Into<Box<str>>,
        service_keys: Vec<Box<str>>,
        instance_keys: Vec<Box<str>>,
        source_process_key: impl Into<Box<str>>,
        dest_process_key: impl Into<Box<str>>,
        component_key: impl Into<Box<str>>,
    ) -> Self {
        Self {
            query_location,
            side_key: side_key.into(),
            service_keys,
            instance_keys,
            source_process_key: source_process_key.into(),
            dest_process_key: dest_process_key.into(),
            component_key: component_key.into(),
        }
    }

    pub fn side_key(&self) -> &str {
        &self.side_key
    }

    pub fn service_keys(&self) -> &[Box<str>] {
        &self.service_keys
    }

    pub fn instance_keys(&self) -> &[Box<str>] {
        &self.instance_keys
    }

    pub fn source_process_key(&self) -> &str {
        &self.source_process_key
    }

    pub fn dest_process_key(&self) -> &str {
        &self.dest_process_key
    }

    pub fn component_key(&self) -> &str {
        &self.component_key
    }
}

impl Expression for ScopeExpression {
    fn get_query_location(&self) -> &QueryLocation {
        match self {
            ScopeExpression::Service(s) => &s.query_location,
            ScopeExpression::Instance(s) => &s.query_location,
            ScopeExpression::Endpoint(s) => &s.query_location,
            ScopeExpression::ServiceRelation(s) => &s.query_location,
            ScopeExpression::ProcessRelation(s) => &s.query_location,
        }
    }

    fn get_name(&self) -> &'static str {
        match self {
            ScopeExpression::Service(_) => "ScopeExpression(Service)",
            ScopeExpression::Instance(_) => "ScopeExpression(Instance)",
            ScopeExpression::Endpoint(_) => "ScopeExpression(Endpoint)",
            ScopeExpression::ServiceRelation(_) => "ScopeExpression(ServiceRelation)",
            ScopeExpression::ProcessRelation(_) => "ScopeExpression(ProcessRelation)",
        }
    }
}
