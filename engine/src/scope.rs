// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use mal_expressions::ScopeExpression;
use mal_model::{
    EndpointEntity, InstanceEntity, MeterEntity, ProcessRelationEntity, ProcessRelationSide,
    Sample, SampleFamily, ServiceEntity, ServiceRelationEntity,
};

/// A sample that could not be bound to a `MeterEntity` because one of the
/// labels the scope needed was absent at scope time (spec §3 invariant 2:
/// "Labels used to form entity components MUST exist on the terminal
/// samples at scope time; absence is a warning-level diagnostic returned
/// in the result's error channel for that evaluation and that rule, not a
/// hard failure").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingScopeLabel {
    pub scope_kind: &'static str,
    pub missing_key: Box<str>,
}

/// Binds every sample in `family` to a `MeterEntity`, one entity per sample
/// (spec §4.2 "Scope binder"). A sample missing one of the keys the binder
/// needs is dropped from `bound` but reported in `diagnostics` rather than
/// silently vanishing.
pub fn bind(scope: &ScopeExpression, family: &SampleFamily) -> (Vec<(MeterEntity, Sample)>, Vec<MissingScopeLabel>) {
    let mut bound = Vec::new();
    let mut diagnostics = Vec::new();
    for sample in family.iter() {
        match bind_one(scope, sample) {
            Ok(entity) => bound.push((entity, sample.clone())),
            Err(diagnostic) => diagnostics.push(diagnostic),
        }
    }
    (bound, diagnostics)
}

fn bind_one(scope: &ScopeExpression, sample: &Sample) -> Result<MeterEntity, MissingScopeLabel> {
    let labels = sample.labels();
    match scope {
        ScopeExpression::Service(s) => {
            let service_name = joined("service", labels, s.service_keys())?;
            Ok(MeterEntity::Service(ServiceEntity {
                layer: s.layer().into(),
                service_name,
            }))
        }
        ScopeExpression::Instance(s) => {
            let service_name = joined("instance", labels, s.service_keys())?;
            let instance_name = joined("instance", labels, s.instance_keys())?;
            Ok(MeterEntity::Instance(InstanceEntity {
                layer: s.layer().into(),
                service_name,
                instance_name,
            }))
        }
        ScopeExpression::Endpoint(s) => {
            let service_name = joined("endpoint", labels, s.service_keys())?;
            let endpoint_name = joined("endpoint", labels, s.endpoint_keys())?;
            Ok(MeterEntity::Endpoint(EndpointEntity {
                layer: s.layer().into(),
                service_name,
                endpoint_name,
            }))
        }
        ScopeExpression::ServiceRelation(s) => {
            let source_service = joined("serviceRelation", labels, s.source_keys())?;
            let dest_service = joined("serviceRelation", labels, s.dest_keys())?;
            Ok(MeterEntity::ServiceRelation(ServiceRelationEntity {
                detect_point: s.detect_point().into(),
                source_layer: s.layer().into(),
                source_service,
                dest_layer: s.layer().into(),
                dest_service,
            }))
        }
        ScopeExpression::ProcessRelation(s) => {
            let side_value = required("processRelation", labels, s.side_key())?;
            let side = if side_value.eq_ignore_ascii_case("source") {
                ProcessRelationSide::Source
            } else {
                ProcessRelationSide::Dest
            };
            let service_name = joined("processRelation", labels, s.service_keys())?;
            let instance_name = joined("processRelation", labels, s.instance_keys())?;
            let source_process_id = required("processRelation", labels, s.source_process_key())?.into();
            let dest_process_id = required("processRelation", labels, s.dest_process_key())?.into();
            let component_id = required("processRelation", labels, s.component_key())?.into();
            Ok(MeterEntity::ProcessRelation(ProcessRelationEntity {
                service_name,
                instance_name,
                component_id,
                source_process_id,
                dest_process_id,
                side,
            }))
        }
    }
}

/// Looks up a single required label, reporting it by name if absent.
fn required<'a>(scope_kind: &'static str, labels: &'a mal_model::Labels, key: &str) -> Result<&'a str, MissingScopeLabel> {
    labels.get(key).ok_or_else(|| MissingScopeLabel { scope_kind, missing_key: key.into() })
}

/// Joins the values of every named label with `/`, the binder's name
/// materialisation for a multi-key scope (spec §4.2 binder rows all take a
/// `keys[]` tuple). The first missing key fails the whole binding.
fn joined(scope_kind: &'static str, labels: &mal_model::Labels, keys: &[Box<str>]) -> Result<Box<str>, MissingScopeLabel> {
    let mut parts = Vec::with_capacity(keys.len());
    for key in keys {
        parts.push(required(scope_kind, labels, key)?);
    }
    Ok(parts.join("/").into())
}
