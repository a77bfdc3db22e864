// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

//! Data model for the Meter Analysis Language (MAL) evaluation core.
//!
//! This crate is the leaf of the dependency graph (component C1): `Sample`,
//! `SampleFamily`, `Labels` and `MeterEntity` carry no evaluation logic of
//! their own, only the shapes the rest of the engine operates on.

mod labels;
mod meter_entity;
mod sample;
mod sample_family;

pub use labels::Labels;
pub use meter_entity::{
    EndpointEntity, InstanceEntity, MeterEntity, ProcessRelationEntity, ProcessRelationSide,
    ServiceEntity, ServiceRelationEntity,
};
pub use sample::Sample;
pub use sample_family::SampleFamily;
