// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

//! The retag subsystem (component C4, spec §4.4): `retagByK8sMeta` joins a
//! `SampleFamily` against a read-only Kubernetes metadata oracle. The
//! closed set of rules lives in `mal_expressions::RetagRuleKind`; this crate
//! supplies the oracle contract and the join itself.

mod oracle;
mod pod;
mod retag;
mod service;
mod static_oracle;

pub use oracle::KubernetesOracle;
pub use pod::Pod;
pub use retag::apply_retag;
pub use service::Service;
pub use static_oracle::StaticOracle;
