// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

//! Compiled-metric manifests and rule-file staleness checking (component
//! C6, spec §6): resource-path-keyed property files that record what a
//! rule-loading run actually compiled, so downstream test artifacts and
//! drift checks can be verified without re-running the loader.

mod error;
mod expression_hashes;
mod manifest;
mod properties;
mod staleness;

pub use error::ManifestError;
pub use expression_hashes::ExpressionHashes;
pub use manifest::Manifest;
pub use staleness::{Drift, StalenessRecord};
