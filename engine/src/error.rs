// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Failures the engine can surface out of `evaluate()` (spec §4.7, §7.2-3).
/// Ordinary per-evaluation conditions — divide-by-zero, a retag miss, a
/// non-finite arithmetic result — are handled silently inline and never
/// reach this type; `EngineError` is reserved for conditions that abort the
/// whole evaluation of one expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("evaluation cancelled")]
    Cancelled,

    #[error("expression does not end in a scope binder and cannot be emitted")]
    NotScoped,

    #[error("evaluation panicked: {0}")]
    Panicked(String),
}
