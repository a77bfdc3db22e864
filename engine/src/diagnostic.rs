// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

/// How loudly the engine reports a per-expression failure (spec §7
/// "Propagation": "the dispatcher logs at a configurable level and
/// continues"). Mirrors the `tracing` level the dispatcher emits at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl Default for DiagnosticLevel {
    fn default() -> Self {
        DiagnosticLevel::Warn
    }
}
