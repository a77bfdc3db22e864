// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

//! The evaluation core (component C3, spec §4.3, §4.6, §4.7, §5): walks a
//! compiled [`mal_expressions::MalExpression`] tree against one scrape's
//! input map, applying arithmetic broadcast joins, windowed state machines,
//! and the scope-binding step that turns a `SampleFamily` into emitted,
//! entity-bound metrics. Rule loading and metric naming belong to
//! `mal_rules`; this crate only evaluates.

mod aggregate;
mod broadcast;
mod cancellation;
mod diagnostic;
mod engine;
mod error;
mod evaluator;
mod filter;
mod histogram;
mod rate_state;
mod rewrite;
mod scope;
mod windowed;

pub use cancellation::CancellationToken;
pub use diagnostic::DiagnosticLevel;
pub use engine::{EmittedMetric, Engine, EngineOptions};
pub use error::EngineError;
pub use rate_state::ExpressionId;
