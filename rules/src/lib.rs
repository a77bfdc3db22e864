// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

//! The rule loader & dispatcher (component C5, spec §4.5, §6): reads rule
//! files, composes each metric's full expression text from `expPrefix` /
//! `expSuffix`, parses it with `mal_parser`, and resolves the combination
//! pattern when more than one file emits the same metric name. The
//! resulting [`Dispatcher`] indexes compiled metrics by source sample name
//! for `mal_engine` to evaluate.

mod batch;
mod compiled;
mod compose;
mod dispatcher;
mod error;
mod loader;
mod rule_file;

pub use batch::{evaluate_all, MetricOutcome};
pub use compiled::CompiledMetric;
pub use compose::compose;
pub use dispatcher::Dispatcher;
pub use error::RuleLoadError;
pub use loader::{load, RawRuleFile};
pub use rule_file::{MetricRule, RuleFile};
