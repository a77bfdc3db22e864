// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use crate::{Expression, QueryLocation};

/// Windowed category of spec §4.2, §4.6. `window` is parsed from an
/// ISO-8601-shaped duration literal (e.g. `'PT1M'`) but is a multiplier, not
/// a sliding-window boundary (spec §9 Open Question, preserved by design):
/// `.rate('PT1M')` always multiplies by the window's seconds regardless of
/// how much wall-clock time actually elapsed between the two observed
/// samples.
#[derive(Debug, Clone)]
pub enum WindowedExpression {
    Rate(WindowedOperation),
    Increase(WindowedOperation),
    /// `.irate()` — no window argument; the formula implicitly multiplies
    /// by 1000ms (i.e. reports per-second).
    Irate(QueryLocation),
    Downsampling(DownsamplingExpression),
}

#[derive(Debug, Clone)]
pub struct WindowedOperation {
    query_location: QueryLocation,
    /// The window duration in seconds, already resolved from its ISO-8601
    /// literal at parse time.
    window_seconds: f64,
}

impl WindowedOperation {
    pub fn new(query_location: QueryLocation, window_seconds: f64) -> Self {
        Self {
            query_location,
            window_seconds,
        }
    }

    pub fn window_seconds(&self) -> f64 {
        self.window_seconds
    }
}

/// `.downsampling(MIN | MAX | SUM | LATEST)` — a hint carried on the result
/// but never changing the evaluator's numeric output (spec §4.2, §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownsamplingHint {
    Min,
    Max,
    Sum,
    Latest,
}

impl DownsamplingHint {
    pub fn parse(name: &str) -> Option<DownsamplingHint> {
        match name {
            "MIN" => Some(DownsamplingHint::Min),
            "MAX" => Some(DownsamplingHint::Max),
            "SUM" => Some(DownsamplingHint::Sum),
            "LATEST" => Some(DownsamplingHint::Latest),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DownsamplingExpression {
    query_location: QueryLocation,
    hint: DownsamplingHint,
}

impl DownsamplingExpression {
    pub fn new(query_location: QueryLocation, hint: DownsamplingHint) -> Self {
        Self {
            query_location,
            hint,
        }
    }

    pub fn hint(&self) -> DownsamplingHint {
        self.hint
    }
}

impl Expression for WindowedExpression {
    fn get_query_location(&self) -> &QueryLocation {
        match self {
            WindowedExpression::Rate(op) | WindowedExpression::Increase(op) => &op.query_location,
            WindowedExpression::Irate(loc) => loc,
            WindowedExpression::Downsampling(d) => &d.query_location,
        }
    }

    fn get_name(&self) -> &'static str {
        match self {
            WindowedExpression::Rate(_) => "WindowedExpression(Rate)",
            WindowedExpression::Increase(_) => "WindowedExpression(Increase)",
            WindowedExpression::Irate(_) => "WindowedExpression(Irate)",
            WindowedExpression::Downsampling(_) => "WindowedExpression(Downsampling)",
        }
    }
}
