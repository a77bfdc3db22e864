// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::sync::Mutex;

/// Per-label-set state for a rate-family operator (spec §4.6): `Empty`
/// until a sample is observed, then `Primed` with the value and timestamp
/// needed to compute the next delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateState {
    Empty,
    Primed { value: f64, timestamp_ms: i64 },
}

impl Default for RateState {
    fn default() -> Self {
        RateState::Empty
    }
}

/// Identifies one compiled expression for the purposes of keying windowed
/// state (spec §9). Assigned by the loader when an expression is compiled;
/// the engine itself never allocates one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExpressionId(pub u64);

/// Rate-family state for every `(expression, label set)` pair an engine has
/// evaluated. One table is shared by all expressions compiled against an
/// `Engine`; state for one expression is never visible to another (spec §5
/// "No expression mutates another expression's state").
#[derive(Debug, Default)]
pub struct StateTable {
    states: Mutex<HashMap<(ExpressionId, u64), RateState>>,
}

impl StateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the current state, computes `step`'s output against it, and
    /// stores whatever state `step` returns. `step` receives the prior
    /// state and must return `(output, next_state)`; it is never called
    /// concurrently for the same `(expression, label_key)` pair because the
    /// dispatcher partitions work by expression identity (spec §5).
    pub fn advance<T>(
        &self,
        expression_id: ExpressionId,
        label_key: u64,
        step: impl FnOnce(RateState) -> (T, RateState),
    ) -> T {
        let mut states = self.states.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let previous = states.get(&(expression_id, label_key)).copied().unwrap_or_default();
        let (output, next) = step(previous);
        states.insert((expression_id, label_key), next);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_observation_primes_state() {
        let table = StateTable::new();
        let output = table.advance(ExpressionId(1), 42, |state| {
            assert_eq!(state, RateState::Empty);
            (None::<f64>, RateState::Primed { value: 10.0, timestamp_ms: 1000 })
        });
        assert_eq!(output, None);
    }

    #[test]
    fn second_observation_sees_primed_state() {
        let table = StateTable::new();
        table.advance(ExpressionId(1), 42, |_| {
            ((), RateState::Primed { value: 10.0, timestamp_ms: 1000 })
        });

        let output = table.advance(ExpressionId(1), 42, |state| {
            let delta = match state {
                RateState::Primed { value, .. } => 20.0 - value,
                RateState::Empty => panic!("expected primed state"),
            };
            (delta, RateState::Primed { value: 20.0, timestamp_ms: 2000 })
        });
        assert_eq!(output, 10.0);
    }

    #[test]
    fn distinct_label_keys_are_independent() {
        let table = StateTable::new();
        table.advance(ExpressionId(1), 1, |_| ((), RateState::Primed { value: 5.0, timestamp_ms: 0 }));
        let other = table.advance(ExpressionId(1), 2, |state| (state, RateState::Empty));
        assert_eq!(other, RateState::Empty);
    }
}
