// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cooperative cancellation flag shared across the expressions evaluated
/// within one scrape cycle (spec §5 "Cancellation"). Checked at the start of
/// an expression's evaluation and at each windowed-operator step; an
/// in-flight evaluation that observes cancellation returns
/// `EngineError::Cancelled` without updating rate state.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
