// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`NotificationSink`] that records every outcome it receives.

use std::sync::Mutex;

use async_trait::async_trait;

use patchbay_core::traits::NotificationSink;
use patchbay_core::types::ContractOutcome;

#[derive(Default)]
pub struct RecordingSink {
    outcomes: Mutex<Vec<ContractOutcome>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outcomes in the order they were forwarded.
    pub fn outcomes(&self) -> Vec<ContractOutcome> {
        self.outcomes.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn on_result(&self, outcome: &ContractOutcome) {
        self.outcomes
            .lock()
            .expect("lock poisoned")
            .push(outcome.clone());
    }
}
