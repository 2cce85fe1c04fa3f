// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal-outcome notification seam.

use async_trait::async_trait;

use crate::types::ContractOutcome;

/// Receives each per-contract outcome after a dispatch run completes.
///
/// Implementations must neither block the dispatch pipeline nor mutate the
/// outcome; anything that goes wrong inside the sink is logged and dropped.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn on_result(&self, outcome: &ContractOutcome);
}
