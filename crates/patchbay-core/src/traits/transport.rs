// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound HTTP seam.

use std::time::Duration;

use async_trait::async_trait;

use crate::types::{OutboundRequest, OutboundResponse, TransportFailure};

/// Issues resolved action calls.
///
/// Both transport-level failures and non-2xx responses come back as
/// [`TransportFailure`] so the orchestrator can treat every downstream
/// problem as a recorded value rather than a propagated error.
#[async_trait]
pub trait ActionTransport: Send + Sync {
    async fn send(
        &self,
        request: &OutboundRequest,
        timeout: Duration,
    ) -> Result<OutboundResponse, TransportFailure>;
}
