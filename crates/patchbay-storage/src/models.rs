// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage-local row types.
//!
//! Types crossing the dispatch seam (`EventRecord`, `ClientRecord`,
//! `EventContract`) live in `patchbay-core::types`; the audit rows below are
//! only read back by operators and tests.

use serde::{Deserialize, Serialize};

/// One inbound event notification, as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceivedEventRow {
    pub id: i64,
    pub event_id: i64,
    /// Encrypted `RequestSnapshot` JSON.
    pub request_snapshot: String,
    pub received_at: String,
}

/// Terminal record of one contract execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionDetailRow {
    pub id: i64,
    pub contract_id: i64,
    pub received_event_id: i64,
    pub state: String,
    pub created_at: String,
}

/// One attempt under an execution detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionTryRow {
    pub id: i64,
    pub detail_id: i64,
    pub state: String,
    /// Encrypted outbound request snapshot.
    pub request_snapshot: String,
    /// Encrypted outbound response or error snapshot.
    pub response_snapshot: String,
    pub created_at: String,
}
