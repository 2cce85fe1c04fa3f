// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage interface for the dispatch path.
//!
//! Only the lookups and audit writes the dispatch engine needs live here;
//! admin CRUD stays behind the concrete storage crate.

use async_trait::async_trait;

use crate::error::PatchbayError;
use crate::types::{ClientRecord, EventContract, EventRecord, ExecutionState};

/// Relational store consumed by the gate, resolver, and orchestrator.
#[async_trait]
pub trait RelayStore: Send + Sync {
    /// Look up a non-deleted event by its unique identifier.
    async fn find_event_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<EventRecord>, PatchbayError>;

    /// Find the non-deleted client credential owning the event's system.
    async fn find_client_for_event(
        &self,
        event_id: i64,
    ) -> Result<Option<ClientRecord>, PatchbayError>;

    /// Resolve the active, non-deleted contracts bound to an event, joined
    /// with action and action-security rows, ordered by execution tier
    /// ascending.
    async fn resolve_contracts(&self, event_id: i64)
        -> Result<Vec<EventContract>, PatchbayError>;

    /// Record one inbound event notification. Returns the generated row id.
    async fn insert_received_event(
        &self,
        event_id: i64,
        encrypted_snapshot: &str,
    ) -> Result<i64, PatchbayError>;

    /// Record the terminal state of one contract execution. Returns the
    /// generated row id.
    async fn insert_execution_detail(
        &self,
        contract_id: i64,
        received_event_id: i64,
        state: ExecutionState,
    ) -> Result<i64, PatchbayError>;

    /// Record one attempt under an execution detail, with encrypted outbound
    /// request and response/error snapshots.
    async fn insert_execution_try(
        &self,
        detail_id: i64,
        state: ExecutionState,
        encrypted_request: &str,
        encrypted_response: &str,
    ) -> Result<i64, PatchbayError>;
}
