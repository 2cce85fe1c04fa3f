// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the RelayStore trait.

use async_trait::async_trait;

use patchbay_config::model::StorageConfig;
use patchbay_core::PatchbayError;
use patchbay_core::traits::RelayStore;
use patchbay_core::types::{ClientRecord, EventContract, EventRecord, ExecutionState};

use crate::database::Database;
use crate::queries;

/// SQLite-backed relay store.
///
/// Wraps a [`Database`] handle and delegates every operation to the typed
/// query modules.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Open the configured database, applying migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, PatchbayError> {
        let db = Database::open(&config.database_path, config.wal_mode).await?;
        tracing::debug!(path = %config.database_path, "SQLite store opened");
        Ok(Self { db })
    }

    /// The underlying database handle, for seeding and audit read-backs.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Checkpoint and flush before shutdown.
    pub async fn close(&self) -> Result<(), PatchbayError> {
        self.db.close().await
    }
}

#[async_trait]
impl RelayStore for SqliteStore {
    async fn find_event_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<EventRecord>, PatchbayError> {
        queries::events::find_by_identifier(&self.db, identifier).await
    }

    async fn find_client_for_event(
        &self,
        event_id: i64,
    ) -> Result<Option<ClientRecord>, PatchbayError> {
        queries::clients::find_for_event(&self.db, event_id).await
    }

    async fn resolve_contracts(
        &self,
        event_id: i64,
    ) -> Result<Vec<EventContract>, PatchbayError> {
        queries::contracts::resolve_for_event(&self.db, event_id).await
    }

    async fn insert_received_event(
        &self,
        event_id: i64,
        encrypted_snapshot: &str,
    ) -> Result<i64, PatchbayError> {
        queries::audit::insert_received_event(&self.db, event_id, encrypted_snapshot).await
    }

    async fn insert_execution_detail(
        &self,
        contract_id: i64,
        received_event_id: i64,
        state: ExecutionState,
    ) -> Result<i64, PatchbayError> {
        queries::audit::insert_execution_detail(&self.db, contract_id, received_event_id, state)
            .await
    }

    async fn insert_execution_try(
        &self,
        detail_id: i64,
        state: ExecutionState,
        encrypted_request: &str,
        encrypted_response: &str,
    ) -> Result<i64, PatchbayError> {
        queries::audit::insert_execution_try(
            &self.db,
            detail_id,
            state,
            encrypted_request,
            encrypted_response,
        )
        .await
    }
}
