// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory [`RelayStore`] with scriptable failures.
//!
//! Rows live in plain vectors; ids are 1-based insertion indices. Failure
//! flags let tests exercise the gate's 500 path and the orchestrator's
//! audit-write swallowing without a real database.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use patchbay_core::PatchbayError;
use patchbay_core::traits::RelayStore;
use patchbay_core::types::{ClientRecord, EventContract, EventRecord, ExecutionState};

/// A recorded received-event row.
#[derive(Debug, Clone)]
pub struct ReceivedRecord {
    pub id: i64,
    pub event_id: i64,
    pub encrypted_snapshot: String,
}

/// A recorded execution-detail row.
#[derive(Debug, Clone)]
pub struct DetailRecord {
    pub id: i64,
    pub contract_id: i64,
    pub received_event_id: i64,
    pub state: ExecutionState,
}

/// A recorded execution-try row.
#[derive(Debug, Clone)]
pub struct TryRecord {
    pub id: i64,
    pub detail_id: i64,
    pub state: ExecutionState,
    pub encrypted_request: String,
    pub encrypted_response: String,
}

/// In-memory relay store.
#[derive(Default)]
pub struct MemoryStore {
    events: Mutex<Vec<EventRecord>>,
    clients: Mutex<HashMap<i64, ClientRecord>>,
    contracts: Mutex<HashMap<i64, Vec<EventContract>>>,
    received: Mutex<Vec<ReceivedRecord>>,
    details: Mutex<Vec<DetailRecord>>,
    tries: Mutex<Vec<TryRecord>>,
    fail_lookups: AtomicBool,
    fail_received_writes: AtomicBool,
    fail_detail_writes: AtomicBool,
    fail_try_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event(&self, event: EventRecord) {
        self.events.lock().expect("lock poisoned").push(event);
    }

    /// Register the client returned for lookups against `event_id`.
    pub fn set_client_for_event(&self, event_id: i64, client: ClientRecord) {
        self.clients
            .lock()
            .expect("lock poisoned")
            .insert(event_id, client);
    }

    pub fn set_contracts(&self, event_id: i64, contracts: Vec<EventContract>) {
        self.contracts
            .lock()
            .expect("lock poisoned")
            .insert(event_id, contracts);
    }

    /// Make every read operation fail with an internal storage error.
    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    pub fn fail_received_writes(&self, fail: bool) {
        self.fail_received_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_detail_writes(&self, fail: bool) {
        self.fail_detail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_try_writes(&self, fail: bool) {
        self.fail_try_writes.store(fail, Ordering::SeqCst);
    }

    pub fn received_events(&self) -> Vec<ReceivedRecord> {
        self.received.lock().expect("lock poisoned").clone()
    }

    pub fn details(&self) -> Vec<DetailRecord> {
        self.details.lock().expect("lock poisoned").clone()
    }

    pub fn tries(&self) -> Vec<TryRecord> {
        self.tries.lock().expect("lock poisoned").clone()
    }

    fn storage_error(what: &str) -> PatchbayError {
        PatchbayError::Storage {
            source: format!("scripted {what} failure").into(),
        }
    }
}

#[async_trait]
impl RelayStore for MemoryStore {
    async fn find_event_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<EventRecord>, PatchbayError> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(Self::storage_error("lookup"));
        }
        Ok(self
            .events
            .lock()
            .expect("lock poisoned")
            .iter()
            .find(|e| e.identifier == identifier && !e.deleted)
            .cloned())
    }

    async fn find_client_for_event(
        &self,
        event_id: i64,
    ) -> Result<Option<ClientRecord>, PatchbayError> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(Self::storage_error("lookup"));
        }
        Ok(self
            .clients
            .lock()
            .expect("lock poisoned")
            .get(&event_id)
            .filter(|c| !c.deleted)
            .cloned())
    }

    async fn resolve_contracts(
        &self,
        event_id: i64,
    ) -> Result<Vec<EventContract>, PatchbayError> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(Self::storage_error("lookup"));
        }
        Ok(self
            .contracts
            .lock()
            .expect("lock poisoned")
            .get(&event_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn insert_received_event(
        &self,
        event_id: i64,
        encrypted_snapshot: &str,
    ) -> Result<i64, PatchbayError> {
        if self.fail_received_writes.load(Ordering::SeqCst) {
            return Err(Self::storage_error("received-event write"));
        }
        let mut received = self.received.lock().expect("lock poisoned");
        let id = received.len() as i64 + 1;
        received.push(ReceivedRecord {
            id,
            event_id,
            encrypted_snapshot: encrypted_snapshot.to_string(),
        });
        Ok(id)
    }

    async fn insert_execution_detail(
        &self,
        contract_id: i64,
        received_event_id: i64,
        state: ExecutionState,
    ) -> Result<i64, PatchbayError> {
        if self.fail_detail_writes.load(Ordering::SeqCst) {
            return Err(Self::storage_error("detail write"));
        }
        let mut details = self.details.lock().expect("lock poisoned");
        let id = details.len() as i64 + 1;
        details.push(DetailRecord {
            id,
            contract_id,
            received_event_id,
            state,
        });
        Ok(id)
    }

    async fn insert_execution_try(
        &self,
        detail_id: i64,
        state: ExecutionState,
        encrypted_request: &str,
        encrypted_response: &str,
    ) -> Result<i64, PatchbayError> {
        if self.fail_try_writes.load(Ordering::SeqCst) {
            return Err(Self::storage_error("try write"));
        }
        let mut tries = self.tries.lock().expect("lock poisoned");
        let id = tries.len() as i64 + 1;
        tries.push(TryRecord {
            id,
            detail_id,
            state,
            encrypted_request: encrypted_request.to_string(),
            encrypted_response: encrypted_response.to_string(),
        });
        Ok(id)
    }
}
