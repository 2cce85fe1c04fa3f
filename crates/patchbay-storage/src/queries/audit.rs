// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only audit trail writes and read-backs.
//!
//! There are deliberately no UPDATE or DELETE statements in this module:
//! received events, execution details, and tries are immutable once written.

use patchbay_core::PatchbayError;
use patchbay_core::types::ExecutionState;
use rusqlite::params;

use crate::database::Database;
use crate::models::{ExecutionDetailRow, ExecutionTryRow, ReceivedEventRow};

/// Record one inbound event notification. Returns the generated id.
pub async fn insert_received_event(
    db: &Database,
    event_id: i64,
    encrypted_snapshot: &str,
) -> Result<i64, PatchbayError> {
    let encrypted_snapshot = encrypted_snapshot.to_string();
    db.connection()
        .call(move |conn| -> rusqlite::Result<i64> {
            conn.execute(
                "INSERT INTO received_events (event_id, request_snapshot) VALUES (?1, ?2)",
                params![event_id, encrypted_snapshot],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Record the terminal state of one contract execution. Returns the
/// generated id.
pub async fn insert_execution_detail(
    db: &Database,
    contract_id: i64,
    received_event_id: i64,
    state: ExecutionState,
) -> Result<i64, PatchbayError> {
    let state = state.to_string();
    db.connection()
        .call(move |conn| -> rusqlite::Result<i64> {
            conn.execute(
                "INSERT INTO contract_execution_details (contract_id, received_event_id, state)
                 VALUES (?1, ?2, ?3)",
                params![contract_id, received_event_id, state],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Record one attempt under an execution detail. Returns the generated id.
pub async fn insert_execution_try(
    db: &Database,
    detail_id: i64,
    state: ExecutionState,
    encrypted_request: &str,
    encrypted_response: &str,
) -> Result<i64, PatchbayError> {
    let state = state.to_string();
    let encrypted_request = encrypted_request.to_string();
    let encrypted_response = encrypted_response.to_string();
    db.connection()
        .call(move |conn| -> rusqlite::Result<i64> {
            conn.execute(
                "INSERT INTO contract_execution_tries (detail_id, state, request_snapshot, response_snapshot)
                 VALUES (?1, ?2, ?3, ?4)",
                params![detail_id, state, encrypted_request, encrypted_response],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Read back a received event.
pub async fn get_received_event(
    db: &Database,
    id: i64,
) -> Result<Option<ReceivedEventRow>, PatchbayError> {
    db.connection()
        .call(move |conn| -> rusqlite::Result<Option<ReceivedEventRow>> {
            let result = conn.query_row(
                "SELECT id, event_id, request_snapshot, received_at
                 FROM received_events WHERE id = ?1",
                params![id],
                |row| {
                    Ok(ReceivedEventRow {
                        id: row.get(0)?,
                        event_id: row.get(1)?,
                        request_snapshot: row.get(2)?,
                        received_at: row.get(3)?,
                    })
                },
            );
            match result {
                Ok(row) => Ok(Some(row)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List the execution details recorded for a received event, oldest first.
pub async fn list_details_for_received_event(
    db: &Database,
    received_event_id: i64,
) -> Result<Vec<ExecutionDetailRow>, PatchbayError> {
    db.connection()
        .call(move |conn| -> rusqlite::Result<Vec<ExecutionDetailRow>> {
            let mut stmt = conn.prepare(
                "SELECT id, contract_id, received_event_id, state, created_at
                 FROM contract_execution_details
                 WHERE received_event_id = ?1 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map(params![received_event_id], |row| {
                Ok(ExecutionDetailRow {
                    id: row.get(0)?,
                    contract_id: row.get(1)?,
                    received_event_id: row.get(2)?,
                    state: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?;
            let mut details = Vec::new();
            for row in rows {
                details.push(row?);
            }
            Ok(details)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List the tries recorded under an execution detail, oldest first.
pub async fn list_tries_for_detail(
    db: &Database,
    detail_id: i64,
) -> Result<Vec<ExecutionTryRow>, PatchbayError> {
    db.connection()
        .call(move |conn| -> rusqlite::Result<Vec<ExecutionTryRow>> {
            let mut stmt = conn.prepare(
                "SELECT id, detail_id, state, request_snapshot, response_snapshot, created_at
                 FROM contract_execution_tries
                 WHERE detail_id = ?1 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map(params![detail_id], |row| {
                Ok(ExecutionTryRow {
                    id: row.get(0)?,
                    detail_id: row.get(1)?,
                    state: row.get(2)?,
                    request_snapshot: row.get(3)?,
                    response_snapshot: row.get(4)?,
                    created_at: row.get(5)?,
                })
            })?;
            let mut tries = Vec::new();
            for row in rows {
                tries.push(row?);
            }
            Ok(tries)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
