// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event registration and gate lookups.

use patchbay_core::PatchbayError;
use patchbay_core::types::{EventRecord, OperationKind};
use rusqlite::params;

use crate::database::Database;

/// Register an event a producer system can raise. Returns the generated id.
pub async fn insert_event(
    db: &Database,
    system_id: i64,
    identifier: &str,
    name: &str,
    operation: OperationKind,
    description: Option<&str>,
) -> Result<i64, PatchbayError> {
    let identifier = identifier.to_string();
    let name = name.to_string();
    let operation = operation.to_string();
    let description = description.map(|s| s.to_string());
    db.connection()
        .call(move |conn| -> rusqlite::Result<i64> {
            conn.execute(
                "INSERT INTO events (system_id, identifier, name, operation, description)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![system_id, identifier, name, operation, description],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Look up a non-deleted event by its unique identifier.
pub async fn find_by_identifier(
    db: &Database,
    identifier: &str,
) -> Result<Option<EventRecord>, PatchbayError> {
    let identifier = identifier.to_string();
    db.connection()
        .call(move |conn| -> rusqlite::Result<Option<EventRecord>> {
            let mut stmt = conn.prepare(
                "SELECT id, system_id, identifier, name, operation, description, deleted, created_at
                 FROM events WHERE identifier = ?1 AND deleted = 0",
            )?;
            let result = stmt.query_row(params![identifier], map_event_row);
            match result {
                Ok(event) => Ok(Some(event)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Soft-delete an event; the gate stops resolving it immediately.
pub async fn soft_delete(db: &Database, id: i64) -> Result<(), PatchbayError> {
    db.connection()
        .call(move |conn| -> rusqlite::Result<()> {
            conn.execute("UPDATE events SET deleted = 1 WHERE id = ?1", params![id])?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

fn map_event_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EventRecord> {
    let operation: String = row.get(4)?;
    let operation = operation.parse::<OperationKind>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(EventRecord {
        id: row.get(0)?,
        system_id: row.get(1)?,
        identifier: row.get(2)?,
        name: row.get(3)?,
        operation,
        description: row.get(5)?,
        deleted: row.get(6)?,
        created_at: row.get(7)?,
    })
}
