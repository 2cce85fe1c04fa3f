// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client credential lookups for the event gate.

use patchbay_core::PatchbayError;
use patchbay_core::types::ClientRecord;
use rusqlite::params;

use crate::database::Database;

/// Provision a client credential. Returns the generated id.
pub async fn insert_client(
    db: &Database,
    name: &str,
    token_hash: Option<&str>,
    revoked: bool,
) -> Result<i64, PatchbayError> {
    let name = name.to_string();
    let token_hash = token_hash.map(|s| s.to_string());
    db.connection()
        .call(move |conn| -> rusqlite::Result<i64> {
            conn.execute(
                "INSERT INTO clients (name, token_hash, revoked) VALUES (?1, ?2, ?3)",
                params![name, token_hash, revoked],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Find the non-deleted client owning the system that raises the given
/// event. Returns `None` when no client is linked or the client is
/// soft-deleted.
pub async fn find_for_event(
    db: &Database,
    event_id: i64,
) -> Result<Option<ClientRecord>, PatchbayError> {
    db.connection()
        .call(move |conn| -> rusqlite::Result<Option<ClientRecord>> {
            let mut stmt = conn.prepare(
                "SELECT cl.id, cl.name, cl.token_hash, cl.revoked, cl.deleted, cl.created_at
                 FROM clients cl
                 JOIN systems sy ON sy.client_id = cl.id
                 JOIN events ev ON ev.system_id = sy.id
                 WHERE ev.id = ?1 AND cl.deleted = 0",
            )?;
            let result = stmt.query_row(params![event_id], |row| {
                Ok(ClientRecord {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    token_hash: row.get(2)?,
                    revoked: row.get(3)?,
                    deleted: row.get(4)?,
                    created_at: row.get(5)?,
                })
            });
            match result {
                Ok(client) => Ok(Some(client)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Mark a client as revoked.
pub async fn set_revoked(db: &Database, id: i64, revoked: bool) -> Result<(), PatchbayError> {
    db.connection()
        .call(move |conn| -> rusqlite::Result<()> {
            conn.execute(
                "UPDATE clients SET revoked = ?1 WHERE id = ?2",
                params![revoked, id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
