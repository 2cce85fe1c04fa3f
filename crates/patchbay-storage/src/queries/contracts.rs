// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contract registration and dispatch-eligible resolution.

use patchbay_core::PatchbayError;
use patchbay_core::types::{EventContract, SecurityType};
use rusqlite::params;

use crate::database::Database;

/// Bind an event to an action at an execution tier. Returns the generated id.
pub async fn insert_contract(
    db: &Database,
    name: &str,
    event_id: i64,
    action_id: i64,
    exec_order: i64,
    active: bool,
) -> Result<i64, PatchbayError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| -> rusqlite::Result<i64> {
            conn.execute(
                "INSERT INTO contracts (name, event_id, action_id, exec_order, active)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![name, event_id, action_id, exec_order, active],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Resolve the dispatch-eligible contracts for an event: active, not
/// soft-deleted, with a live event and action, joined with their action and
/// action-security rows, in ascending tier order.
pub async fn resolve_for_event(
    db: &Database,
    event_id: i64,
) -> Result<Vec<EventContract>, PatchbayError> {
    db.connection()
        .call(move |conn| -> rusqlite::Result<Vec<EventContract>> {
            let mut stmt = conn.prepare(
                "SELECT co.id, co.name, co.exec_order,
                        ev.id, ev.identifier,
                        ac.id, ac.name, ac.call_template,
                        se.security_type, se.token_template
                 FROM contracts co
                 JOIN events ev ON ev.id = co.event_id
                 JOIN actions ac ON ac.id = co.action_id
                 JOIN action_securities se ON se.action_id = ac.id
                 WHERE co.event_id = ?1
                   AND co.active = 1 AND co.deleted = 0
                   AND ev.deleted = 0 AND ac.deleted = 0
                 ORDER BY co.exec_order ASC, co.id ASC",
            )?;
            let rows = stmt.query_map(params![event_id], |row| {
                let security_type: String = row.get(8)?;
                let security_type = security_type.parse::<SecurityType>().map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        8,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
                Ok(EventContract {
                    contract_id: row.get(0)?,
                    contract_name: row.get(1)?,
                    exec_order: row.get(2)?,
                    event_id: row.get(3)?,
                    event_identifier: row.get(4)?,
                    action_id: row.get(5)?,
                    action_name: row.get(6)?,
                    call_template: row.get(7)?,
                    security_type,
                    token_template: row.get(9)?,
                })
            })?;

            let mut contracts = Vec::new();
            for row in rows {
                contracts.push(row?);
            }
            Ok(contracts)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Toggle a contract's active flag.
pub async fn set_active(db: &Database, id: i64, active: bool) -> Result<(), PatchbayError> {
    db.connection()
        .call(move |conn| -> rusqlite::Result<()> {
            conn.execute(
                "UPDATE contracts SET active = ?1 WHERE id = ?2",
                params![active, id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Soft-delete a contract.
pub async fn soft_delete(db: &Database, id: i64) -> Result<(), PatchbayError> {
    db.connection()
        .call(move |conn| -> rusqlite::Result<()> {
            conn.execute("UPDATE contracts SET deleted = 1 WHERE id = ?1", params![id])?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
