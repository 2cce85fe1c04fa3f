// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Action and action-security registration.

use patchbay_core::PatchbayError;
use patchbay_core::types::{OperationKind, SecurityType};
use rusqlite::params;

use crate::database::Database;

/// Register an outbound action. `call_template` must already be encrypted.
/// Returns the generated id.
pub async fn insert_action(
    db: &Database,
    system_id: i64,
    name: &str,
    call_template: &str,
    operation: OperationKind,
) -> Result<i64, PatchbayError> {
    let name = name.to_string();
    let call_template = call_template.to_string();
    let operation = operation.to_string();
    db.connection()
        .call(move |conn| -> rusqlite::Result<i64> {
            conn.execute(
                "INSERT INTO actions (system_id, name, call_template, operation)
                 VALUES (?1, ?2, ?3, ?4)",
                params![system_id, name, call_template, operation],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Attach the security row for an action. Every action has exactly one;
/// `token_template` must already be encrypted when present. Returns the
/// generated id.
pub async fn insert_action_security(
    db: &Database,
    action_id: i64,
    security_type: SecurityType,
    token_template: Option<&str>,
) -> Result<i64, PatchbayError> {
    let security_type = security_type.to_string();
    let token_template = token_template.map(|s| s.to_string());
    db.connection()
        .call(move |conn| -> rusqlite::Result<i64> {
            conn.execute(
                "INSERT INTO action_securities (action_id, security_type, token_template)
                 VALUES (?1, ?2, ?3)",
                params![action_id, security_type, token_template],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
