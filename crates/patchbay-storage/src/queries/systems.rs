// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System registration.

use patchbay_core::PatchbayError;
use patchbay_core::types::SystemClassification;
use rusqlite::params;

use crate::database::Database;

/// Register an integration participant. Returns the generated id.
pub async fn insert_system(
    db: &Database,
    name: &str,
    classification: SystemClassification,
    client_id: Option<i64>,
) -> Result<i64, PatchbayError> {
    let name = name.to_string();
    let classification = classification.to_string();
    db.connection()
        .call(move |conn| -> rusqlite::Result<i64> {
            conn.execute(
                "INSERT INTO systems (name, classification, client_id) VALUES (?1, ?2, ?3)",
                params![name, classification, client_id],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
