// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All access is serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use patchbay_core::PatchbayError;

/// Handle to the relay's SQLite database.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run all
    /// pending migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, PatchbayError> {
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(PatchbayError::storage)?;

        conn.call(move |conn| -> rusqlite::Result<()> {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")?;
                conn.pragma_update(None, "synchronous", "NORMAL")?;
            }
            conn.pragma_update(None, "foreign_keys", "ON")?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(move |conn| -> Result<(), refinery::Error> {
            crate::migrations::run_migrations(conn)
        })
        .await
        .map_err(map_tr_err)?;

        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection for query modules.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL and flush pending writes.
    pub async fn close(&self) -> Result<(), PatchbayError> {
        self.conn
            .call(|conn| -> rusqlite::Result<()> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        tracing::debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Map a tokio-rusqlite error into the workspace error type.
pub fn map_tr_err<E>(e: tokio_rusqlite::Error<E>) -> PatchbayError
where
    E: std::error::Error + Send + Sync + 'static,
{
    PatchbayError::storage(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_database_and_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("open.db");
        let db = Database::open(path.to_str().unwrap(), true).await.unwrap();

        // The migration created the contracts table.
        let count: i64 = db
            .connection()
            .call(|conn| -> rusqlite::Result<i64> {
                Ok(conn.query_row("SELECT COUNT(*) FROM contracts", [], |row| row.get(0))?)
            })
            .await
            .unwrap();
        assert_eq!(count, 0);

        db.close().await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn open_twice_is_idempotent_for_migrations() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("twice.db");
        let db1 = Database::open(path.to_str().unwrap(), true).await.unwrap();
        db1.close().await.unwrap();
        drop(db1);

        // Second open must not fail re-running migrations.
        let db2 = Database::open(path.to_str().unwrap(), true).await.unwrap();
        db2.close().await.unwrap();
    }
}
