// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Patchbay relay.
//!
//! Entity registration, dispatch-path lookups, and the append-only audit
//! trail. All access goes through tokio-rusqlite's background thread; the
//! schema is managed by embedded refinery migrations.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use adapter::SqliteStore;
pub use database::Database;
