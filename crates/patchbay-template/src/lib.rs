// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `${...}` variable-substitution language.
//!
//! Action call templates embed path expressions like `${.headers.auth}` or
//! `${.body.user-id}` that are evaluated against the inbound request
//! context. Paths are dot-separated and rooted at one of `headers`, `query`,
//! `body`, or `oauthResponse`; segments are matched literally as JSON object
//! keys, so hyphenated names need no escaping. An unmatched path evaluates
//! to JSON `null`.

pub mod resolver;

pub use resolver::{FieldKind, resolve, resolve_body, resolve_map};
