// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential verification for the Patchbay event gate.

pub mod verifier;

pub use verifier::{AccessClaims, RelayVerifier};
