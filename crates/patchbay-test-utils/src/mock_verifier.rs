// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plain-text [`SecretVerifier`] for gate tests.
//!
//! Static tokens compare by string equality against the "hash"; signed
//! tokens use the form `signed:<client-id>`. No real crypto -- the gate's
//! rejection ordering is what is under test.

use patchbay_core::PatchbayError;
use patchbay_core::traits::SecretVerifier;

#[derive(Debug, Default)]
pub struct MockVerifier;

impl MockVerifier {
    pub fn new() -> Self {
        Self
    }
}

impl SecretVerifier for MockVerifier {
    fn verify_static(&self, access_key: &str, stored_hash: &str) -> Result<bool, PatchbayError> {
        Ok(access_key == stored_hash)
    }

    fn verify_signed(&self, token: &str) -> Result<Option<i64>, PatchbayError> {
        Ok(token
            .strip_prefix("signed:")
            .and_then(|sub| sub.parse::<i64>().ok()))
    }
}
