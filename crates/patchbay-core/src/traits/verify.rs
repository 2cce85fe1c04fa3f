// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential verification seam for the event gate.

use crate::error::PatchbayError;

/// Verifies inbound access keys against client credentials.
///
/// Two modes, matching the two ways a client can be provisioned: a stored
/// password-hashed static token, or process-secret-signed dynamic tokens.
pub trait SecretVerifier: Send + Sync {
    /// Compare an access key against a stored password hash.
    fn verify_static(&self, access_key: &str, stored_hash: &str)
        -> Result<bool, PatchbayError>;

    /// Verify a signed token's signature and expiry and return the subject
    /// client id it was issued for.
    fn verify_signed(&self, token: &str) -> Result<Option<i64>, PatchbayError>;
}
