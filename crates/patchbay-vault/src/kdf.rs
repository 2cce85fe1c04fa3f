// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id key derivation from the configured passphrase.
//!
//! Unlike a login-style KDF, the salt here is a fixed configured value: the
//! derived key must be identical across process restarts so previously
//! stored ciphertext stays readable.

use patchbay_core::PatchbayError;
use zeroize::Zeroizing;

/// Derive a 32-byte key from a passphrase using Argon2id.
///
/// The returned key is wrapped in [`Zeroizing`] for automatic memory zeroing
/// on drop.
pub fn derive_key(
    passphrase: &[u8],
    salt: &[u8; 16],
    memory_cost: u32,
    iterations: u32,
    parallelism: u32,
) -> Result<Zeroizing<[u8; 32]>, PatchbayError> {
    let params = argon2::Params::new(memory_cost, iterations, parallelism, Some(32))
        .map_err(|e| PatchbayError::Crypto(format!("invalid Argon2id parameters: {e}")))?;

    let argon2 = argon2::Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let mut output = Zeroizing::new([0u8; 32]);
    argon2
        .hash_password_into(passphrase, salt, output.as_mut())
        .map_err(|e| PatchbayError::Crypto(format!("Argon2id key derivation failed: {e}")))?;

    Ok(output)
}

/// Parse a configured 32-hex-char salt string into its 16 raw bytes.
pub fn parse_salt(salt_hex: &str) -> Result<[u8; 16], PatchbayError> {
    let bytes = hex::decode(salt_hex.trim())
        .map_err(|e| PatchbayError::Crypto(format!("crypto.kdf_salt is not valid hex: {e}")))?;
    bytes.try_into().map_err(|_| {
        PatchbayError::Crypto("crypto.kdf_salt must decode to exactly 16 bytes".to_string())
    })
}
