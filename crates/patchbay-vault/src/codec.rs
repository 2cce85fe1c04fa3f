// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The at-rest string codec.
//!
//! Encrypted columns are stored as `<nonceHex>|.|<cipherHex>`: a 24-hex-char
//! GCM nonce, the literal separator `|.|`, then the hex ciphertext with its
//! authentication tag. Decryption failures are fatal to the calling
//! operation -- a row whose ciphertext cannot be opened is unusable.

use patchbay_config::model::CryptoConfig;
use patchbay_core::PatchbayError;
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

use crate::crypto;
use crate::kdf;

/// Separator between the nonce and ciphertext segments of a stored string.
const SEPARATOR: &str = "|.|";

/// Symmetric codec over the process-wide key.
///
/// The key is derived exactly once at startup and held only in memory.
pub struct Codec {
    key: Zeroizing<[u8; 32]>,
}

impl std::fmt::Debug for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Codec").field("key", &"[REDACTED]").finish()
    }
}

impl Codec {
    /// Derive the codec key from configuration.
    ///
    /// Errors if no passphrase is configured or the salt is malformed.
    pub fn from_config(config: &CryptoConfig) -> Result<Self, PatchbayError> {
        let passphrase: SecretString = config
            .passphrase
            .clone()
            .ok_or_else(|| {
                PatchbayError::Config("crypto.passphrase must be set to derive the codec key".to_string())
            })?
            .into();
        let salt = kdf::parse_salt(&config.kdf_salt)?;
        let key = kdf::derive_key(
            passphrase.expose_secret().as_bytes(),
            &salt,
            config.kdf_memory_cost,
            config.kdf_iterations,
            config.kdf_parallelism,
        )?;
        Ok(Self { key })
    }

    /// Build a codec around an existing raw key. Intended for tests and
    /// fixtures that do not want to pay for key derivation.
    pub fn from_key(key: [u8; 32]) -> Self {
        Self {
            key: Zeroizing::new(key),
        }
    }

    /// Encrypt a plaintext string into the stored `<nonceHex>|.|<cipherHex>`
    /// shape, using a fresh random nonce.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, PatchbayError> {
        let (ciphertext, nonce) = crypto::seal(&self.key, plaintext.as_bytes())?;
        Ok(format!(
            "{}{SEPARATOR}{}",
            hex::encode(nonce),
            hex::encode(ciphertext)
        ))
    }

    /// Decrypt a stored string back to its plaintext.
    pub fn decrypt(&self, stored: &str) -> Result<String, PatchbayError> {
        let (nonce_hex, cipher_hex) = stored.split_once(SEPARATOR).ok_or_else(|| {
            PatchbayError::Crypto(format!("stored ciphertext missing `{SEPARATOR}` separator"))
        })?;

        let nonce_bytes = hex::decode(nonce_hex)
            .map_err(|e| PatchbayError::Crypto(format!("stored nonce is not valid hex: {e}")))?;
        let nonce: [u8; 12] = nonce_bytes.try_into().map_err(|_| {
            PatchbayError::Crypto("stored nonce must decode to exactly 12 bytes".to_string())
        })?;

        let ciphertext = hex::decode(cipher_hex).map_err(|e| {
            PatchbayError::Crypto(format!("stored ciphertext is not valid hex: {e}"))
        })?;

        let plaintext = crypto::open(&self.key, &nonce, &ciphertext)?;
        String::from_utf8(plaintext).map_err(|_| {
            PatchbayError::Crypto("decrypted payload is not valid UTF-8".to_string())
        })
    }
}
