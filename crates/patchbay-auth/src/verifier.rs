// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The two credential checks behind the event gate.
//!
//! A client is provisioned either with a password-hashed static token
//! (compared with Argon2) or relies on HS256-signed access tokens verified
//! against the process-wide secret.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use patchbay_core::PatchbayError;
use patchbay_core::traits::SecretVerifier;

/// Claims carried by a signed access token.
///
/// `sub` holds the client id the token was issued for; `exp` is a unix
/// timestamp checked during verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub exp: i64,
}

/// Production [`SecretVerifier`] over Argon2 and HS256.
pub struct RelayVerifier {
    decoding_key: DecodingKey,
}

impl RelayVerifier {
    /// Build a verifier from the process-wide token secret.
    pub fn new(token_secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(token_secret.as_bytes()),
        }
    }
}

impl SecretVerifier for RelayVerifier {
    fn verify_static(&self, access_key: &str, stored_hash: &str) -> Result<bool, PatchbayError> {
        let parsed = PasswordHash::new(stored_hash).map_err(|e| {
            PatchbayError::Internal(format!("stored client token hash is malformed: {e}"))
        })?;
        Ok(Argon2::default()
            .verify_password(access_key.as_bytes(), &parsed)
            .is_ok())
    }

    fn verify_signed(&self, token: &str) -> Result<Option<i64>, PatchbayError> {
        let validation = Validation::new(Algorithm::HS256);
        match decode::<AccessClaims>(token, &self.decoding_key, &validation) {
            // A subject that is not a numeric client id is as invalid as a
            // bad signature.
            Ok(data) => Ok(data.claims.sub.parse::<i64>().ok()),
            Err(_) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::{PasswordHasher, SaltString, rand_core::OsRng};
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "test-process-secret";

    fn hash_of(token: &str) -> String {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(token.as_bytes(), &salt)
            .unwrap()
            .to_string()
    }

    fn signed_token(secret: &str, sub: &str, exp_offset_secs: i64) -> String {
        let claims = AccessClaims {
            sub: sub.to_string(),
            exp: chrono::Utc::now().timestamp() + exp_offset_secs,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn static_token_matches_its_hash() {
        let verifier = RelayVerifier::new(SECRET);
        let hash = hash_of("correct-token");

        assert!(verifier.verify_static("correct-token", &hash).unwrap());
        assert!(!verifier.verify_static("wrong-token", &hash).unwrap());
    }

    #[test]
    fn malformed_stored_hash_is_an_internal_error() {
        let verifier = RelayVerifier::new(SECRET);
        assert!(verifier.verify_static("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn valid_signed_token_yields_subject_id() {
        let verifier = RelayVerifier::new(SECRET);
        let token = signed_token(SECRET, "42", 3600);
        assert_eq!(verifier.verify_signed(&token).unwrap(), Some(42));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let verifier = RelayVerifier::new(SECRET);
        let token = signed_token("some-other-secret", "42", 3600);
        assert_eq!(verifier.verify_signed(&token).unwrap(), None);
    }

    #[test]
    fn expired_token_is_rejected() {
        let verifier = RelayVerifier::new(SECRET);
        let token = signed_token(SECRET, "42", -3600);
        assert_eq!(verifier.verify_signed(&token).unwrap(), None);
    }

    #[test]
    fn garbage_token_is_rejected() {
        let verifier = RelayVerifier::new(SECRET);
        assert_eq!(verifier.verify_signed("garbage").unwrap(), None);
    }

    #[test]
    fn non_numeric_subject_is_rejected() {
        let verifier = RelayVerifier::new(SECRET);
        let token = signed_token(SECRET, "client-forty-two", 3600);
        assert_eq!(verifier.verify_signed(&token).unwrap(), None);
    }
}
