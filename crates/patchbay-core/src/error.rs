// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Patchbay integration relay.

use thiserror::Error;

/// The primary error type used across all Patchbay crates.
#[derive(Debug, Error)]
pub enum PatchbayError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// At-rest codec errors (malformed stored string, authentication failure).
    ///
    /// Decryption failures are fatal to the calling operation: an encrypted
    /// column that cannot be opened means the row is unusable.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// Template resolution errors (malformed placeholder, non-object context root).
    #[error("template error: {0}")]
    Template(String),

    /// Outbound call errors (connect failure, timeout, non-2xx status).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Mailer errors (SMTP connect, rendering). Never propagated out of the
    /// notification sink.
    #[error("mail error: {message}")]
    Mail {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PatchbayError {
    /// Wrap any error as a storage failure.
    pub fn storage<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage {
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = PatchbayError::Crypto("missing separator".into());
        assert_eq!(err.to_string(), "crypto error: missing separator");

        let err = PatchbayError::storage(std::io::Error::other("disk full"));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn transport_error_without_source() {
        let err = PatchbayError::Transport {
            message: "connection refused".into(),
            source: None,
        };
        assert!(err.to_string().contains("connection refused"));
    }
}
