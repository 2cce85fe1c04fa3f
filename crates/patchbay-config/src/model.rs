// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Patchbay relay.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Patchbay configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values;
/// `crypto.passphrase` and `auth.token_secret` must be provided before the
/// relay will serve traffic.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PatchbayConfig {
    /// Relay identity and logging settings.
    #[serde(default)]
    pub relay: RelayConfig,

    /// HTTP server bind settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// At-rest encryption settings.
    #[serde(default)]
    pub crypto: CryptoConfig,

    /// Event-gate credential settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Dispatch orchestrator settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Failure-notification mail settings.
    #[serde(default)]
    pub mail: MailConfig,
}

/// Relay identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    /// Display name of this relay instance.
    #[serde(default = "default_relay_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            name: default_relay_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_relay_name() -> String {
    "patchbay".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP server bind configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8307
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL journal mode.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: true,
        }
    }
}

fn default_database_path() -> String {
    "patchbay.db".to_string()
}

fn default_true() -> bool {
    true
}

/// At-rest encryption configuration.
///
/// The codec key is derived once at startup from `passphrase` and the fixed
/// `kdf_salt`; the salt must stay stable for the lifetime of the database or
/// previously stored ciphertext becomes unreadable.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CryptoConfig {
    /// Key-derivation passphrase. Required for `serve`.
    #[serde(default)]
    pub passphrase: Option<String>,

    /// Fixed Argon2id salt, 32 hex characters (16 bytes).
    #[serde(default = "default_kdf_salt")]
    pub kdf_salt: String,

    /// Argon2id memory cost in KiB.
    #[serde(default = "default_kdf_memory_cost")]
    pub kdf_memory_cost: u32,

    /// Argon2id iteration count.
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Argon2id lane count.
    #[serde(default = "default_kdf_parallelism")]
    pub kdf_parallelism: u32,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            passphrase: None,
            kdf_salt: default_kdf_salt(),
            kdf_memory_cost: default_kdf_memory_cost(),
            kdf_iterations: default_kdf_iterations(),
            kdf_parallelism: default_kdf_parallelism(),
        }
    }
}

fn default_kdf_salt() -> String {
    // Stable default so a fresh install round-trips; override in production.
    "70617463686261792d6b64662d763100".to_string()
}

fn default_kdf_memory_cost() -> u32 {
    65536
}

fn default_kdf_iterations() -> u32 {
    3
}

fn default_kdf_parallelism() -> u32 {
    1
}

/// Event-gate credential configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Process-wide secret for verifying signed access tokens. Required for
    /// `serve`.
    #[serde(default)]
    pub token_secret: Option<String>,
}

/// Dispatch orchestrator configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Fixed per-call timeout for outbound action calls, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// Failure-notification mail configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MailConfig {
    /// Enable failure mails. When disabled, failures are only logged.
    #[serde(default)]
    pub enabled: bool,

    /// SMTP relay host.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    /// SMTP relay port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// SMTP username, if the relay requires authentication.
    #[serde(default)]
    pub username: Option<String>,

    /// SMTP password.
    #[serde(default)]
    pub password: Option<String>,

    /// From address for failure mails.
    #[serde(default)]
    pub from: String,

    /// Recipient address for failure mails.
    #[serde(default)]
    pub to: String,

    /// Comma-separated field names whose values are masked in mail payloads.
    #[serde(default = "default_obfuscate_fields")]
    pub obfuscate_fields: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            username: None,
            password: None,
            from: String::new(),
            to: String::new(),
            obfuscate_fields: default_obfuscate_fields(),
        }
    }
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_obfuscate_fields() -> String {
    "authorization, password, client_secret, access_token".to_string()
}
