// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./patchbay.toml` > `~/.config/patchbay/patchbay.toml`
//! > `/etc/patchbay/patchbay.toml` with environment variable overrides via the
//! `PATCHBAY_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::PatchbayConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/patchbay/patchbay.toml` (system-wide)
/// 3. `~/.config/patchbay/patchbay.toml` (user XDG config)
/// 4. `./patchbay.toml` (local directory)
/// 5. `PATCHBAY_*` environment variables
pub fn load_config() -> Result<PatchbayConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<PatchbayConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PatchbayConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PatchbayConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PatchbayConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for
/// diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PatchbayConfig::default()))
        .merge(Toml::file("/etc/patchbay/patchbay.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("patchbay/patchbay.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("patchbay.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `PATCHBAY_CRYPTO_KDF_SALT` must map to
/// `crypto.kdf_salt`, not `crypto.kdf.salt`.
fn env_provider() -> Env {
    Env::prefixed("PATCHBAY_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: PATCHBAY_AUTH_TOKEN_SECRET -> "auth_token_secret"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("relay_", "relay.", 1)
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("crypto_", "crypto.", 1)
            .replacen("auth_", "auth.", 1)
            .replacen("dispatch_", "dispatch.", 1)
            .replacen("mail_", "mail.", 1);
        mapped.into()
    })
}
