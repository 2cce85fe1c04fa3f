// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes. Collects every violation instead of failing fast.

use crate::diagnostic::ConfigError;
use crate::model::PatchbayConfig;

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &PatchbayConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    let salt = config.crypto.kdf_salt.trim();
    if salt.len() != 32 || !salt.chars().all(|c| c.is_ascii_hexdigit()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "crypto.kdf_salt must be exactly 32 hex characters, got `{salt}`"
            ),
        });
    }

    if config.crypto.kdf_memory_cost < 32768 {
        errors.push(ConfigError::Validation {
            message: format!(
                "crypto.kdf_memory_cost must be at least 32768 (32 MiB), got {}",
                config.crypto.kdf_memory_cost
            ),
        });
    }

    if config.crypto.kdf_iterations < 2 {
        errors.push(ConfigError::Validation {
            message: format!(
                "crypto.kdf_iterations must be at least 2, got {}",
                config.crypto.kdf_iterations
            ),
        });
    }

    if config.crypto.kdf_parallelism < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "crypto.kdf_parallelism must be at least 1, got {}",
                config.crypto.kdf_parallelism
            ),
        });
    }

    if config.dispatch.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "dispatch.timeout_secs must be at least 1".to_string(),
        });
    }

    if config.mail.enabled {
        if config.mail.smtp_host.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "mail.smtp_host must not be empty when mail is enabled".to_string(),
            });
        }
        if config.mail.from.trim().is_empty() || config.mail.to.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "mail.from and mail.to must be set when mail is enabled".to_string(),
            });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PatchbayConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn bad_salt_and_zero_timeout_collect_both_errors() {
        let mut config = PatchbayConfig::default();
        config.crypto.kdf_salt = "zz".to_string();
        config.dispatch.timeout_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn enabled_mail_requires_addresses() {
        let mut config = PatchbayConfig::default();
        config.mail.enabled = true;

        let errors = validate_config(&config).unwrap_err();
        assert!(
            errors
                .iter()
                .any(|e| e.to_string().contains("mail.from and mail.to"))
        );
    }

    #[test]
    fn weak_kdf_parameters_are_rejected() {
        let mut config = PatchbayConfig::default();
        config.crypto.kdf_memory_cost = 1024;
        config.crypto.kdf_iterations = 1;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
