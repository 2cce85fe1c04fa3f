// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Patchbay - event-driven integration relay.
//!
//! Binary entry point: loads and validates configuration, then serves the
//! relay or inspects the resolved config.

mod serve;

use clap::{Parser, Subcommand};

/// Patchbay - event-driven integration relay.
#[derive(Parser, Debug)]
#[command(name = "patchbay", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the relay server.
    Serve,
    /// Print the resolved configuration (secrets omitted).
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match patchbay_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            patchbay_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            init_tracing(&config.relay.log_level);
            if let Err(e) = serve::run(config).await {
                tracing::error!(error = %e, "relay failed");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            println!("relay.name           = {}", config.relay.name);
            println!("relay.log_level      = {}", config.relay.log_level);
            println!("server               = {}:{}", config.server.host, config.server.port);
            println!("storage.database     = {}", config.storage.database_path);
            println!(
                "crypto.passphrase    = {}",
                if config.crypto.passphrase.is_some() { "[set]" } else { "[missing]" }
            );
            println!(
                "auth.token_secret    = {}",
                if config.auth.token_secret.is_some() { "[set]" } else { "[missing]" }
            );
            println!("dispatch.timeout     = {}s", config.dispatch.timeout_secs);
            println!("mail.enabled         = {}", config.mail.enabled);
        }
        None => {
            println!("patchbay: use --help for available commands");
        }
    }
}

/// Initialize the tracing subscriber; `RUST_LOG` overrides the configured
/// level.
fn init_tracing(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        // Default config (no file present) must be valid; serve-time
        // requirements like the passphrase are checked later.
        let config = patchbay_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.relay.name, "patchbay");
    }
}
