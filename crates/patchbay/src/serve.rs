// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Startup wiring: codec key derivation, storage, dispatch engine, gateway.

use std::sync::Arc;
use std::time::Duration;

use patchbay_auth::RelayVerifier;
use patchbay_config::PatchbayConfig;
use patchbay_core::PatchbayError;
use patchbay_dispatch::{Dispatcher, EventGate, HttpTransport};
use patchbay_gateway::{BindConfig, GatewayState, start_server};
use patchbay_notify::AuditNotifier;
use patchbay_storage::SqliteStore;
use patchbay_vault::Codec;

/// Run the relay until the server exits.
pub async fn run(config: PatchbayConfig) -> Result<(), PatchbayError> {
    // The codec key is derived exactly once, before anything else touches
    // encrypted columns.
    let codec = Arc::new(Codec::from_config(&config.crypto)?);

    let token_secret = config.auth.token_secret.as_deref().ok_or_else(|| {
        PatchbayError::Config("auth.token_secret must be set to serve".to_string())
    })?;
    let verifier = Arc::new(RelayVerifier::new(token_secret));

    let store = Arc::new(SqliteStore::open(&config.storage).await?);
    let transport = Arc::new(HttpTransport::new()?);
    let sink = Arc::new(AuditNotifier::from_config(&config.mail)?);

    let dispatcher = Dispatcher::new(
        store.clone(),
        transport,
        codec,
        sink,
        Duration::from_secs(config.dispatch.timeout_secs),
    );
    let gate = Arc::new(EventGate::new(store.clone(), verifier));

    let state = GatewayState {
        gate,
        store,
        dispatcher,
        start_time: std::time::Instant::now(),
    };

    let bind = BindConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    start_server(&bind, state).await
}
