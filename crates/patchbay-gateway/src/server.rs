// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Relay HTTP server built on axum.
//!
//! Sets up routes and shared state. Authentication happens inside the event
//! gate, not in middleware: each rejection carries its own status and code.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use patchbay_core::PatchbayError;
use patchbay_core::traits::RelayStore;
use patchbay_dispatch::{Dispatcher, EventGate};

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Authenticates inbound notifications.
    pub gate: Arc<EventGate>,
    /// Contract resolution reads.
    pub store: Arc<dyn RelayStore>,
    /// Validates and launches execution.
    pub dispatcher: Dispatcher,
    /// Process start time for uptime reporting.
    pub start_time: std::time::Instant,
}

/// Server bind configuration (mirrors ServerConfig from patchbay-config).
#[derive(Debug, Clone)]
pub struct BindConfig {
    pub host: String,
    pub port: u16,
}

/// Build the relay router.
pub fn build_router(state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let relay_routes = Router::new()
        .route("/v1/events/{identifier}", post(handlers::post_event))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(relay_routes)
        .layer(CorsLayer::permissive())
}

/// Start the relay HTTP server.
pub async fn start_server(config: &BindConfig, state: GatewayState) -> Result<(), PatchbayError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| PatchbayError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("relay listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| PatchbayError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
