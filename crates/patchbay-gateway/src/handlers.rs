// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the relay API.
//!
//! `POST /v1/events/{identifier}` is the producer-facing notification
//! endpoint: gate, resolve, dispatch. Gate rejections surface synchronously;
//! action execution never does -- the producer gets "accepted" and the rest
//! happens on the dispatch task.

use std::collections::HashMap;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Value, json};

use patchbay_core::types::RequestSnapshot;
use patchbay_dispatch::{DispatchError, GateRejection, resolve_contracts};

use crate::server::GatewayState;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
    /// Stable machine-readable code.
    pub code: String,
}

/// Acknowledgement body for accepted or contract-less notifications.
#[derive(Debug, Serialize)]
pub struct NotifyResponse {
    pub message: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// POST /v1/events/{identifier}
///
/// Accepts an event notification. The access key comes from the
/// `x-access-key` header, falling back to the `accessKey` query parameter.
pub async fn post_event(
    State(state): State<GatewayState>,
    Path(identifier): Path<String>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let access_key = headers
        .get("x-access-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| query.get("accessKey").cloned());

    let event_id = match state
        .gate
        .authenticate(access_key.as_deref(), Some(&identifier))
        .await
    {
        Ok(event_id) => event_id,
        Err(rejection) => return rejection_response(rejection),
    };

    let snapshot = RequestSnapshot {
        method: "POST".to_string(),
        url: uri.to_string(),
        headers: headers_to_json(&headers),
        query: serde_json::to_value(&query).unwrap_or(Value::Null),
        body: parse_body(&body),
    };

    let contracts = match resolve_contracts(state.store.as_ref(), event_id).await {
        Ok(contracts) => contracts,
        Err(e) => {
            tracing::error!(error = %e, event_id, "contract resolution failed");
            return internal_error();
        }
    };

    // Zero bound contracts is a valid, auditable outcome.
    if contracts.is_empty() {
        return match state.dispatcher.record_received_event(event_id, &snapshot).await {
            Ok(_) => (
                StatusCode::NON_AUTHORITATIVE_INFORMATION,
                Json(NotifyResponse {
                    message: "no contracts bound to event".to_string(),
                }),
            )
                .into_response(),
            Err(e) => {
                tracing::error!(error = %e, event_id, "failed to record received event");
                internal_error()
            }
        };
    }

    let contracts_value = match serde_json::to_value(&contracts) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(error = %e, "contract serialization failed");
            return internal_error();
        }
    };

    match state
        .dispatcher
        .dispatch(Some(&json!(event_id)), Some(&contracts_value), snapshot)
    {
        Ok(_handle) => (
            StatusCode::OK,
            Json(NotifyResponse {
                message: "accepted".to_string(),
            }),
        )
            .into_response(),
        Err(DispatchError::Validation(message)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: message,
                code: "dispatch-validation".to_string(),
            }),
        )
            .into_response(),
    }
}

/// GET /health
///
/// Unauthenticated liveness probe.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

fn rejection_response(rejection: GateRejection) -> Response {
    let status = StatusCode::from_u16(rejection.status)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ErrorResponse {
            error: rejection.message,
            code: rejection.code.to_string(),
        }),
    )
        .into_response()
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "internal server error".to_string(),
            code: "internal-error".to_string(),
        }),
    )
        .into_response()
}

/// Snapshot whatever the producer sent: JSON stays structured, anything
/// else is kept as a string, an empty body becomes null.
fn parse_body(body: &Bytes) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).to_string()))
}

fn headers_to_json(headers: &HeaderMap) -> Value {
    let map: serde_json::Map<String, Value> = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                Value::String(String::from_utf8_lossy(value.as_bytes()).to_string()),
            )
        })
        .collect();
    Value::Object(map)
}
