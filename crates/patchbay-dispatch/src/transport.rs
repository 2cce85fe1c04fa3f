// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! reqwest-backed [`ActionTransport`].
//!
//! Transport errors and non-2xx statuses both surface as
//! [`TransportFailure`], so the orchestrator records them uniformly; a
//! non-2xx failure still carries the response that was received.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use patchbay_core::PatchbayError;
use patchbay_core::traits::ActionTransport;
use patchbay_core::types::{OutboundRequest, OutboundResponse, TransportFailure};

/// Shared HTTP client for action and token-acquisition calls.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, PatchbayError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("patchbay/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PatchbayError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ActionTransport for HttpTransport {
    async fn send(
        &self,
        request: &OutboundRequest,
        timeout: Duration,
    ) -> Result<OutboundResponse, TransportFailure> {
        let method = reqwest::Method::from_bytes(request.method.to_uppercase().as_bytes())
            .map_err(|_| TransportFailure {
                message: format!("invalid HTTP method `{}`", request.method),
                status: None,
                code: "method".to_string(),
                response: None,
            })?;

        let mut builder = self
            .client
            .request(method, &request.url)
            .timeout(timeout)
            .query(&request.query);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            let code = if e.is_timeout() {
                "timeout"
            } else if e.is_connect() {
                "connect"
            } else {
                "request"
            };
            TransportFailure {
                message: e.to_string(),
                status: None,
                code: code.to_string(),
                response: None,
            }
        })?;

        let status = response.status();
        let headers = headers_to_json(response.headers());
        let text = response.text().await.map_err(|e| TransportFailure {
            message: format!("failed to read response body: {e}"),
            status: Some(status.as_u16()),
            code: "read".to_string(),
            response: None,
        })?;
        // Non-JSON bodies are kept verbatim as a string.
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        let captured = OutboundResponse {
            status: status.as_u16(),
            headers,
            body,
        };

        if status.is_success() {
            Ok(captured)
        } else {
            Err(TransportFailure {
                message: format!("downstream answered {status}"),
                status: Some(status.as_u16()),
                code: "status".to_string(),
                response: Some(captured),
            })
        }
    }
}

fn headers_to_json(headers: &reqwest::header::HeaderMap) -> Value {
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(url: &str) -> OutboundRequest {
        OutboundRequest {
            method: "POST".to_string(),
            url: url.to_string(),
            headers: vec![("x-relay-test".to_string(), "1".to_string())],
            query: vec![("page".to_string(), "2".to_string())],
            body: Some(json!({"n": 1})),
        }
    }

    #[tokio::test]
    async fn successful_call_captures_status_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(header("x-relay-test", "1"))
            .and(query_param("page", "2"))
            .and(body_json(json!({"n": 1})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let response = transport
            .send(&request(&format!("{}/hook", server.uri())), Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, json!({"ok": true}));
        assert!(response.headers.is_object());
    }

    #[tokio::test]
    async fn non_2xx_is_a_failure_carrying_the_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({"reason": "overloaded"})))
            .mount(&server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let failure = transport
            .send(&request(&format!("{}/hook", server.uri())), Duration::from_secs(5))
            .await
            .unwrap_err();

        assert_eq!(failure.status, Some(503));
        assert_eq!(failure.code, "status");
        assert_eq!(failure.response.unwrap().body, json!({"reason": "overloaded"}));
    }

    #[tokio::test]
    async fn connection_failure_is_distinguished_from_status() {
        let transport = HttpTransport::new().unwrap();
        // Nothing listens on this port.
        let failure = transport
            .send(&request("http://127.0.0.1:9/hook"), Duration::from_secs(2))
            .await
            .unwrap_err();

        assert_eq!(failure.status, None);
        assert_ne!(failure.code, "status");
        assert!(failure.response.is_none());
    }

    #[tokio::test]
    async fn non_json_body_is_kept_as_string() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .respond_with(ResponseTemplate::new(200).set_body_string("plain ack"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let response = transport
            .send(&request(&format!("{}/hook", server.uri())), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(response.body, json!("plain ack"));
    }

    #[tokio::test]
    async fn invalid_method_fails_before_sending() {
        let transport = HttpTransport::new().unwrap();
        let mut bad = request("http://127.0.0.1:9/hook");
        bad.method = "NOT A METHOD".to_string();
        let failure = transport.send(&bad, Duration::from_secs(1)).await.unwrap_err();
        assert_eq!(failure.code, "method");
    }
}
