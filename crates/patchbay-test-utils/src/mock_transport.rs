// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Controllable [`ActionTransport`] mock.
//!
//! Responses are scripted per URL as a FIFO queue, each with an optional
//! delay, so tests can shape tier timing and downstream failures
//! deterministically. Unscripted URLs answer 200 with a marker body. Every
//! send is recorded with its start instant for ordering assertions.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::{Value, json};

use patchbay_core::traits::ActionTransport;
use patchbay_core::types::{OutboundRequest, OutboundResponse, TransportFailure};

/// One scripted answer.
struct Scripted {
    delay: Duration,
    result: Result<OutboundResponse, TransportFailure>,
}

/// A recorded outbound call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub request: OutboundRequest,
    /// When the transport began handling the call (before any scripted delay).
    pub at: Instant,
}

/// Scripted transport mock.
#[derive(Default)]
pub struct MockTransport {
    scripts: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with 200 and the given JSON body.
    pub fn respond_ok(&self, url: &str, body: Value) {
        self.respond_ok_after(url, Duration::ZERO, body);
    }

    /// Answer `url` with 200 after `delay`.
    pub fn respond_ok_after(&self, url: &str, delay: Duration, body: Value) {
        self.push(
            url,
            Scripted {
                delay,
                result: Ok(OutboundResponse {
                    status: 200,
                    headers: json!({}),
                    body,
                }),
            },
        );
    }

    /// Answer `url` with the given failure.
    pub fn respond_err(&self, url: &str, failure: TransportFailure) {
        self.respond_err_after(url, Duration::ZERO, failure);
    }

    /// Answer `url` with the given failure after `delay`.
    pub fn respond_err_after(&self, url: &str, delay: Duration, failure: TransportFailure) {
        self.push(
            url,
            Scripted {
                delay,
                result: Err(failure),
            },
        );
    }

    /// Every call handled so far, in arrival order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    fn push(&self, url: &str, scripted: Scripted) {
        self.scripts
            .lock()
            .expect("lock poisoned")
            .entry(url.to_string())
            .or_default()
            .push_back(scripted);
    }
}

#[async_trait]
impl ActionTransport for MockTransport {
    async fn send(
        &self,
        request: &OutboundRequest,
        _timeout: Duration,
    ) -> Result<OutboundResponse, TransportFailure> {
        self.calls.lock().expect("lock poisoned").push(RecordedCall {
            request: request.clone(),
            at: Instant::now(),
        });

        let scripted = self
            .scripts
            .lock()
            .expect("lock poisoned")
            .get_mut(&request.url)
            .and_then(|queue| queue.pop_front());

        match scripted {
            Some(scripted) => {
                if !scripted.delay.is_zero() {
                    tokio::time::sleep(scripted.delay).await;
                }
                scripted.result
            }
            None => Ok(OutboundResponse {
                status: 200,
                headers: json!({}),
                body: json!({"mock": true}),
            }),
        }
    }
}
