// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The event gate: authenticates an inbound event notification against the
//! registered client credential.
//!
//! Checks run in a fixed order and each failure is a distinct rejection.
//! Success yields only the opaque event id -- no other event detail leaks to
//! the caller at this stage.

use std::sync::Arc;

use patchbay_core::traits::{RelayStore, SecretVerifier};

/// A rejected authentication attempt, carrying the HTTP status and a stable
/// machine-readable code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateRejection {
    pub status: u16,
    pub code: &'static str,
    pub message: String,
}

impl GateRejection {
    fn new(status: u16, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    fn internal() -> Self {
        Self::new(500, "internal-error", "internal server error")
    }
}

/// Authenticates event notifications.
pub struct EventGate {
    store: Arc<dyn RelayStore>,
    verifier: Arc<dyn SecretVerifier>,
}

impl EventGate {
    pub fn new(store: Arc<dyn RelayStore>, verifier: Arc<dyn SecretVerifier>) -> Self {
        Self { store, verifier }
    }

    /// Authenticate an access key for an event identifier.
    ///
    /// Rejection order:
    /// 1. missing inputs -> 400 access-params-missing
    /// 2. unknown event -> 404 event-not-found
    /// 3. no live client for the event's system -> 404 client-not-found
    /// 4. revoked client -> 403 client-revoked
    /// 5. static token mismatch -> 401 incorrect-token
    /// 6. signed token invalid or wrong subject -> 401 incorrect-token
    pub async fn authenticate(
        &self,
        access_key: Option<&str>,
        event_identifier: Option<&str>,
    ) -> Result<i64, GateRejection> {
        let (Some(access_key), Some(event_identifier)) = (access_key, event_identifier) else {
            return Err(GateRejection::new(
                400,
                "access-params-missing",
                "access key and event identifier are required",
            ));
        };

        let event = self
            .store
            .find_event_by_identifier(event_identifier)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "event lookup failed");
                GateRejection::internal()
            })?
            .ok_or_else(|| {
                GateRejection::new(
                    404,
                    "event-not-found",
                    format!("no active event `{event_identifier}`"),
                )
            })?;

        let client = self
            .store
            .find_client_for_event(event.id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "client lookup failed");
                GateRejection::internal()
            })?
            .ok_or_else(|| {
                GateRejection::new(404, "client-not-found", "no client registered for event")
            })?;

        if client.revoked {
            return Err(GateRejection::new(
                403,
                "client-revoked",
                "client credential is revoked",
            ));
        }

        match &client.token_hash {
            Some(stored_hash) => {
                let matches = self
                    .verifier
                    .verify_static(access_key, stored_hash)
                    .map_err(|e| {
                        tracing::error!(error = %e, "static token verification failed");
                        GateRejection::internal()
                    })?;
                if !matches {
                    return Err(incorrect_token());
                }
            }
            None => {
                let subject = self.verifier.verify_signed(access_key).map_err(|e| {
                    tracing::error!(error = %e, "signed token verification failed");
                    GateRejection::internal()
                })?;
                match subject {
                    Some(id) if id == client.id => {}
                    _ => return Err(incorrect_token()),
                }
            }
        }

        tracing::debug!(event_id = event.id, client_id = client.id, "event authenticated");
        Ok(event.id)
    }
}

fn incorrect_token() -> GateRejection {
    GateRejection::new(401, "incorrect-token", "access key is not valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchbay_core::types::{ClientRecord, EventRecord, OperationKind};
    use patchbay_test_utils::{MemoryStore, MockVerifier};

    fn event(id: i64, identifier: &str) -> EventRecord {
        EventRecord {
            id,
            system_id: 1,
            identifier: identifier.to_string(),
            name: "Order created".to_string(),
            operation: OperationKind::New,
            description: None,
            deleted: false,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    fn client(id: i64, token_hash: Option<&str>, revoked: bool) -> ClientRecord {
        ClientRecord {
            id,
            name: "producer".to_string(),
            token_hash: token_hash.map(|s| s.to_string()),
            revoked,
            deleted: false,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    async fn gate_with(
        store_setup: impl FnOnce(&MemoryStore),
    ) -> EventGate {
        let store = MemoryStore::new();
        store_setup(&store);
        EventGate::new(Arc::new(store), Arc::new(MockVerifier::new()))
    }

    #[tokio::test]
    async fn missing_params_reject_400() {
        let gate = gate_with(|_| {}).await;

        let err = gate.authenticate(None, Some("order-created")).await.unwrap_err();
        assert_eq!((err.status, err.code), (400, "access-params-missing"));

        let err = gate.authenticate(Some("key"), None).await.unwrap_err();
        assert_eq!((err.status, err.code), (400, "access-params-missing"));
    }

    #[tokio::test]
    async fn unknown_event_rejects_404() {
        let gate = gate_with(|_| {}).await;
        let err = gate
            .authenticate(Some("key"), Some("no-such-event"))
            .await
            .unwrap_err();
        assert_eq!((err.status, err.code), (404, "event-not-found"));
    }

    #[tokio::test]
    async fn missing_client_rejects_404() {
        let gate = gate_with(|store| {
            store.add_event(event(1, "order-created"));
        })
        .await;
        let err = gate
            .authenticate(Some("key"), Some("order-created"))
            .await
            .unwrap_err();
        assert_eq!((err.status, err.code), (404, "client-not-found"));
    }

    #[tokio::test]
    async fn revoked_client_rejects_403() {
        let gate = gate_with(|store| {
            store.add_event(event(1, "order-created"));
            store.set_client_for_event(1, client(9, Some("static-token"), true));
        })
        .await;
        let err = gate
            .authenticate(Some("static-token"), Some("order-created"))
            .await
            .unwrap_err();
        assert_eq!((err.status, err.code), (403, "client-revoked"));
    }

    #[tokio::test]
    async fn static_token_match_authenticates() {
        let gate = gate_with(|store| {
            store.add_event(event(1, "order-created"));
            store.set_client_for_event(1, client(9, Some("static-token"), false));
        })
        .await;
        let event_id = gate
            .authenticate(Some("static-token"), Some("order-created"))
            .await
            .unwrap();
        assert_eq!(event_id, 1);
    }

    #[tokio::test]
    async fn static_token_mismatch_rejects_401() {
        let gate = gate_with(|store| {
            store.add_event(event(1, "order-created"));
            store.set_client_for_event(1, client(9, Some("static-token"), false));
        })
        .await;
        let err = gate
            .authenticate(Some("wrong"), Some("order-created"))
            .await
            .unwrap_err();
        assert_eq!((err.status, err.code), (401, "incorrect-token"));
    }

    #[tokio::test]
    async fn signed_token_with_matching_subject_authenticates() {
        let gate = gate_with(|store| {
            store.add_event(event(1, "order-created"));
            store.set_client_for_event(1, client(9, None, false));
        })
        .await;
        // MockVerifier accepts tokens of the form `signed:<client-id>`.
        let event_id = gate
            .authenticate(Some("signed:9"), Some("order-created"))
            .await
            .unwrap();
        assert_eq!(event_id, 1);
    }

    #[tokio::test]
    async fn signed_token_with_wrong_subject_rejects_401() {
        let gate = gate_with(|store| {
            store.add_event(event(1, "order-created"));
            store.set_client_for_event(1, client(9, None, false));
        })
        .await;
        let err = gate
            .authenticate(Some("signed:8"), Some("order-created"))
            .await
            .unwrap_err();
        assert_eq!((err.status, err.code), (401, "incorrect-token"));
    }

    #[tokio::test]
    async fn invalid_signed_token_rejects_401() {
        let gate = gate_with(|store| {
            store.add_event(event(1, "order-created"));
            store.set_client_for_event(1, client(9, None, false));
        })
        .await;
        let err = gate
            .authenticate(Some("garbage"), Some("order-created"))
            .await
            .unwrap_err();
        assert_eq!((err.status, err.code), (401, "incorrect-token"));
    }

    #[tokio::test]
    async fn storage_failure_rejects_500() {
        let gate = gate_with(|store| {
            store.fail_lookups(true);
        })
        .await;
        let err = gate
            .authenticate(Some("key"), Some("order-created"))
            .await
            .unwrap_err();
        assert_eq!((err.status, err.code), (500, "internal-error"));
    }
}
