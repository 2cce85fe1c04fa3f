// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The dispatch orchestrator.
//!
//! Contracts are partitioned into tiers by `exec_order`. Tiers run strictly
//! in ascending sequence; contracts within a tier run concurrently and every
//! per-contract result -- success or failure -- is a value, so one failing
//! action can never abort its siblings or later tiers. The caller gets
//! "accepted" as soon as validation passes; execution and auditing proceed
//! on a spawned task.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use serde_json::{Value, json};
use thiserror::Error;

use patchbay_core::PatchbayError;
use patchbay_core::traits::{ActionTransport, NotificationSink, RelayStore};
use patchbay_core::types::{
    ContractOutcome, EventContract, ExecutionState, OutboundRequest, OutboundResponse,
    RequestContext, RequestSnapshot, SecurityType, TransportFailure,
};
use patchbay_vault::Codec;

use crate::templates::HttpCallTemplate;

/// Rejected dispatch input. Every variant maps to HTTP 400 at the gateway.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("{0}")]
    Validation(String),
}

/// Executes resolved contracts against their actions.
#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<dyn RelayStore>,
    transport: Arc<dyn ActionTransport>,
    codec: Arc<Codec>,
    sink: Arc<dyn NotificationSink>,
    timeout: Duration,
}

/// A downstream or pre-call failure, normalized for auditing.
struct ExecutionFailure {
    request: Option<OutboundRequest>,
    status: Option<u16>,
    code: String,
    message: String,
    response: Option<OutboundResponse>,
}

impl ExecutionFailure {
    /// A failure before any request could be issued (decrypt, parse).
    fn pre_call(code: &str, err: PatchbayError) -> Self {
        Self {
            request: None,
            status: None,
            code: code.to_string(),
            message: err.to_string(),
            response: None,
        }
    }

    fn from_transport(request: OutboundRequest, failure: TransportFailure) -> Self {
        Self {
            request: Some(request),
            status: failure.status,
            code: failure.code,
            message: failure.message,
            response: failure.response,
        }
    }
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn RelayStore>,
        transport: Arc<dyn ActionTransport>,
        codec: Arc<Codec>,
        sink: Arc<dyn NotificationSink>,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            transport,
            codec,
            sink,
            timeout,
        }
    }

    /// Validate dispatch input and launch execution.
    ///
    /// Returns as soon as validation passes; the returned handle covers the
    /// spawned execution and is only awaited by tests.
    pub fn dispatch(
        &self,
        event_id: Option<&Value>,
        contracts: Option<&Value>,
        snapshot: RequestSnapshot,
    ) -> Result<tokio::task::JoinHandle<()>, DispatchError> {
        let (Some(event_id), Some(contracts)) = (event_id, contracts) else {
            return Err(DispatchError::Validation(
                "Event Id or Event Contract List was not send.".to_string(),
            ));
        };
        let Some(event_id) = event_id.as_i64() else {
            return Err(DispatchError::Validation(
                "Event Id is not a number.".to_string(),
            ));
        };
        if !contracts.is_array() {
            return Err(DispatchError::Validation(
                "Event Contract is not an array.".to_string(),
            ));
        }
        let contracts: Vec<EventContract> =
            serde_json::from_value(contracts.clone()).map_err(|_| {
                DispatchError::Validation("Event Contract is not an array.".to_string())
            })?;

        let dispatcher = self.clone();
        Ok(tokio::spawn(dispatcher.run(event_id, contracts, snapshot)))
    }

    /// Record the received event, walk the tiers, then notify.
    async fn run(self, event_id: i64, contracts: Vec<EventContract>, snapshot: RequestSnapshot) {
        let received_event_id = match self.record_received_event(event_id, &snapshot).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(error = %e, event_id, "failed to record received event; dispatch aborted");
                return;
            }
        };

        let ctx = RequestContext::from_snapshot(&snapshot);
        let tiers = partition_tiers(contracts);

        let mut outcomes = Vec::new();
        for (tier, group) in &tiers {
            tracing::debug!(tier, contracts = group.len(), "executing tier");
            let results = join_all(
                group
                    .iter()
                    .map(|contract| self.execute_contract(contract, received_event_id, &ctx)),
            )
            .await;
            outcomes.extend(results);
        }

        for outcome in &outcomes {
            self.sink.on_result(outcome).await;
        }
    }

    /// Encrypt and persist a received-event snapshot. Returns the row id.
    ///
    /// Also used directly by the gateway for the zero-contracts path, which
    /// must be audited even though nothing dispatches.
    pub async fn record_received_event(
        &self,
        event_id: i64,
        snapshot: &RequestSnapshot,
    ) -> Result<i64, PatchbayError> {
        let snapshot_json = serde_json::to_string(snapshot)
            .map_err(|e| PatchbayError::Internal(format!("snapshot serialization failed: {e}")))?;
        let encrypted = self.codec.encrypt(&snapshot_json)?;
        self.store.insert_received_event(event_id, &encrypted).await
    }

    /// Execute one contract to a terminal state. Never fails out: the
    /// outcome carries any error as data.
    async fn execute_contract(
        &self,
        contract: &EventContract,
        received_event_id: i64,
        base_ctx: &RequestContext,
    ) -> ContractOutcome {
        let started_at = Utc::now();
        match self.run_action(contract, base_ctx).await {
            Ok((request, response)) => {
                let response_snapshot = json!({
                    "status": response.status,
                    "headers": response.headers,
                    "body": response.body,
                    "started_at": started_at.to_rfc3339(),
                    "finished_at": Utc::now().to_rfc3339(),
                });
                self.record_attempt(
                    contract,
                    received_event_id,
                    ExecutionState::Processed,
                    Some(&request),
                    response_snapshot,
                )
                .await;
                ContractOutcome {
                    contract_id: contract.contract_id,
                    contract_name: contract.contract_name.clone(),
                    event_identifier: contract.event_identifier.clone(),
                    message: format!("event contract `{}` processed", contract.contract_name),
                    error: None,
                }
            }
            Err(failure) => {
                let error_snapshot = json!({
                    "status": failure.status,
                    "code": failure.code,
                    "message": failure.message,
                    "response": failure.response,
                    "started_at": started_at.to_rfc3339(),
                    "finished_at": Utc::now().to_rfc3339(),
                });
                self.record_attempt(
                    contract,
                    received_event_id,
                    ExecutionState::Error,
                    failure.request.as_ref(),
                    error_snapshot,
                )
                .await;
                ContractOutcome {
                    contract_id: contract.contract_id,
                    contract_name: contract.contract_name.clone(),
                    event_identifier: contract.event_identifier.clone(),
                    message: format!("event contract `{}` failed", contract.contract_name),
                    error: Some(format!("{}: {}", failure.code, failure.message)),
                }
            }
        }
    }

    /// Token pre-step (if any), template resolution, and the outbound call.
    async fn run_action(
        &self,
        contract: &EventContract,
        base_ctx: &RequestContext,
    ) -> Result<(OutboundRequest, OutboundResponse), ExecutionFailure> {
        let ctx = match contract.security_type {
            SecurityType::Oauth2Client => self.acquire_token(contract, base_ctx).await?,
            SecurityType::Custom => base_ctx.clone(),
        };

        let call_json = self
            .codec
            .decrypt(&contract.call_template)
            .map_err(|e| ExecutionFailure::pre_call("decrypt", e))?;
        let template = HttpCallTemplate::from_json(&call_json)
            .map_err(|e| ExecutionFailure::pre_call("template", e))?;

        let mut request = template.resolve(&ctx);
        request
            .headers
            .push(("x-relay-start".to_string(), Utc::now().to_rfc3339()));

        tracing::debug!(
            contract = %contract.contract_name,
            method = %request.method,
            url = %request.url,
            "calling action"
        );
        match self.transport.send(&request, self.timeout).await {
            Ok(response) => Ok((request, response)),
            Err(failure) => Err(ExecutionFailure::from_transport(request, failure)),
        }
    }

    /// Acquire a bearer token for an oauth2_client action and extend the
    /// context with the `{headers, body}` of the token response. The
    /// extended context is scoped to this contract only.
    async fn acquire_token(
        &self,
        contract: &EventContract,
        ctx: &RequestContext,
    ) -> Result<RequestContext, ExecutionFailure> {
        let Some(token_template) = &contract.token_template else {
            return Err(ExecutionFailure::pre_call(
                "security",
                PatchbayError::Internal(
                    "oauth2_client action has no token-request template".to_string(),
                ),
            ));
        };

        let token_json = self
            .codec
            .decrypt(token_template)
            .map_err(|e| ExecutionFailure::pre_call("decrypt", e))?;
        let template = HttpCallTemplate::from_json(&token_json)
            .map_err(|e| ExecutionFailure::pre_call("template", e))?;
        let request = template.resolve(ctx);

        tracing::debug!(contract = %contract.contract_name, url = %request.url, "acquiring token");
        match self.transport.send(&request, self.timeout).await {
            Ok(response) => Ok(ctx.with_oauth_response(json!({
                "headers": response.headers,
                "body": response.body,
            }))),
            Err(failure) => Err(ExecutionFailure::from_transport(request, failure)),
        }
    }

    /// Write the detail + try rows for one attempt. Audit-write failures are
    /// logged and swallowed; they never alter the reported outcome.
    async fn record_attempt(
        &self,
        contract: &EventContract,
        received_event_id: i64,
        state: ExecutionState,
        request: Option<&OutboundRequest>,
        snapshot: Value,
    ) {
        if let Err(e) = self
            .try_record(contract, received_event_id, state, request, snapshot)
            .await
        {
            tracing::warn!(
                error = %e,
                contract = %contract.contract_name,
                "failed to record execution audit"
            );
        }
    }

    async fn try_record(
        &self,
        contract: &EventContract,
        received_event_id: i64,
        state: ExecutionState,
        request: Option<&OutboundRequest>,
        snapshot: Value,
    ) -> Result<(), PatchbayError> {
        let detail_id = self
            .store
            .insert_execution_detail(contract.contract_id, received_event_id, state)
            .await?;

        let request_json = match request {
            Some(request) => serde_json::to_string(request)
                .map_err(|e| PatchbayError::Internal(format!("request serialization failed: {e}")))?,
            None => Value::Null.to_string(),
        };
        let encrypted_request = self.codec.encrypt(&request_json)?;
        let encrypted_response = self.codec.encrypt(&snapshot.to_string())?;

        self.store
            .insert_execution_try(detail_id, state, &encrypted_request, &encrypted_response)
            .await?;
        Ok(())
    }
}

/// Partition contracts into execution tiers keyed by `exec_order`.
///
/// The BTreeMap iterates tiers in ascending numeric order; within a tier,
/// contracts keep the resolver's order (which carries no guarantee).
pub fn partition_tiers(contracts: Vec<EventContract>) -> BTreeMap<i64, Vec<EventContract>> {
    let mut tiers: BTreeMap<i64, Vec<EventContract>> = BTreeMap::new();
    for contract in contracts {
        tiers.entry(contract.exec_order).or_default().push(contract);
    }
    tiers
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchbay_test_utils::{MemoryStore, MockTransport, RecordingSink};
    use std::time::Instant;

    const KEY: [u8; 32] = [7u8; 32];

    fn codec() -> Codec {
        Codec::from_key(KEY)
    }

    fn snapshot(body: Value) -> RequestSnapshot {
        RequestSnapshot {
            method: "POST".to_string(),
            url: "/v1/events/order-created".to_string(),
            headers: json!({"auth": "k-1"}),
            query: json!({}),
            body,
        }
    }

    /// A contract whose action calls `url` with a pass-through body.
    fn contract(id: i64, exec_order: i64, url: &str) -> EventContract {
        let template = json!({"url": url, "method": "POST", "data": {}});
        EventContract {
            contract_id: id,
            contract_name: format!("contract-{id}"),
            exec_order,
            event_id: 1,
            event_identifier: "order-created".to_string(),
            action_id: id,
            action_name: format!("action-{id}"),
            call_template: codec().encrypt(&template.to_string()).unwrap(),
            security_type: SecurityType::Custom,
            token_template: None,
        }
    }

    fn dispatcher(
        store: Arc<MemoryStore>,
        transport: Arc<MockTransport>,
        sink: Arc<RecordingSink>,
    ) -> Dispatcher {
        Dispatcher::new(
            store,
            transport,
            Arc::new(codec()),
            sink,
            Duration::from_secs(5),
        )
    }

    fn harness() -> (Arc<MemoryStore>, Arc<MockTransport>, Arc<RecordingSink>, Dispatcher) {
        let store = Arc::new(MemoryStore::new());
        let transport = Arc::new(MockTransport::new());
        let sink = Arc::new(RecordingSink::new());
        let d = dispatcher(store.clone(), transport.clone(), sink.clone());
        (store, transport, sink, d)
    }

    #[tokio::test]
    async fn missing_inputs_reject_with_exact_message() {
        let (_, _, _, d) = harness();
        let err = d
            .dispatch(None, None, snapshot(json!({})))
            .unwrap_err();
        assert_eq!(
            err,
            DispatchError::Validation("Event Id or Event Contract List was not send.".to_string())
        );
    }

    #[tokio::test]
    async fn non_numeric_event_id_rejects_with_exact_message() {
        let (_, _, _, d) = harness();
        let err = d
            .dispatch(
                Some(&json!("seven")),
                Some(&json!([])),
                snapshot(json!({})),
            )
            .unwrap_err();
        assert_eq!(
            err,
            DispatchError::Validation("Event Id is not a number.".to_string())
        );
    }

    #[tokio::test]
    async fn non_array_contracts_reject_with_exact_message() {
        let (_, _, _, d) = harness();
        let err = d
            .dispatch(
                Some(&json!(1)),
                Some(&json!({"not": "an array"})),
                snapshot(json!({})),
            )
            .unwrap_err();
        assert_eq!(
            err,
            DispatchError::Validation("Event Contract is not an array.".to_string())
        );
    }

    #[tokio::test]
    async fn empty_contract_array_is_accepted_and_still_audited() {
        let (store, _, sink, d) = harness();
        let handle = d
            .dispatch(Some(&json!(1)), Some(&json!([])), snapshot(json!({"n": 1})))
            .unwrap();
        handle.await.unwrap();

        assert_eq!(store.received_events().len(), 1);
        assert!(sink.outcomes().is_empty());
    }

    #[tokio::test]
    async fn received_event_snapshot_is_encrypted_and_recoverable() {
        let (store, _, _, d) = harness();
        let contracts = serde_json::to_value(vec![contract(1, 0, "https://a.example/hook")])
            .unwrap();
        let handle = d
            .dispatch(Some(&json!(1)), Some(&contracts), snapshot(json!({"n": 7})))
            .unwrap();
        handle.await.unwrap();

        let received = store.received_events();
        assert_eq!(received.len(), 1);
        // Stored shape is <nonceHex>|.|<cipherHex> and decrypts to the snapshot.
        let stored = &received[0].encrypted_snapshot;
        assert!(stored.contains("|.|"));
        let decrypted = codec().decrypt(stored).unwrap();
        let snapshot: RequestSnapshot = serde_json::from_str(&decrypted).unwrap();
        assert_eq!(snapshot.body, json!({"n": 7}));
    }

    #[tokio::test]
    async fn tiers_execute_sequentially_and_concurrently_within() {
        let (_, transport, sink, d) = harness();
        // Tier 0 has a slow and a fast call; tier 1 must not start until the
        // slow one resolved.
        transport.respond_ok_after(
            "https://a.example/slow",
            Duration::from_millis(150),
            json!({"ok": true}),
        );
        transport.respond_ok("https://a.example/fast", json!({"ok": true}));
        transport.respond_ok("https://b.example/next", json!({"ok": true}));

        let contracts = serde_json::to_value(vec![
            contract(1, 0, "https://a.example/slow"),
            contract(2, 0, "https://a.example/fast"),
            contract(3, 1, "https://b.example/next"),
        ])
        .unwrap();

        let started = Instant::now();
        let handle = d
            .dispatch(Some(&json!(1)), Some(&contracts), snapshot(json!({})))
            .unwrap();
        handle.await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls.len(), 3);

        let at = |url: &str| {
            calls
                .iter()
                .find(|c| c.request.url == url)
                .unwrap()
                .at
        };
        // Both tier-0 calls start promptly; the tier-1 call waits out the
        // slow tier-0 response.
        assert!(at("https://a.example/fast") - started < Duration::from_millis(100));
        assert!(at("https://b.example/next") - started >= Duration::from_millis(150));

        // Outcomes arrive in dispatch order.
        let names: Vec<String> = sink
            .outcomes()
            .iter()
            .map(|o| o.contract_name.clone())
            .collect();
        assert_eq!(names, vec!["contract-1", "contract-2", "contract-3"]);
    }

    #[tokio::test]
    async fn one_failure_does_not_abort_siblings_or_later_tiers() {
        let (store, transport, sink, d) = harness();
        transport.respond_err(
            "https://a.example/broken",
            TransportFailure {
                message: "connection refused".to_string(),
                status: None,
                code: "connect".to_string(),
                response: None,
            },
        );
        transport.respond_ok("https://a.example/sibling", json!({"ok": true}));
        transport.respond_ok("https://b.example/later", json!({"ok": true}));

        let contracts = serde_json::to_value(vec![
            contract(1, 0, "https://a.example/broken"),
            contract(2, 0, "https://a.example/sibling"),
            contract(3, 1, "https://b.example/later"),
        ])
        .unwrap();

        let handle = d
            .dispatch(Some(&json!(1)), Some(&contracts), snapshot(json!({})))
            .unwrap();
        handle.await.unwrap();

        // All three executed and were recorded.
        assert_eq!(transport.calls().len(), 3);
        let details = store.details();
        assert_eq!(details.len(), 3);
        assert_eq!(
            details.iter().filter(|d| d.state == ExecutionState::Error).count(),
            1
        );

        let outcomes = sink.outcomes();
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].error.as_deref().unwrap().contains("connect"));
        assert!(outcomes[1].error.is_none());
        assert!(outcomes[2].error.is_none());
    }

    #[tokio::test]
    async fn pass_through_body_reaches_the_action() {
        let (_, transport, _, d) = harness();
        transport.respond_ok("https://a.example/hook", json!({"ok": true}));

        let inbound = json!({"exactly": ["what", "came", "in"]});
        let contracts =
            serde_json::to_value(vec![contract(1, 0, "https://a.example/hook")]).unwrap();
        let handle = d
            .dispatch(Some(&json!(1)), Some(&contracts), snapshot(inbound.clone()))
            .unwrap();
        handle.await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls[0].request.body, Some(inbound));
        // The start-time stamp rides along as a header.
        assert!(
            calls[0]
                .request
                .headers
                .iter()
                .any(|(name, _)| name == "x-relay-start")
        );
    }

    #[tokio::test]
    async fn oauth2_contract_acquires_token_before_the_call() {
        let (_, transport, sink, d) = harness();
        transport.respond_ok(
            "https://auth.example/token",
            json!({"access_token": "tok-99", "token_type": "bearer"}),
        );
        transport.respond_ok("https://a.example/secure", json!({"ok": true}));

        let token_template = json!({
            "url": "https://auth.example/token",
            "method": "POST",
            "data": {"client_id": "relay", "client_secret": "shh", "grant_type": "client_credentials"}
        });
        let call_template = json!({
            "url": "https://a.example/secure",
            "method": "POST",
            "headers": {"authorization": "Bearer ${.oauthResponse.body.access_token}"},
            "data": {}
        });
        let contract = EventContract {
            contract_id: 1,
            contract_name: "secure-contract".to_string(),
            exec_order: 0,
            event_id: 1,
            event_identifier: "order-created".to_string(),
            action_id: 1,
            action_name: "secure-action".to_string(),
            call_template: codec().encrypt(&call_template.to_string()).unwrap(),
            security_type: SecurityType::Oauth2Client,
            token_template: Some(codec().encrypt(&token_template.to_string()).unwrap()),
        };

        let contracts = serde_json::to_value(vec![contract]).unwrap();
        let handle = d
            .dispatch(Some(&json!(1)), Some(&contracts), snapshot(json!({})))
            .unwrap();
        handle.await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].request.url, "https://auth.example/token");
        assert_eq!(
            calls[0].request.body,
            Some(json!({"client_id": "relay", "client_secret": "shh", "grant_type": "client_credentials"}))
        );
        assert!(
            calls[1]
                .request
                .headers
                .iter()
                .any(|(name, value)| name == "authorization" && value == "Bearer tok-99")
        );
        assert!(sink.outcomes()[0].error.is_none());
    }

    #[tokio::test]
    async fn failed_token_acquisition_fails_only_that_contract() {
        let (store, transport, sink, d) = harness();
        transport.respond_err(
            "https://auth.example/token",
            TransportFailure {
                message: "downstream answered 401 Unauthorized".to_string(),
                status: Some(401),
                code: "status".to_string(),
                response: None,
            },
        );
        transport.respond_ok("https://a.example/plain", json!({"ok": true}));

        let token_template =
            json!({"url": "https://auth.example/token", "method": "POST", "data": null});
        let mut secured = contract(1, 0, "https://a.example/never-called");
        secured.security_type = SecurityType::Oauth2Client;
        secured.token_template = Some(codec().encrypt(&token_template.to_string()).unwrap());
        let plain = contract(2, 0, "https://a.example/plain");

        let contracts = serde_json::to_value(vec![secured, plain]).unwrap();
        let handle = d
            .dispatch(Some(&json!(1)), Some(&contracts), snapshot(json!({})))
            .unwrap();
        handle.await.unwrap();

        // The secured action itself was never called.
        assert!(
            transport
                .calls()
                .iter()
                .all(|c| c.request.url != "https://a.example/never-called")
        );
        let outcomes = sink.outcomes();
        assert!(outcomes[0].error.as_deref().unwrap().contains("401"));
        assert!(outcomes[1].error.is_none());
        assert_eq!(store.details().len(), 2);
    }

    #[tokio::test]
    async fn audit_snapshots_decrypt_to_request_and_response() {
        let (store, transport, _, d) = harness();
        transport.respond_ok("https://a.example/hook", json!({"received": true}));

        let contracts =
            serde_json::to_value(vec![contract(1, 0, "https://a.example/hook")]).unwrap();
        let handle = d
            .dispatch(Some(&json!(1)), Some(&contracts), snapshot(json!({"n": 1})))
            .unwrap();
        handle.await.unwrap();

        let tries = store.tries();
        assert_eq!(tries.len(), 1);
        let request: OutboundRequest =
            serde_json::from_str(&codec().decrypt(&tries[0].encrypted_request).unwrap()).unwrap();
        assert_eq!(request.url, "https://a.example/hook");

        let response: Value =
            serde_json::from_str(&codec().decrypt(&tries[0].encrypted_response).unwrap()).unwrap();
        assert_eq!(response["status"], 200);
        assert_eq!(response["body"]["received"], true);
        assert!(response["started_at"].is_string());
        assert!(response["finished_at"].is_string());
    }

    #[tokio::test]
    async fn audit_write_failure_is_swallowed() {
        let (store, transport, sink, d) = harness();
        store.fail_detail_writes(true);
        transport.respond_ok("https://a.example/hook", json!({"ok": true}));

        let contracts =
            serde_json::to_value(vec![contract(1, 0, "https://a.example/hook")]).unwrap();
        let handle = d
            .dispatch(Some(&json!(1)), Some(&contracts), snapshot(json!({})))
            .unwrap();
        handle.await.unwrap();

        // The contract still completed and was reported as processed.
        let outcomes = sink.outcomes();
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].error.is_none());
        assert!(store.details().is_empty());
    }

    #[tokio::test]
    async fn received_event_write_failure_aborts_the_run() {
        let (store, transport, sink, d) = harness();
        store.fail_received_writes(true);

        let contracts =
            serde_json::to_value(vec![contract(1, 0, "https://a.example/hook")]).unwrap();
        let handle = d
            .dispatch(Some(&json!(1)), Some(&contracts), snapshot(json!({})))
            .unwrap();
        handle.await.unwrap();

        assert!(transport.calls().is_empty());
        assert!(sink.outcomes().is_empty());
    }

    #[test]
    fn partition_preserves_ascending_tier_order() {
        let contracts = vec![
            contract(1, 5, "https://x/1"),
            contract(2, 0, "https://x/2"),
            contract(3, 5, "https://x/3"),
            contract(4, 2, "https://x/4"),
        ];
        let tiers = partition_tiers(contracts);
        let keys: Vec<i64> = tiers.keys().copied().collect();
        assert_eq!(keys, vec![0, 2, 5]);
        assert_eq!(tiers[&5].len(), 2);
        assert_eq!(tiers[&5][0].contract_id, 1);
    }
}
