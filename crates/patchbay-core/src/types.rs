// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Patchbay workspace.
//!
//! Entity structs mirror the storage schema; the request/response types
//! are the currency of the dispatch pipeline.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// What a registered system does in the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SystemClassification {
    Producer,
    Consumer,
    Hybrid,
}

/// Operation kind declared on events and actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Select,
    New,
    Update,
    Delete,
    Process,
}

/// Security mode for invoking an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SecurityType {
    /// Caller-managed auth: the call template carries whatever headers it needs.
    Custom,
    /// A bearer token is acquired via the action's token template before the call.
    Oauth2Client,
}

/// Per-contract execution state.
///
/// Only [`Processed`](ExecutionState::Processed) and
/// [`Error`](ExecutionState::Error) are terminal and persisted on the
/// execution detail row; the others appear in try rows and tracing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ExecutionState {
    Pending,
    TokenPending,
    TokenAcquired,
    Calling,
    Processed,
    Error,
}

impl ExecutionState {
    /// Terminal states admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Processed | Self::Error)
    }
}

/// An event row as read by the gate (soft-deleted rows are filtered at query time).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: i64,
    pub system_id: i64,
    pub identifier: String,
    pub name: String,
    pub operation: OperationKind,
    pub description: Option<String>,
    pub deleted: bool,
    pub created_at: String,
}

/// The client credential owning a producer system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: i64,
    pub name: String,
    /// Argon2 PHC string when a static token is provisioned; `None` means the
    /// client authenticates with signed tokens only.
    pub token_hash: Option<String>,
    pub revoked: bool,
    pub deleted: bool,
    pub created_at: String,
}

/// One dispatch-eligible contract, joined with its event, action, and
/// action-security rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventContract {
    pub contract_id: i64,
    pub contract_name: String,
    /// Execution tier: equal values run concurrently, distinct values run in
    /// ascending sequence.
    pub exec_order: i64,
    pub event_id: i64,
    pub event_identifier: String,
    pub action_id: i64,
    pub action_name: String,
    /// Encrypted HTTP call template (`<nonceHex>|.|<cipherHex>`).
    pub call_template: String,
    pub security_type: SecurityType,
    /// Encrypted token-request template; present when
    /// `security_type == Oauth2Client`.
    pub token_template: Option<String>,
}

/// Full snapshot of one inbound event notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSnapshot {
    pub method: String,
    pub url: String,
    pub headers: Value,
    pub query: Value,
    pub body: Value,
}

/// The read-only context template expressions are evaluated against.
///
/// `oauth_response` is populated per contract after a token-acquisition
/// pre-step and is never shared across contracts.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub headers: Value,
    pub query: Value,
    pub body: Value,
    pub oauth_response: Option<Value>,
}

impl RequestContext {
    /// Build a context from an inbound request snapshot.
    pub fn from_snapshot(snapshot: &RequestSnapshot) -> Self {
        Self {
            headers: snapshot.headers.clone(),
            query: snapshot.query.clone(),
            body: snapshot.body.clone(),
            oauth_response: None,
        }
    }

    /// Return a copy of this context carrying an oauth response.
    pub fn with_oauth_response(&self, oauth_response: Value) -> Self {
        Self {
            headers: self.headers.clone(),
            query: self.query.clone(),
            body: self.body.clone(),
            oauth_response: Some(oauth_response),
        }
    }

    /// Select a context root by its template name.
    pub fn root(&self, name: &str) -> Option<&Value> {
        match name {
            "headers" => Some(&self.headers),
            "query" => Some(&self.query),
            "body" => Some(&self.body),
            "oauthResponse" => self.oauth_response.as_ref(),
            _ => None,
        }
    }
}

/// A fully resolved outbound HTTP call, ready for the transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// The response captured from a successful outbound call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundResponse {
    pub status: u16,
    pub headers: Value,
    pub body: Value,
}

/// A failed outbound call: transport errors and non-2xx statuses both land
/// here, distinguishable by `status`, carrying any response that was received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportFailure {
    pub message: String,
    /// HTTP status when the downstream answered with a non-2xx; `None` for
    /// pure transport failures (connect, timeout).
    pub status: Option<u16>,
    /// Short machine code, e.g. "timeout", "connect", "status".
    pub code: String,
    pub response: Option<OutboundResponse>,
}

/// Terminal result of one contract execution, forwarded to the notification
/// sink. Failures are values here, never panics or propagated errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractOutcome {
    pub contract_id: i64,
    pub contract_name: String,
    pub event_identifier: String,
    pub message: String,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn security_type_round_trips_snake_case() {
        assert_eq!(SecurityType::Oauth2Client.to_string(), "oauth2_client");
        assert_eq!(
            SecurityType::from_str("oauth2_client").unwrap(),
            SecurityType::Oauth2Client
        );
        assert_eq!(SecurityType::from_str("custom").unwrap(), SecurityType::Custom);
    }

    #[test]
    fn operation_kind_parses_all_variants() {
        for op in ["select", "new", "update", "delete", "process"] {
            assert_eq!(OperationKind::from_str(op).unwrap().to_string(), op);
        }
    }

    #[test]
    fn execution_state_terminality() {
        assert!(ExecutionState::Processed.is_terminal());
        assert!(ExecutionState::Error.is_terminal());
        assert!(!ExecutionState::Pending.is_terminal());
        assert!(!ExecutionState::Calling.is_terminal());
        assert!(!ExecutionState::TokenPending.is_terminal());
    }

    #[test]
    fn context_roots_resolve_by_name() {
        let snapshot = RequestSnapshot {
            method: "POST".into(),
            url: "/v1/events/order-created".into(),
            headers: serde_json::json!({"auth": "1"}),
            query: serde_json::json!({}),
            body: serde_json::json!({"id": 7}),
        };
        let ctx = RequestContext::from_snapshot(&snapshot);
        assert_eq!(ctx.root("headers").unwrap()["auth"], "1");
        assert_eq!(ctx.root("body").unwrap()["id"], 7);
        assert!(ctx.root("oauthResponse").is_none());
        assert!(ctx.root("cookies").is_none());

        let with_oauth = ctx.with_oauth_response(serde_json::json!({"body": {"access_token": "t"}}));
        assert_eq!(
            with_oauth.root("oauthResponse").unwrap()["body"]["access_token"],
            "t"
        );
        // The original context is untouched.
        assert!(ctx.root("oauthResponse").is_none());
    }

    #[test]
    fn event_contract_serializes_round_trip() {
        let contract = EventContract {
            contract_id: 1,
            contract_name: "order-to-billing".into(),
            exec_order: 0,
            event_id: 2,
            event_identifier: "order-created".into(),
            action_id: 3,
            action_name: "billing-charge".into(),
            call_template: "aa|.|bb".into(),
            security_type: SecurityType::Custom,
            token_template: None,
        };
        let json = serde_json::to_value(&contract).unwrap();
        assert_eq!(json["security_type"], "custom");
        let back: EventContract = serde_json::from_value(json).unwrap();
        assert_eq!(back.contract_name, "order-to-billing");
    }
}
