// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Patchbay integration relay.
//!
//! Provides the shared error type, domain types, and the trait seams the
//! dispatch engine uses to reach storage, outbound HTTP, credential
//! verification, and notification.

pub mod error;
pub mod traits;
pub mod types;

pub use error::PatchbayError;
pub use types::{
    ContractOutcome, EventContract, ExecutionState, OperationKind, RequestContext,
    RequestSnapshot, SecurityType,
};

pub use traits::{ActionTransport, NotificationSink, RelayStore, SecretVerifier};
