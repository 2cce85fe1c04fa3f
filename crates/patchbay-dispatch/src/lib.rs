// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The contract dispatch engine.
//!
//! Inbound event notifications flow gate -> resolver -> orchestrator: the
//! gate authenticates the caller, the resolver loads the bound contracts,
//! and the orchestrator executes them tier by tier, transforming the inbound
//! request into each action's outbound call and recording encrypted audit
//! snapshots along the way.

pub mod gate;
pub mod orchestrator;
pub mod resolver;
pub mod templates;
pub mod transport;

pub use gate::{EventGate, GateRejection};
pub use orchestrator::{DispatchError, Dispatcher, partition_tiers};
pub use resolver::resolve_contracts;
pub use templates::HttpCallTemplate;
pub use transport::HttpTransport;
