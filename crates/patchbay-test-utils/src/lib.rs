// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic fakes for exercising the Patchbay dispatch engine without
//! a database, network, or real credentials.

pub mod memory_store;
pub mod mock_transport;
pub mod mock_verifier;
pub mod recording_sink;

pub use memory_store::{DetailRecord, MemoryStore, ReceivedRecord, TryRecord};
pub use mock_transport::{MockTransport, RecordedCall};
pub use mock_verifier::MockVerifier;
pub use recording_sink::RecordingSink;
