// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams toward the relay's external collaborators.
//!
//! The dispatch engine only ever talks to storage, HTTP, secret
//! verification, and notification through these traits, so tests can swap
//! in controllable fakes.

pub mod notify;
pub mod store;
pub mod transport;
pub mod verify;

pub use notify::NotificationSink;
pub use store::RelayStore;
pub use transport::ActionTransport;
pub use verify::SecretVerifier;
