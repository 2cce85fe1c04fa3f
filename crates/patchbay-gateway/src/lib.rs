// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Patchbay relay.

pub mod handlers;
pub mod server;

pub use server::{BindConfig, GatewayState, build_router, start_server};
