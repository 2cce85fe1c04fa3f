// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! At-rest encryption for Patchbay.
//!
//! Action call templates, token-request templates, and every audit snapshot
//! are stored encrypted. This crate provides the [`Codec`] that seals and
//! opens those strings with AES-256-GCM under a process-wide key derived
//! once at startup via Argon2id.

pub mod codec;
pub mod crypto;
pub mod kdf;

pub use codec::Codec;
