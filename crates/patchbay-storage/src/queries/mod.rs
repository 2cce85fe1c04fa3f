// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per entity family.

pub mod actions;
pub mod audit;
pub mod clients;
pub mod contracts;
pub mod events;
pub mod systems;
