// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal-outcome handling: structured logs, obfuscated failure mail.

pub mod mail;
pub mod obfuscate;
pub mod sink;

pub use mail::{Mailer, render_failure_mail};
pub use obfuscate::{obfuscate_object, obfuscate_str};
pub use sink::AuditNotifier;
