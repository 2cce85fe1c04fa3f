// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The audit/notification sink.
//!
//! Terminal per-contract outcomes arrive here after a dispatch run. Errors
//! are logged twice (message, then detail) and mailed when a mailer is
//! configured; successes are logged once. Nothing here ever blocks the
//! dispatch pipeline or alters an outcome -- mail problems are logged and
//! dropped.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use patchbay_config::model::MailConfig;
use patchbay_core::PatchbayError;
use patchbay_core::traits::NotificationSink;
use patchbay_core::types::ContractOutcome;

use crate::mail::{Mailer, render_failure_mail};

/// Upper bound on one SMTP delivery; a slow relay must not stall the sink.
const MAIL_TIMEOUT: Duration = Duration::from_secs(10);

/// Production [`NotificationSink`].
pub struct AuditNotifier {
    mailer: Option<Arc<Mailer>>,
    obfuscate_fields: String,
}

impl AuditNotifier {
    pub fn from_config(config: &MailConfig) -> Result<Self, PatchbayError> {
        Ok(Self {
            mailer: Mailer::from_config(config)?.map(Arc::new),
            obfuscate_fields: config.obfuscate_fields.clone(),
        })
    }

    /// A sink that only logs, regardless of mail configuration.
    pub fn log_only() -> Self {
        Self {
            mailer: None,
            obfuscate_fields: String::new(),
        }
    }
}

#[async_trait]
impl NotificationSink for AuditNotifier {
    async fn on_result(&self, outcome: &ContractOutcome) {
        let Some(error) = &outcome.error else {
            tracing::info!(
                contract = %outcome.contract_name,
                event = %outcome.event_identifier,
                "{}",
                outcome.message
            );
            return;
        };

        tracing::error!(
            contract = %outcome.contract_name,
            event = %outcome.event_identifier,
            "{}",
            outcome.message
        );
        tracing::error!(
            contract = %outcome.contract_name,
            detail = %error,
            "contract execution error"
        );

        if let Some(mailer) = &self.mailer {
            let subject = format!(
                "[patchbay] contract `{}` failed for event `{}`",
                outcome.contract_name, outcome.event_identifier
            );
            let html = render_failure_mail(outcome, &self.obfuscate_fields);
            match tokio::time::timeout(MAIL_TIMEOUT, mailer.send_html(&subject, html)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!(error = %e, "failed to send failure mail"),
                Err(_) => tracing::warn!(timeout = ?MAIL_TIMEOUT, "failure mail timed out"),
            }
        }
    }
}
