// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Failure mail rendering and SMTP delivery.
//!
//! The mailer only ever receives already-obfuscated content.

use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde_json::Value;

use patchbay_config::model::MailConfig;
use patchbay_core::PatchbayError;
use patchbay_core::types::ContractOutcome;

use crate::obfuscate::{obfuscate_object, obfuscate_str};

/// Render the HTML failure mail for one contract outcome, with sensitive
/// fields masked.
pub fn render_failure_mail(outcome: &ContractOutcome, obfuscate_fields: &str) -> String {
    let error_raw = outcome.error.as_deref().unwrap_or("unknown error");
    // A detail that embeds a JSON object is masked structurally; anything
    // else is masked as name=value text.
    let detail = match serde_json::from_str::<Value>(error_raw) {
        Ok(value @ Value::Object(_)) => obfuscate_object(obfuscate_fields, &value).to_string(),
        _ => obfuscate_str(obfuscate_fields, error_raw),
    };

    format!(
        "<html><body>\
         <h2>Contract execution failed</h2>\
         <p><strong>Event:</strong> {event}</p>\
         <p><strong>Contract:</strong> {contract}</p>\
         <p>{message}</p>\
         <pre>{detail}</pre>\
         <p><small>{at}</small></p>\
         </body></html>",
        event = escape_html(&outcome.event_identifier),
        contract = escape_html(&outcome.contract_name),
        message = escape_html(&outcome.message),
        detail = escape_html(&detail),
        at = chrono::Utc::now().to_rfc3339(),
    )
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Async SMTP mailer for failure notifications.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl Mailer {
    /// Build a mailer from configuration. Returns `None` when mail is
    /// disabled.
    pub fn from_config(config: &MailConfig) -> Result<Option<Self>, PatchbayError> {
        if !config.enabled {
            return Ok(None);
        }

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| PatchbayError::Mail {
                message: format!("invalid SMTP relay `{}`: {e}", config.smtp_host),
                source: Some(Box::new(e)),
            })?
            .port(config.smtp_port);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let from = parse_mailbox("mail.from", &config.from)?;
        let to = parse_mailbox("mail.to", &config.to)?;

        Ok(Some(Self {
            transport: builder.build(),
            from,
            to,
        }))
    }

    /// Deliver an HTML body.
    pub async fn send_html(&self, subject: &str, html: String) -> Result<(), PatchbayError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html)
            .map_err(|e| PatchbayError::Mail {
                message: format!("failed to build failure mail: {e}"),
                source: Some(Box::new(e)),
            })?;

        self.transport
            .send(message)
            .await
            .map_err(|e| PatchbayError::Mail {
                message: format!("SMTP delivery failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(())
    }
}

fn parse_mailbox(key: &str, raw: &str) -> Result<Mailbox, PatchbayError> {
    raw.parse::<Mailbox>().map_err(|e| PatchbayError::Mail {
        message: format!("{key} `{raw}` is not a valid address: {e}"),
        source: Some(Box::new(e)),
    })
}
