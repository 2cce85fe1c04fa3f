// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The decrypted HTTP call template and its resolution into an outbound
//! request.
//!
//! Action rows store this shape encrypted as JSON. Token-request templates
//! for oauth2_client actions use the same shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use patchbay_core::types::{OutboundRequest, RequestContext};
use patchbay_template::{FieldKind, resolve, resolve_body, resolve_map};

/// An action's HTTP call, with template expressions still embedded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpCallTemplate {
    pub url: String,
    pub method: String,
    #[serde(default)]
    pub headers: Map<String, Value>,
    #[serde(default)]
    pub params: Map<String, Value>,
    /// Body template. `{}` means "no declared shape": the inbound request
    /// body passes through unmodified. `null` sends no body at all.
    #[serde(default)]
    pub data: Value,
}

impl HttpCallTemplate {
    /// Parse a decrypted template JSON string.
    pub fn from_json(json: &str) -> Result<Self, patchbay_core::PatchbayError> {
        serde_json::from_str(json).map_err(|e| {
            patchbay_core::PatchbayError::Template(format!("call template is not valid JSON: {e}"))
        })
    }

    /// Resolve every template expression against the request context,
    /// producing the concrete outbound call.
    pub fn resolve(&self, ctx: &RequestContext) -> OutboundRequest {
        let url = value_to_text(resolve(&self.url, ctx, FieldKind::Param));
        let headers = flatten(resolve_map(&self.headers, ctx, FieldKind::Header));
        let query = flatten(resolve_map(&self.params, ctx, FieldKind::Param));

        let body = if self.data.is_null() {
            None
        } else if self.data == Value::Object(Map::new()) {
            // Pass-through: the action declares no body shape of its own.
            Some(ctx.body.clone())
        } else {
            Some(resolve_body(&self.data, ctx))
        };

        OutboundRequest {
            method: self.method.clone(),
            url,
            headers,
            query,
            body,
        }
    }
}

/// Collapse a resolved header/param map into wire pairs.
fn flatten(map: Map<String, Value>) -> Vec<(String, String)> {
    map.into_iter()
        .map(|(key, value)| (key, value_to_text(value)))
        .collect()
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
