// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sensitive-field masking for outbound mail payloads.
//!
//! Field lists are comma-separated, whitespace-trimmed names. Matched values
//! are replaced with a fixed mask; everything else passes through untouched.

use regex::Regex;
use serde_json::Value;

/// The masking placeholder.
const MASK: &str = "****";

/// Split a raw comma-separated field list into trimmed, non-empty names.
fn parse_fields(raw_fields: &str) -> Vec<&str> {
    raw_fields
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect()
}

/// Mask `name=value` pairs for each listed field inside a string payload.
///
/// `obfuscate_str("auth", "auth=5265")` yields `"auth=****"`. Values end at
/// `&` or whitespace, so query strings keep their shape.
pub fn obfuscate_str(raw_fields: &str, input: &str) -> String {
    let mut result = input.to_string();
    for field in parse_fields(raw_fields) {
        let Ok(pattern) = Regex::new(&format!(r"(\b{}=)([^&\s]*)", regex::escape(field))) else {
            continue;
        };
        result = pattern.replace_all(&result, format!("${{1}}{MASK}")).to_string();
    }
    result
}

/// Replace the values of listed top-level keys in an object payload.
///
/// Non-object payloads are returned untouched.
pub fn obfuscate_object(raw_fields: &str, payload: &Value) -> Value {
    let Value::Object(map) = payload else {
        return payload.clone();
    };
    let fields = parse_fields(raw_fields);
    Value::Object(
        map.iter()
            .map(|(key, value)| {
                if fields.contains(&key.as_str()) {
                    (key.clone(), Value::String(MASK.to_string()))
                } else {
                    (key.clone(), value.clone())
                }
            })
            .collect(),
    )
}
