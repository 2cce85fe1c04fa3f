// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Placeholder scanning and path evaluation.

use patchbay_core::RequestContext;
use serde_json::{Map, Value};
use strum::{Display, EnumString};

/// Where a template string sits in the outbound call.
///
/// Only [`Data`](FieldKind::Data) changes resolution behavior: a body field
/// that is exactly one placeholder substitutes the evaluated value typed
/// as-is instead of stringifying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum FieldKind {
    Header,
    Param,
    Data,
}

/// Resolve every `${...}` occurrence in a template string.
///
/// Returns a typed value only for a data-kind template that is a single
/// placeholder spanning the whole string; every other input resolves to a
/// string with placeholders substituted in place.
pub fn resolve(template: &str, ctx: &RequestContext, kind: FieldKind) -> Value {
    if kind == FieldKind::Data
        && let Some(path) = whole_placeholder(template)
    {
        return eval_path(path, ctx).cloned().unwrap_or(Value::Null);
    }
    Value::String(resolve_text(template, ctx))
}

/// Resolve the string values of a flat template object (headers or query
/// params). Non-string values pass through unchanged.
pub fn resolve_map(
    template: &Map<String, Value>,
    ctx: &RequestContext,
    kind: FieldKind,
) -> Map<String, Value> {
    template
        .iter()
        .map(|(key, value)| match value {
            Value::String(s) => (key.clone(), resolve(s, ctx, kind)),
            other => (key.clone(), other.clone()),
        })
        .collect()
}

/// Recursively resolve a nested body template.
///
/// Strings resolve with data kind (so a lone placeholder can substitute any
/// JSON value for the whole field); objects recurse field-by-field; arrays
/// and non-string scalars pass through unchanged.
pub fn resolve_body(template: &Value, ctx: &RequestContext) -> Value {
    match template {
        Value::String(s) => resolve(s, ctx, FieldKind::Data),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), resolve_body(value, ctx)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// If the template is exactly one `${...}` window, return its path.
fn whole_placeholder(template: &str) -> Option<&str> {
    let inner = template.strip_prefix("${")?.strip_suffix('}')?;
    // A second opener means the string is a concatenation, not one window.
    if inner.contains("${") {
        return None;
    }
    Some(inner)
}

/// Substitute every placeholder in the template, scanning left to right and
/// continuing from just past each replacement.
fn resolve_text(template: &str, ctx: &RequestContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let window = &rest[start + 2..];
        let Some(end) = window.find('}') else {
            // Unterminated window: keep the tail literally.
            out.push_str(&rest[start..]);
            return out;
        };

        let substituted = match eval_path(&window[..end], ctx) {
            Some(Value::String(s)) => s.clone(),
            // Non-string values are JSON-encoded into the surrounding text;
            // an unmatched path renders as `null`.
            Some(value) => value.to_string(),
            None => Value::Null.to_string(),
        };
        out.push_str(&substituted);
        rest = &window[end + 1..];
    }

    out.push_str(rest);
    out
}

/// Evaluate a dot-separated path against the context.
///
/// The first segment picks the context root; the rest index into JSON
/// objects by literal key, or into arrays by numeric position.
fn eval_path<'a>(path: &str, ctx: &'a RequestContext) -> Option<&'a Value> {
    let mut segments = path.split('.').filter(|s| !s.is_empty());
    let root = segments.next()?;
    let mut current = ctx.root(root)?;

    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx(headers: Value, query: Value, body: Value) -> RequestContext {
        RequestContext {
            headers,
            query,
            body,
            oauth_response: None,
        }
    }

    #[test]
    fn header_path_resolves_to_its_string_value() {
        let ctx = ctx(json!({"test": "1"}), json!({}), json!({}));
        assert_eq!(
            resolve("${.headers.test}", &ctx, FieldKind::Param),
            json!("1")
        );
    }

    #[test]
    fn hyphenated_segment_with_object_value_stringifies() {
        let ctx = ctx(json!({}), json!({}), json!({"test-two": {"test": 1}}));
        assert_eq!(
            resolve("${.body.test-two}", &ctx, FieldKind::Param),
            json!(r#"{"test":1}"#)
        );
    }

    #[test]
    fn literal_string_is_returned_unchanged() {
        let ctx = ctx(json!({}), json!({}), json!({}));
        assert_eq!(
            resolve("no placeholders here", &ctx, FieldKind::Header),
            json!("no placeholders here")
        );
    }

    #[test]
    fn data_kind_whole_placeholder_keeps_value_typed() {
        let ctx = ctx(json!({}), json!({}), json!({"count": 7, "user": {"id": 3}}));
        assert_eq!(resolve("${.body.count}", &ctx, FieldKind::Data), json!(7));
        assert_eq!(
            resolve("${.body.user}", &ctx, FieldKind::Data),
            json!({"id": 3})
        );
    }

    #[test]
    fn data_kind_embedded_placeholder_still_stringifies() {
        let ctx = ctx(json!({}), json!({}), json!({"count": 7}));
        assert_eq!(
            resolve("total=${.body.count}", &ctx, FieldKind::Data),
            json!("total=7")
        );
    }

    #[test]
    fn multiple_placeholders_in_one_template() {
        let ctx = ctx(
            json!({"auth": "abc"}),
            json!({"page": 2}),
            json!({}),
        );
        assert_eq!(
            resolve("key=${.headers.auth}&page=${.query.page}", &ctx, FieldKind::Param),
            json!("key=abc&page=2")
        );
    }

    #[test]
    fn unmatched_path_renders_null() {
        let ctx = ctx(json!({}), json!({}), json!({}));
        assert_eq!(
            resolve("${.body.missing}", &ctx, FieldKind::Data),
            Value::Null
        );
        assert_eq!(
            resolve("value=${.body.missing}", &ctx, FieldKind::Param),
            json!("value=null")
        );
    }

    #[test]
    fn unterminated_window_is_kept_literally() {
        let ctx = ctx(json!({"a": "1"}), json!({}), json!({}));
        assert_eq!(
            resolve("${.headers.a} and ${broken", &ctx, FieldKind::Param),
            json!("1 and ${broken")
        );
    }

    #[test]
    fn two_placeholders_are_not_one_whole_window() {
        let ctx = ctx(json!({}), json!({}), json!({"a": 1, "b": 2}));
        assert_eq!(
            resolve("${.body.a}${.body.b}", &ctx, FieldKind::Data),
            json!("12")
        );
    }

    #[test]
    fn array_segments_index_numerically() {
        let ctx = ctx(json!({}), json!({}), json!({"items": [{"sku": "x-1"}]}));
        assert_eq!(
            resolve("${.body.items.0.sku}", &ctx, FieldKind::Data),
            json!("x-1")
        );
    }

    #[test]
    fn oauth_response_root_is_addressable() {
        let base = ctx(json!({}), json!({}), json!({}));
        let ctx = base.with_oauth_response(json!({"body": {"access_token": "tok"}}));
        assert_eq!(
            resolve("Bearer ${.oauthResponse.body.access_token}", &ctx, FieldKind::Header),
            json!("Bearer tok")
        );
    }

    #[test]
    fn resolve_map_touches_only_string_values() {
        let ctx = ctx(json!({"auth": "k"}), json!({}), json!({}));
        let template = json!({
            "authorization": "${.headers.auth}",
            "x-static": "fixed",
            "x-count": 3,
        });
        let resolved = resolve_map(template.as_object().unwrap(), &ctx, FieldKind::Header);
        assert_eq!(resolved["authorization"], json!("k"));
        assert_eq!(resolved["x-static"], json!("fixed"));
        assert_eq!(resolved["x-count"], json!(3));
    }

    #[test]
    fn resolve_body_recurses_objects_and_skips_arrays() {
        let ctx = ctx(
            json!({}),
            json!({}),
            json!({"user": {"id": 9}, "tag": "vip"}),
        );
        let template = json!({
            "customer": {"id": "${.body.user.id}", "tier": "${.body.tag}"},
            "fixed": [1, "${.body.tag}", 3],
            "flag": true,
        });
        let resolved = resolve_body(&template, &ctx);
        assert_eq!(resolved["customer"]["id"], json!(9));
        assert_eq!(resolved["customer"]["tier"], json!("vip"));
        // Arrays pass through untouched, placeholder and all.
        assert_eq!(resolved["fixed"], json!([1, "${.body.tag}", 3]));
        assert_eq!(resolved["flag"], json!(true));
    }
}
