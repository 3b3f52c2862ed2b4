//! HTML response content removal.
//!
//! Generators cannot model an HTML body as a typed payload. In 3.x
//! documents, media-type entries keyed `text/html` (optionally with a
//! `; charset=...` suffix, case-insensitive) lose their `schema` and
//! `encoding`. In 2.0 the single response `schema` is shared across every
//! `produces` type, so partial removal would be unsound — the schema is
//! stripped only when the owning Operation's `produces` list is non-empty
//! and consists solely of HTML-matching types.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::error::NormalizeError;
use crate::version::SpecVersion;
use crate::walker::{walk_operation, Rule, WalkContext};

pub struct RemoveHtmlContent;

impl Rule for RemoveHtmlContent {
    fn name(&self) -> &'static str {
        "remove-html-content"
    }

    fn visit_operation(&mut self, op: Value, ctx: &WalkContext) -> Result<Value, NormalizeError> {
        if ctx.version == SpecVersion::V3 {
            // Responses (inline and pooled) are handled per-response.
            return walk_operation(self, op, ctx);
        }

        let Value::Object(mut obj) = op else {
            return Ok(op);
        };

        let all_html = obj
            .get("produces")
            .and_then(Value::as_array)
            .is_some_and(|produces| {
                !produces.is_empty()
                    && produces
                        .iter()
                        .all(|t| t.as_str().is_some_and(is_html_media_type))
            });
        if all_html {
            tracing::debug!("stripping response schemas from HTML-only operation");
            if let Some(Value::Object(responses)) = obj.get_mut("responses") {
                for resp in responses.values_mut() {
                    if let Some(resp) = resp.as_object_mut() {
                        resp.remove("schema");
                    }
                }
            }
        }
        Ok(Value::Object(obj))
    }

    fn visit_response(&mut self, resp: Value, ctx: &WalkContext) -> Result<Value, NormalizeError> {
        if ctx.version == SpecVersion::V2 {
            // v2 removal needs the owning Operation's `produces`.
            return Ok(resp);
        }

        let Value::Object(mut obj) = resp else {
            return Ok(resp);
        };
        if let Some(Value::Object(content)) = obj.get_mut("content") {
            for (media_type, entry) in content.iter_mut() {
                if !is_html_media_type(media_type) {
                    continue;
                }
                if let Some(entry) = entry.as_object_mut() {
                    tracing::debug!(media_type = %media_type, "stripping HTML media-type schema");
                    entry.remove("schema");
                    entry.remove("encoding");
                }
            }
        }
        Ok(Value::Object(obj))
    }
}

fn is_html_media_type(media_type: &str) -> bool {
    static HTML: OnceLock<Regex> = OnceLock::new();
    HTML.get_or_init(|| {
        Regex::new(r"(?i)^\s*text/html\s*(?:;\s*charset\s*=[^;]*)?\s*$").expect("static pattern")
    })
    .is_match(media_type)
}

// ===========================================================================
// Tests
// ===========================================================================
