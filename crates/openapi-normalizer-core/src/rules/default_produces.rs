//! `produces` cleanup for default-only operations (2.0 only).
//!
//! A 2.0 Operation whose `responses` map holds exactly the single key
//! `"default"` describes an untyped catch-all; generators misread an
//! inherited document-level `produces` there. Forcing `produces: []` on the
//! operation overrides the document default, per the 2.0 spec.
//!
//! The equivalent 3.x rewrite would have to delete per-response `content`
//! schemas, so the rule refuses to run on anything but a 2.0 document.

use serde_json::{json, Value};

use crate::error::NormalizeError;
use crate::version::SpecVersion;
use crate::walker::{walk_document, Rule, WalkContext};

pub struct RemoveDefaultOnlyProduces;

impl Rule for RemoveDefaultOnlyProduces {
    fn name(&self) -> &'static str {
        "remove-default-only-produces"
    }

    fn visit_document(&mut self, doc: Value, ctx: &WalkContext) -> Result<Value, NormalizeError> {
        if ctx.version != SpecVersion::V2 {
            return Err(NormalizeError::VersionMismatch {
                rule: self.name(),
                expected: SpecVersion::V2,
                found: ctx.version,
            });
        }
        walk_document(self, doc, ctx)
    }

    fn visit_operation(&mut self, op: Value, _ctx: &WalkContext) -> Result<Value, NormalizeError> {
        let Value::Object(mut obj) = op else {
            return Ok(op);
        };

        let default_only = obj
            .get("responses")
            .and_then(Value::as_object)
            .is_some_and(|r| r.len() == 1 && r.contains_key("default"));
        if default_only {
            obj.insert("produces".to_string(), json!([]));
        }

        Ok(Value::Object(obj))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
