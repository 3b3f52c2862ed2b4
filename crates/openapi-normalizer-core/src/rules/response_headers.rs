//! Response header removal.
//!
//! Generators ignore response headers but choke on some of their shapes.
//! The rule strips the `headers` field from every Response reached — inline
//! under operations and inside the reusable-responses pool alike. The
//! standalone reusable-headers pool is a different node kind and is never
//! touched, even when referenced.

use serde_json::Value;

use crate::error::NormalizeError;
use crate::walker::{Rule, WalkContext};

pub struct RemoveResponseHeaders;

impl Rule for RemoveResponseHeaders {
    fn name(&self) -> &'static str {
        "remove-response-headers"
    }

    fn visit_response(&mut self, resp: Value, _ctx: &WalkContext) -> Result<Value, NormalizeError> {
        let Value::Object(mut obj) = resp else {
            return Ok(resp);
        };
        obj.remove("headers");
        Ok(Value::Object(obj))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
