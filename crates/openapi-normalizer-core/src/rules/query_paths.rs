//! Query-string path relocation.
//!
//! Path keys carrying a literal `?` express query-parameterized paths, a
//! common but non-standard shape that generators reject. Matching entries
//! move from `paths` into the `x-ms-paths` extension map (created on
//! demand). `paths` remains present — as `{}` if emptied — since it is a
//! required document field. A key already present in the extension map is a
//! fatal collision: partial application would leave an inconsistent
//! document.

use serde_json::{Map, Value};

use crate::error::NormalizeError;
use crate::walker::{Rule, WalkContext};

pub struct MoveQueryPaths;

impl Rule for MoveQueryPaths {
    fn name(&self) -> &'static str {
        "move-query-paths"
    }

    // Only `paths` is relevant; every other top-level field is copied
    // verbatim by returning the document wholesale.
    fn visit_document(&mut self, doc: Value, _ctx: &WalkContext) -> Result<Value, NormalizeError> {
        let Value::Object(mut obj) = doc else {
            return Ok(doc);
        };

        // Identity fast-path: no query-string keys, nothing to rebuild.
        let has_query_key = obj
            .get("paths")
            .and_then(Value::as_object)
            .is_some_and(|paths| paths.keys().any(|k| k.contains('?')));
        if !has_query_key {
            return Ok(Value::Object(obj));
        }

        // An extension map that exists but is not a mapping is structurally
        // unsafe to merge into — leave the document untouched.
        if obj.get("x-ms-paths").is_some_and(|v| !v.is_object()) {
            return Ok(Value::Object(obj));
        }

        // `take` leaves a null placeholder so each key keeps its slot.
        let paths = match obj.get_mut("paths").map(Value::take) {
            Some(Value::Object(map)) => map,
            _ => return Ok(Value::Object(obj)),
        };
        let mut extension = match obj.get_mut("x-ms-paths").map(Value::take) {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };

        let mut kept = Map::new();
        for (key, item) in paths {
            if key.contains('?') {
                if extension.contains_key(&key) {
                    return Err(NormalizeError::PathCollision { path: key });
                }
                tracing::debug!(path = %key, "moving query path to x-ms-paths");
                extension.insert(key, item);
            } else {
                kept.insert(key, item);
            }
        }

        obj.insert("paths".to_string(), Value::Object(kept));
        obj.insert("x-ms-paths".to_string(), Value::Object(extension));
        Ok(Value::Object(obj))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
