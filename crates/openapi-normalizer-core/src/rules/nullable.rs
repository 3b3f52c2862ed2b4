//! Nullable-to-type-null rewrite.
//!
//! `nullable: true` (3.x) and the `x-nullable: true` extension (2.0) both
//! mean "this value may also be null". Generators that predate the flags
//! only understand the JSON-Schema spelling, a `"null"` entry in the `type`
//! list. The rule appends `"null"` — promoting a scalar `type` to a
//! two-element list, or extending an existing list when `"null"` is not
//! already present — and strips both flags. When `type` is absent the flags
//! are simply dropped: an unconstrained type already permits null.

use serde_json::{json, Value};

use crate::error::NormalizeError;
use crate::walker::{walk_schema, Rule, WalkContext};

pub struct NullableToTypeNull;

impl Rule for NullableToTypeNull {
    fn name(&self) -> &'static str {
        "nullable-to-type-null"
    }

    fn visit_schema(&mut self, schema: Value, ctx: &WalkContext) -> Result<Value, NormalizeError> {
        let schema = walk_schema(self, schema, ctx)?;

        let Value::Object(mut obj) = schema else {
            return Ok(schema);
        };

        let flagged = [obj.get("nullable"), obj.get("x-nullable")]
            .iter()
            .any(|flag| flag.and_then(Value::as_bool) == Some(true));
        if !flagged {
            return Ok(Value::Object(obj));
        }

        obj.remove("nullable");
        obj.remove("x-nullable");

        match obj.get_mut("type") {
            Some(Value::String(scalar)) => {
                let scalar = scalar.clone();
                obj.insert("type".to_string(), json!([scalar, "null"]));
            }
            Some(Value::Array(list)) => {
                if !list.iter().any(|t| t == "null") {
                    list.push(json!("null"));
                }
            }
            // Absent (or not a type at all): the flags alone are dropped.
            _ => {}
        }

        Ok(Value::Object(obj))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
