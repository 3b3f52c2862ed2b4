//! Single-member `allOf`/`anyOf`/`oneOf` collapse.
//!
//! A combinator with exactly one member constrains nothing; generators
//! nonetheless emit a wrapper type for it. The rule hoists the lone member's
//! attributes onto the parent schema and drops the keyword — provided no
//! attribute name is present on both sides with different values (structural
//! deep equality). A collision aborts the collapse for that keyword only.
//!
//! Hoisting intentionally includes `$ref`, producing the non-standard
//! "`$ref` with sibling keywords" shape some generators require. No check is
//! made for sibling keywords (`not`, ...) whose validation semantics the
//! collapse could alter — downstream consumers depend on the eager behavior.

use serde_json::Value;

use crate::error::NormalizeError;
use crate::walker::{walk_schema, Rule, WalkContext};

const OF_KEYWORDS: &[&str] = &["allOf", "anyOf", "oneOf"];

pub struct CollapseSingleOf;

impl Rule for CollapseSingleOf {
    fn name(&self) -> &'static str {
        "collapse-single-of"
    }

    fn visit_schema(&mut self, schema: Value, ctx: &WalkContext) -> Result<Value, NormalizeError> {
        let schema = walk_schema(self, schema, ctx)?;

        let Value::Object(mut obj) = schema else {
            return Ok(schema);
        };

        for keyword in OF_KEYWORDS {
            let single = match obj.get(*keyword) {
                Some(Value::Array(members)) if members.len() == 1 => members[0].clone(),
                _ => continue,
            };
            let Value::Object(child) = single else {
                continue;
            };

            // Any attribute present on both sides with a different value
            // aborts the collapse for this keyword. The keyword itself
            // participates: a child carrying its own `allOf` never equals
            // the parent's single-element wrapper, so it aborts too.
            let collision = child
                .iter()
                .any(|(k, v)| obj.get(k).is_some_and(|existing| existing != v));
            if collision {
                tracing::trace!(keyword, "collapse aborted by attribute collision");
                continue;
            }

            obj.remove(*keyword);
            for (k, v) in child {
                obj.entry(k).or_insert(v);
            }
        }

        Ok(Value::Object(obj))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
