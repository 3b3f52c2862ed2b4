//! Empty-array branch removal from `anyOf`/`oneOf`.
//!
//! Some emitters express "optionally absent list" as a union with an
//! always-empty array (`type: array`, `maxItems: 0`). Generators turn each
//! union member into a variant type, so the degenerate branch produces an
//! unusable empty-list type. The rule filters such members out. When the
//! filtered list holds exactly one member and the keyword was the schema's
//! only key, the schema is replaced by that member outright.

use serde_json::Value;

use crate::error::NormalizeError;
use crate::walker::{walk_schema, Rule, WalkContext};

pub struct PruneEmptyArrayBranches;

impl Rule for PruneEmptyArrayBranches {
    fn name(&self) -> &'static str {
        "prune-empty-array-branches"
    }

    fn visit_schema(&mut self, schema: Value, ctx: &WalkContext) -> Result<Value, NormalizeError> {
        let schema = walk_schema(self, schema, ctx)?;

        let Value::Object(mut obj) = schema else {
            return Ok(schema);
        };

        for keyword in ["anyOf", "oneOf"] {
            let Some(Value::Array(members)) = obj.get(keyword) else {
                continue;
            };
            if !members.iter().any(is_empty_array) {
                continue;
            }

            let filtered: Vec<Value> = members
                .iter()
                .filter(|m| !is_empty_array(m))
                .cloned()
                .collect();
            tracing::debug!(
                keyword,
                removed = members.len() - filtered.len(),
                "pruned empty-array branches"
            );

            // A lone survivor under the schema's only key replaces the
            // schema entirely.
            if filtered.len() == 1 && obj.len() == 1 {
                return Ok(filtered.into_iter().next().unwrap_or(Value::Null));
            }

            obj.insert(keyword.to_string(), Value::Array(filtered));
        }

        Ok(Value::Object(obj))
    }
}

fn is_empty_array(member: &Value) -> bool {
    let Some(obj) = member.as_object() else {
        return false;
    };
    obj.get("type").and_then(Value::as_str) == Some("array")
        && obj.get("maxItems").and_then(Value::as_u64) == Some(0)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walker::apply;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn run_schema(schema: Value) -> Value {
        let doc = json!({
            "openapi": "3.0.3",
            "components": { "schemas": { "s": schema } }
        });
        let result = apply(&mut PruneEmptyArrayBranches, &doc).unwrap();
        result["components"]["schemas"]["s"].clone()
    }

    #[test]
    fn test_empty_array_member_removed() {
        assert_eq!(
            run_schema(json!({
                "description": "maybe a list",
                "anyOf": [
                    { "type": "array", "items": { "type": "string" } },
                    { "type": "array", "maxItems": 0 }
                ]
            })),
            json!({
                "description": "maybe a list",
                "anyOf": [
                    { "type": "array", "items": { "type": "string" } }
                ]
            })
        );
    }

    #[test]
    fn test_lone_survivor_replaces_schema() {
        assert_eq!(
            run_schema(json!({
                "oneOf": [
                    { "type": "string" },
                    { "type": "array", "maxItems": 0 }
                ]
            })),
            json!({ "type": "string" })
        );
    }

    #[test]
    fn test_survivor_kept_in_list_when_other_keys_exist() {
        assert_eq!(
            run_schema(json!({
                "title": "t",
                "oneOf": [
                    { "type": "string" },
                    { "type": "array", "maxItems": 0 }
                ]
            })),
            json!({ "title": "t", "oneOf": [{ "type": "string" }] })
        );
    }

    #[test]
    fn test_nonzero_max_items_kept() {
        let schema = json!({
            "anyOf": [
                { "type": "array", "maxItems": 1 },
                { "type": "string" }
            ]
        });
        assert_eq!(run_schema(schema.clone()), schema);
    }

    #[test]
    fn test_all_members_pruned_leaves_empty_list() {
        assert_eq!(
            run_schema(json!({
                "anyOf": [
                    { "type": "array", "maxItems": 0 },
                    { "type": "array", "maxItems": 0 }
                ]
            })),
            json!({ "anyOf": [] })
        );
    }

    #[test]
    fn test_allof_not_filtered() {
        let schema = json!({
            "allOf": [
                { "type": "array", "maxItems": 0 },
                { "type": "object" }
            ]
        });
        assert_eq!(run_schema(schema.clone()), schema);
    }

    #[test]
    fn test_idempotent() {
        let doc = json!({
            "openapi": "3.0.3",
            "components": {
                "schemas": {
                    "A": {
                        "oneOf": [
                            { "type": "string" },
                            { "type": "array", "maxItems": 0 }
                        ]
                    }
                }
            }
        });
        let once = apply(&mut PruneEmptyArrayBranches, &doc).unwrap();
        let twice = apply(&mut PruneEmptyArrayBranches, &once).unwrap();
        assert_eq!(once, twice);
    }
}
