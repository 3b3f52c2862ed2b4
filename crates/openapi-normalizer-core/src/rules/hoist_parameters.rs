//! PathItem parameter hoisting.
//!
//! Generators share parameters through the document's reusable pool, not
//! through PathItem-level `parameters` sequences. Each inline parameter
//! found there is promoted into the pool — keyed by its `name` — and
//! replaced in place by a `$ref` to the pool entry. Parameters that are
//! already `$ref` nodes are left untouched.
//!
//! The pool location and pointer prefix follow the document version:
//! top-level `parameters` / `#/parameters/` in 2.0, nested
//! `components.parameters` / `#/components/parameters/` in 3.x. A pool
//! entry that already exists under the same name must be structurally
//! identical to the incoming parameter; a differently-shaped redefinition
//! is fatal.
//!
//! All pool state lives in this single `visit_document` call — nothing is
//! retained on the rule between invocations.

use serde_json::{json, Map, Value};

use crate::error::NormalizeError;
use crate::version::SpecVersion;
use crate::walker::{Rule, WalkContext};

pub struct HoistPathParameters;

impl Rule for HoistPathParameters {
    fn name(&self) -> &'static str {
        "hoist-path-parameters"
    }

    fn visit_document(&mut self, doc: Value, ctx: &WalkContext) -> Result<Value, NormalizeError> {
        let Value::Object(mut obj) = doc else {
            return Ok(doc);
        };

        let ref_prefix = match ctx.version {
            SpecVersion::V2 => "#/parameters/",
            SpecVersion::V3 => "#/components/parameters/",
        };

        // Seed the working pool with the existing entries so redefinitions
        // of already-pooled names are caught.
        let mut pool = existing_pool(&obj, ctx.version);
        let mut hoisted = false;

        for paths_key in ["paths", "x-ms-paths"] {
            let Some(Value::Object(paths)) = obj.get_mut(paths_key) else {
                continue;
            };
            for item in paths.values_mut() {
                let Some(item) = item.as_object_mut() else {
                    continue;
                };
                if item.contains_key("$ref") {
                    continue;
                }
                let Some(Value::Array(params)) = item.get_mut("parameters") else {
                    continue;
                };
                for param in params.iter_mut() {
                    let Some(fields) = param.as_object() else {
                        continue;
                    };
                    if fields.contains_key("$ref") {
                        continue; // already shareable
                    }
                    let Some(name) = fields.get("name").and_then(Value::as_str) else {
                        continue; // unnamed parameter: structurally unsafe
                    };

                    match pool.get(name) {
                        Some(existing) if existing != param => {
                            return Err(NormalizeError::ParameterCollision {
                                name: name.to_string(),
                            });
                        }
                        Some(_) => {}
                        None => {
                            tracing::debug!(name, "hoisting path-item parameter");
                            pool.insert(name.to_string(), param.clone());
                        }
                    }
                    let pointer = json!({ "$ref": format!("{ref_prefix}{name}") });
                    *param = pointer;
                    hoisted = true;
                }
            }
        }

        if hoisted {
            store_pool(&mut obj, ctx.version, pool);
        }
        Ok(Value::Object(obj))
    }
}

/// Clone the version-appropriate reusable-parameters pool, if any.
fn existing_pool(doc: &Map<String, Value>, version: SpecVersion) -> Map<String, Value> {
    let pool = match version {
        SpecVersion::V2 => doc.get("parameters"),
        SpecVersion::V3 => doc.get("components").and_then(|c| c.get("parameters")),
    };
    match pool {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    }
}

/// Write the pool back, creating the containing section on demand.
fn store_pool(doc: &mut Map<String, Value>, version: SpecVersion, pool: Map<String, Value>) {
    match version {
        SpecVersion::V2 => {
            doc.insert("parameters".to_string(), Value::Object(pool));
        }
        SpecVersion::V3 => {
            let components = doc
                .entry("components")
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(components) = components {
                components.insert("parameters".to_string(), Value::Object(pool));
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
