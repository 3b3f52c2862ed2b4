//! Document traversal via per-kind visit dispatch.
//!
//! Provides [`Rule`] — a trait with one visit method per document node kind
//! (Document, PathsMap, PathItem, Operation, Parameter, Response, MediaType,
//! Schema, Components, Header) — and a family of `walk_*` driver functions
//! that perform the default structural recursion for each kind. Every visit
//! method defaults to its driver, so a rule only overrides the kinds it
//! cares about and inherits plain rebuild-and-recurse everywhere else.
//!
//! Drivers rebuild containers key by key, leaving unrecognized keys (and
//! their relative order) untouched. A mapping that carries `$ref` is opaque:
//! drivers never descend beneath it, though the visit method for its kind is
//! still invoked so a rule may rewrite the pointer or its siblings.
//!
//! An override that wants bottom-up composition calls its driver first and
//! transforms the rebuilt node; an override may equally skip recursion
//! entirely when only one substructure is relevant.

use serde_json::{Map, Value};

use crate::error::NormalizeError;
use crate::version::SpecVersion;

/// HTTP method keys that mark a PathItem entry as an Operation.
pub const HTTP_METHODS: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Per-invocation traversal state.
///
/// Constructed by [`apply`] at the start of one rule application and
/// discarded at the end — rules must not retain state across invocations.
#[derive(Debug, Clone, Copy)]
pub struct WalkContext {
    /// Detected version of the document being walked.
    pub version: SpecVersion,
}

/// A normalization rule.
///
/// Implementations override the visit methods for the node kinds they
/// transform; unimplemented kinds fall back to the structural drivers.
pub trait Rule {
    /// Stable kebab-case identifier, used in logs and error messages.
    fn name(&self) -> &'static str;

    fn visit_document(&mut self, doc: Value, ctx: &WalkContext) -> Result<Value, NormalizeError> {
        walk_document(self, doc, ctx)
    }

    fn visit_paths(&mut self, paths: Value, ctx: &WalkContext) -> Result<Value, NormalizeError> {
        walk_paths(self, paths, ctx)
    }

    fn visit_path_item(&mut self, item: Value, ctx: &WalkContext) -> Result<Value, NormalizeError> {
        walk_path_item(self, item, ctx)
    }

    fn visit_operation(&mut self, op: Value, ctx: &WalkContext) -> Result<Value, NormalizeError> {
        walk_operation(self, op, ctx)
    }

    fn visit_parameter(&mut self, param: Value, ctx: &WalkContext) -> Result<Value, NormalizeError> {
        walk_parameter(self, param, ctx)
    }

    fn visit_response(&mut self, resp: Value, ctx: &WalkContext) -> Result<Value, NormalizeError> {
        walk_response(self, resp, ctx)
    }

    fn visit_media_type(&mut self, media: Value, ctx: &WalkContext) -> Result<Value, NormalizeError> {
        walk_media_type(self, media, ctx)
    }

    fn visit_schema(&mut self, schema: Value, ctx: &WalkContext) -> Result<Value, NormalizeError> {
        walk_schema(self, schema, ctx)
    }

    fn visit_components(&mut self, comps: Value, ctx: &WalkContext) -> Result<Value, NormalizeError> {
        walk_components(self, comps, ctx)
    }

    fn visit_header(&mut self, header: Value, ctx: &WalkContext) -> Result<Value, NormalizeError> {
        walk_header(self, header, ctx)
    }
}

/// Apply a rule to a document: `transform(document) -> document`.
///
/// Detects the document version, builds the per-invocation [`WalkContext`],
/// and dispatches a clone of the root to the rule's Document operation. The
/// caller's tree is never mutated.
pub fn apply<R: Rule + ?Sized>(rule: &mut R, document: &Value) -> Result<Value, NormalizeError> {
    let ctx = WalkContext {
        version: SpecVersion::detect(document)?,
    };
    tracing::debug!(rule = rule.name(), version = %ctx.version, "applying rule");
    rule.visit_document(document.clone(), &ctx)
}

// ---------------------------------------------------------------------------
// Drivers — default structural recursion per node kind
// ---------------------------------------------------------------------------

/// Visit every value of a mapping with the given visit method, preserving
/// keys and key order. Non-mapping values pass through unchanged.
fn walk_map_values<R: Rule + ?Sized>(
    rule: &mut R,
    value: Value,
    ctx: &WalkContext,
    visit: fn(&mut R, Value, &WalkContext) -> Result<Value, NormalizeError>,
) -> Result<Value, NormalizeError> {
    let Value::Object(map) = value else {
        return Ok(value);
    };
    let mut out = Map::with_capacity(map.len());
    for (key, val) in map {
        out.insert(key, visit(rule, val, ctx)?);
    }
    Ok(Value::Object(out))
}

/// Visit every element of a sequence with the given visit method.
/// Non-sequence values pass through unchanged.
fn walk_seq_elements<R: Rule + ?Sized>(
    rule: &mut R,
    value: Value,
    ctx: &WalkContext,
    visit: fn(&mut R, Value, &WalkContext) -> Result<Value, NormalizeError>,
) -> Result<Value, NormalizeError> {
    let Value::Array(arr) = value else {
        return Ok(value);
    };
    let mut out = Vec::with_capacity(arr.len());
    for val in arr {
        out.push(visit(rule, val, ctx)?);
    }
    Ok(Value::Array(out))
}

fn is_ref(obj: &Map<String, Value>) -> bool {
    obj.contains_key("$ref")
}

/// Default Document recursion.
///
/// Dispatches `paths` / `x-ms-paths` to the PathsMap operation, the
/// version-appropriate reusable pools to their kinds, and copies every other
/// top-level field verbatim.
pub fn walk_document<R: Rule + ?Sized>(
    rule: &mut R,
    doc: Value,
    ctx: &WalkContext,
) -> Result<Value, NormalizeError> {
    let Value::Object(obj) = doc else {
        return Ok(doc);
    };
    let mut out = Map::with_capacity(obj.len());
    for (key, val) in obj {
        let walked = match (key.as_str(), ctx.version) {
            ("paths" | "x-ms-paths", _) => rule.visit_paths(val, ctx)?,
            ("components", SpecVersion::V3) => rule.visit_components(val, ctx)?,
            ("definitions", SpecVersion::V2) => {
                walk_map_values(rule, val, ctx, R::visit_schema)?
            }
            ("parameters", SpecVersion::V2) => {
                walk_map_values(rule, val, ctx, R::visit_parameter)?
            }
            ("responses", SpecVersion::V2) => {
                walk_map_values(rule, val, ctx, R::visit_response)?
            }
            _ => val,
        };
        out.insert(key, walked);
    }
    Ok(Value::Object(out))
}

/// Default PathsMap recursion: every entry is a PathItem.
pub fn walk_paths<R: Rule + ?Sized>(
    rule: &mut R,
    paths: Value,
    ctx: &WalkContext,
) -> Result<Value, NormalizeError> {
    walk_map_values(rule, paths, ctx, R::visit_path_item)
}

/// Default PathItem recursion: HTTP method keys are Operations, the shared
/// `parameters` sequence holds Parameters, everything else is verbatim.
/// `$ref` path items are opaque.
pub fn walk_path_item<R: Rule + ?Sized>(
    rule: &mut R,
    item: Value,
    ctx: &WalkContext,
) -> Result<Value, NormalizeError> {
    let Value::Object(obj) = item else {
        return Ok(item);
    };
    if is_ref(&obj) {
        return Ok(Value::Object(obj));
    }
    let mut out = Map::with_capacity(obj.len());
    for (key, val) in obj {
        let walked = if HTTP_METHODS.contains(&key.as_str()) {
            rule.visit_operation(val, ctx)?
        } else if key == "parameters" {
            walk_seq_elements(rule, val, ctx, R::visit_parameter)?
        } else {
            val
        };
        out.insert(key, walked);
    }
    Ok(Value::Object(out))
}

/// Default Operation recursion: `parameters` sequence and `responses` map.
pub fn walk_operation<R: Rule + ?Sized>(
    rule: &mut R,
    op: Value,
    ctx: &WalkContext,
) -> Result<Value, NormalizeError> {
    let Value::Object(obj) = op else {
        return Ok(op);
    };
    let mut out = Map::with_capacity(obj.len());
    for (key, val) in obj {
        let walked = match key.as_str() {
            "parameters" => walk_seq_elements(rule, val, ctx, R::visit_parameter)?,
            "responses" => walk_map_values(rule, val, ctx, R::visit_response)?,
            _ => val,
        };
        out.insert(key, walked);
    }
    Ok(Value::Object(out))
}

/// Default Parameter recursion: the embedded `schema`, if any.
///
/// A v2 non-body parameter carries its type inline — there is nothing to
/// recurse into; rules rewrite such parameters directly. `$ref` parameters
/// are opaque.
pub fn walk_parameter<R: Rule + ?Sized>(
    rule: &mut R,
    param: Value,
    ctx: &WalkContext,
) -> Result<Value, NormalizeError> {
    let Value::Object(obj) = param else {
        return Ok(param);
    };
    if is_ref(&obj) {
        return Ok(Value::Object(obj));
    }
    let mut out = Map::with_capacity(obj.len());
    for (key, val) in obj {
        let walked = if key == "schema" {
            rule.visit_schema(val, ctx)?
        } else {
            val
        };
        out.insert(key, walked);
    }
    Ok(Value::Object(out))
}

/// Default Response recursion: `headers` map, v3 `content` map, v2 `schema`.
pub fn walk_response<R: Rule + ?Sized>(
    rule: &mut R,
    resp: Value,
    ctx: &WalkContext,
) -> Result<Value, NormalizeError> {
    let Value::Object(obj) = resp else {
        return Ok(resp);
    };
    if is_ref(&obj) {
        return Ok(Value::Object(obj));
    }
    let mut out = Map::with_capacity(obj.len());
    for (key, val) in obj {
        let walked = match key.as_str() {
            "headers" => walk_map_values(rule, val, ctx, R::visit_header)?,
            "content" => walk_map_values(rule, val, ctx, R::visit_media_type)?,
            "schema" => rule.visit_schema(val, ctx)?,
            _ => val,
        };
        out.insert(key, walked);
    }
    Ok(Value::Object(out))
}

/// Default MediaType recursion: the embedded `schema`.
pub fn walk_media_type<R: Rule + ?Sized>(
    rule: &mut R,
    media: Value,
    ctx: &WalkContext,
) -> Result<Value, NormalizeError> {
    let Value::Object(obj) = media else {
        return Ok(media);
    };
    let mut out = Map::with_capacity(obj.len());
    for (key, val) in obj {
        let walked = if key == "schema" {
            rule.visit_schema(val, ctx)?
        } else {
            val
        };
        out.insert(key, walked);
    }
    Ok(Value::Object(out))
}

/// Default Header recursion: the embedded `schema` (v3 shape).
///
/// v2 headers carry their type inline, like v2 parameters.
pub fn walk_header<R: Rule + ?Sized>(
    rule: &mut R,
    header: Value,
    ctx: &WalkContext,
) -> Result<Value, NormalizeError> {
    let Value::Object(obj) = header else {
        return Ok(header);
    };
    if is_ref(&obj) {
        return Ok(Value::Object(obj));
    }
    let mut out = Map::with_capacity(obj.len());
    for (key, val) in obj {
        let walked = if key == "schema" {
            rule.visit_schema(val, ctx)?
        } else {
            val
        };
        out.insert(key, walked);
    }
    Ok(Value::Object(out))
}

/// Default Schema recursion.
///
/// Descends into `properties`, `items` (object or sequence form),
/// `additionalProperties`, `not`, and the `allOf`/`anyOf`/`oneOf`
/// combinator sequences. `$ref` schemas are opaque.
pub fn walk_schema<R: Rule + ?Sized>(
    rule: &mut R,
    schema: Value,
    ctx: &WalkContext,
) -> Result<Value, NormalizeError> {
    let Value::Object(obj) = schema else {
        return Ok(schema);
    };
    if is_ref(&obj) {
        return Ok(Value::Object(obj));
    }
    let mut out = Map::with_capacity(obj.len());
    for (key, val) in obj {
        let walked = match key.as_str() {
            "properties" => walk_map_values(rule, val, ctx, R::visit_schema)?,
            "allOf" | "anyOf" | "oneOf" => {
                walk_seq_elements(rule, val, ctx, R::visit_schema)?
            }
            "items" => match val {
                // Sequence form (v2 tuple validation).
                Value::Array(_) => walk_seq_elements(rule, val, ctx, R::visit_schema)?,
                other => rule.visit_schema(other, ctx)?,
            },
            "additionalProperties" | "not" if val.is_object() => {
                rule.visit_schema(val, ctx)?
            }
            _ => val,
        };
        out.insert(key, walked);
    }
    Ok(Value::Object(out))
}

/// Default Components recursion: the four reusable pools this crate
/// understands; other sections (`requestBodies`, `securitySchemes`, ...)
/// are copied verbatim.
pub fn walk_components<R: Rule + ?Sized>(
    rule: &mut R,
    comps: Value,
    ctx: &WalkContext,
) -> Result<Value, NormalizeError> {
    let Value::Object(obj) = comps else {
        return Ok(comps);
    };
    let mut out = Map::with_capacity(obj.len());
    for (key, val) in obj {
        let walked = match key.as_str() {
            "schemas" => walk_map_values(rule, val, ctx, R::visit_schema)?,
            "parameters" => walk_map_values(rule, val, ctx, R::visit_parameter)?,
            "responses" => walk_map_values(rule, val, ctx, R::visit_response)?,
            "headers" => walk_map_values(rule, val, ctx, R::visit_header)?,
            _ => val,
        };
        out.insert(key, walked);
    }
    Ok(Value::Object(out))
}

// ---------------------------------------------------------------------------
// Convenience: identity rule (passthrough)
// ---------------------------------------------------------------------------

#[cfg(test)]
pub struct IdentityRule;

#[cfg(test)]
impl Rule for IdentityRule {
    fn name(&self) -> &'static str {
        "identity"
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn v3_doc() -> Value {
        json!({
            "openapi": "3.0.3",
            "info": { "title": "t", "version": "1" },
            "paths": {
                "/pets": {
                    "parameters": [
                        { "name": "tenant", "in": "query", "schema": { "type": "string" } }
                    ],
                    "get": {
                        "parameters": [
                            { "$ref": "#/components/parameters/Limit" }
                        ],
                        "responses": {
                            "200": {
                                "headers": {
                                    "x-request-id": { "schema": { "type": "string" } }
                                },
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Pet" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Pet": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "tags": { "type": "array", "items": { "type": "string" } }
                        }
                    }
                },
                "parameters": {
                    "Limit": { "name": "limit", "in": "query", "schema": { "type": "integer" } }
                }
            }
        })
    }

    // -----------------------------------------------------------------------
    // Test 1: Identity rule preserves the document exactly
    // -----------------------------------------------------------------------
    #[test]
    fn test_identity_preserves_document() {
        let doc = v3_doc();
        let result = apply(&mut IdentityRule, &doc).unwrap();
        assert_eq!(result, doc);
    }

    // -----------------------------------------------------------------------
    // Test 2: apply never mutates the input tree
    // -----------------------------------------------------------------------
    #[test]
    fn test_apply_does_not_mutate_input() {
        struct Nuke;
        impl Rule for Nuke {
            fn name(&self) -> &'static str {
                "nuke"
            }
            fn visit_schema(
                &mut self,
                _schema: Value,
                _ctx: &WalkContext,
            ) -> Result<Value, NormalizeError> {
                Ok(json!({ "type": "string" }))
            }
        }

        let doc = v3_doc();
        let before = doc.clone();
        let result = apply(&mut Nuke, &doc).unwrap();
        assert_eq!(doc, before, "input must be unchanged");
        assert_ne!(result, before);
    }

    // -----------------------------------------------------------------------
    // Test 3: Every node kind is dispatched
    // -----------------------------------------------------------------------
    #[test]
    fn test_dispatch_reaches_every_kind() {
        #[derive(Default)]
        struct Census {
            paths: usize,
            path_items: usize,
            operations: usize,
            parameters: usize,
            responses: usize,
            media_types: usize,
            schemas: usize,
            components: usize,
            headers: usize,
        }
        impl Rule for Census {
            fn name(&self) -> &'static str {
                "census"
            }
            fn visit_paths(&mut self, v: Value, ctx: &WalkContext) -> Result<Value, NormalizeError> {
                self.paths += 1;
                walk_paths(self, v, ctx)
            }
            fn visit_path_item(
                &mut self,
                v: Value,
                ctx: &WalkContext,
            ) -> Result<Value, NormalizeError> {
                self.path_items += 1;
                walk_path_item(self, v, ctx)
            }
            fn visit_operation(
                &mut self,
                v: Value,
                ctx: &WalkContext,
            ) -> Result<Value, NormalizeError> {
                self.operations += 1;
                walk_operation(self, v, ctx)
            }
            fn visit_parameter(
                &mut self,
                v: Value,
                ctx: &WalkContext,
            ) -> Result<Value, NormalizeError> {
                self.parameters += 1;
                walk_parameter(self, v, ctx)
            }
            fn visit_response(
                &mut self,
                v: Value,
                ctx: &WalkContext,
            ) -> Result<Value, NormalizeError> {
                self.responses += 1;
                walk_response(self, v, ctx)
            }
            fn visit_media_type(
                &mut self,
                v: Value,
                ctx: &WalkContext,
            ) -> Result<Value, NormalizeError> {
                self.media_types += 1;
                walk_media_type(self, v, ctx)
            }
            fn visit_schema(&mut self, v: Value, ctx: &WalkContext) -> Result<Value, NormalizeError> {
                self.schemas += 1;
                walk_schema(self, v, ctx)
            }
            fn visit_components(
                &mut self,
                v: Value,
                ctx: &WalkContext,
            ) -> Result<Value, NormalizeError> {
                self.components += 1;
                walk_components(self, v, ctx)
            }
            fn visit_header(&mut self, v: Value, ctx: &WalkContext) -> Result<Value, NormalizeError> {
                self.headers += 1;
                walk_header(self, v, ctx)
            }
        }

        let mut census = Census::default();
        apply(&mut census, &v3_doc()).unwrap();

        assert_eq!(census.paths, 1);
        assert_eq!(census.path_items, 1);
        assert_eq!(census.operations, 1);
        // Path-level `tenant`, operation-level `$ref`, pooled `Limit`.
        assert_eq!(census.parameters, 3);
        assert_eq!(census.responses, 1);
        assert_eq!(census.media_types, 1);
        assert_eq!(census.components, 1);
        assert_eq!(census.headers, 1);
        // tenant.schema, header.schema, content.schema + its $ref items
        // (visited but opaque), Pet + name + tags + tags.items, Limit.schema.
        assert_eq!(census.schemas, 9);
    }

    // -----------------------------------------------------------------------
    // Test 4: $ref schemas are opaque — no recursion beneath them
    // -----------------------------------------------------------------------
    #[test]
    fn test_ref_nodes_are_opaque() {
        struct MarkStrings;
        impl Rule for MarkStrings {
            fn name(&self) -> &'static str {
                "mark-strings"
            }
            fn visit_schema(
                &mut self,
                schema: Value,
                ctx: &WalkContext,
            ) -> Result<Value, NormalizeError> {
                let mut schema = walk_schema(self, schema, ctx)?;
                if let Some(obj) = schema.as_object_mut() {
                    if obj.get("type").and_then(Value::as_str) == Some("string") {
                        obj.insert("marked".to_string(), json!(true));
                    }
                }
                Ok(schema)
            }
        }

        let doc = json!({
            "openapi": "3.0.3",
            "components": {
                "schemas": {
                    "A": {
                        "$ref": "#/components/schemas/B",
                        // Malformed sibling subtree — must not be entered.
                        "properties": { "x": { "type": "string" } }
                    },
                    "B": { "type": "string" }
                }
            }
        });

        let result = apply(&mut MarkStrings, &doc).unwrap();
        // B is a plain schema: marked.
        assert_eq!(result["components"]["schemas"]["B"]["marked"], json!(true));
        // A carries $ref: its subtree is untouched.
        assert_eq!(
            result["components"]["schemas"]["A"],
            doc["components"]["schemas"]["A"]
        );
    }

    // -----------------------------------------------------------------------
    // Test 5: v2 dispatch — flat pools, inline parameters, response schema
    // -----------------------------------------------------------------------
    #[test]
    fn test_v2_dispatch() {
        struct CountSchemas(usize);
        impl Rule for CountSchemas {
            fn name(&self) -> &'static str {
                "count-schemas"
            }
            fn visit_schema(
                &mut self,
                schema: Value,
                ctx: &WalkContext,
            ) -> Result<Value, NormalizeError> {
                self.0 += 1;
                walk_schema(self, schema, ctx)
            }
        }

        let doc = json!({
            "swagger": "2.0",
            "paths": {
                "/a": {
                    "post": {
                        "parameters": [
                            { "name": "body", "in": "body", "schema": { "type": "object" } },
                            { "name": "q", "in": "query", "type": "string" }
                        ],
                        "responses": {
                            "200": { "schema": { "type": "string" } }
                        }
                    }
                }
            },
            "definitions": {
                "Thing": { "type": "object", "properties": { "id": { "type": "integer" } } }
            },
            "responses": {
                "NotFound": { "description": "nope", "schema": { "type": "string" } }
            }
        });

        let mut rule = CountSchemas(0);
        let result = apply(&mut rule, &doc).unwrap();
        assert_eq!(result, doc);
        // body.schema, 200.schema, Thing, Thing.id, NotFound.schema
        assert_eq!(rule.0, 5);
    }

    // -----------------------------------------------------------------------
    // Test 6: Unknown version is fatal at the entry point
    // -----------------------------------------------------------------------
    #[test]
    fn test_unknown_version_is_fatal() {
        let doc = json!({ "paths": {} });
        assert!(matches!(
            apply(&mut IdentityRule, &doc),
            Err(NormalizeError::UnknownVersion)
        ));
    }

    // -----------------------------------------------------------------------
    // Test 7: Unrelated keys and key order survive a rebuild
    // -----------------------------------------------------------------------
    #[test]
    fn test_key_order_preserved() {
        let doc = json!({
            "swagger": "2.0",
            "info": { "title": "t" },
            "x-custom": [1, 2, 3],
            "paths": { "/z": {}, "/a": {} },
            "definitions": {}
        });

        let result = apply(&mut IdentityRule, &doc).unwrap();
        let keys: Vec<&String> = result.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["swagger", "info", "x-custom", "paths", "definitions"]);
        let path_keys: Vec<&String> = result["paths"].as_object().unwrap().keys().collect();
        assert_eq!(path_keys, ["/z", "/a"]);
    }
}
