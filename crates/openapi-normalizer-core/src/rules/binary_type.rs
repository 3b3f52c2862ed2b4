//! Binary-to-file rewrite.
//!
//! Generators that consume these documents model binary payloads as
//! `type: file` rather than `type: string` + `format: binary`/`file`.
//! The rule rewrites any matching Schema node, and — in 2.0 documents —
//! any Parameter carrying an inlined `type`/`format` pair.
//!
//! A rewritten schema is not recursed into: `type: file` describes a whole
//! body, so whatever sits beneath a matching node is left exactly as found.
//! No scope enforcement is performed beyond that — the rule fires wherever
//! a matching node is reached.

use serde_json::{json, Value};

use crate::error::NormalizeError;
use crate::version::SpecVersion;
use crate::walker::{walk_parameter, walk_schema, Rule, WalkContext};

pub struct BinaryTypeToFile;

impl Rule for BinaryTypeToFile {
    fn name(&self) -> &'static str {
        "binary-type-to-file"
    }

    fn visit_schema(&mut self, schema: Value, ctx: &WalkContext) -> Result<Value, NormalizeError> {
        if is_binary(&schema) {
            return Ok(rewrite(schema));
        }
        walk_schema(self, schema, ctx)
    }

    fn visit_parameter(&mut self, param: Value, ctx: &WalkContext) -> Result<Value, NormalizeError> {
        let param = walk_parameter(self, param, ctx)?;
        // v3 parameters carry their type under `schema`, already handled.
        if ctx.version == SpecVersion::V2 && is_binary(&param) {
            return Ok(rewrite(param));
        }
        Ok(param)
    }
}

fn is_binary(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    obj.get("type").and_then(Value::as_str) == Some("string")
        && matches!(
            obj.get("format").and_then(Value::as_str),
            Some("binary" | "file")
        )
}

fn rewrite(value: Value) -> Value {
    let Value::Object(mut obj) = value else {
        return value;
    };
    obj.insert("type".to_string(), json!("file"));
    obj.remove("format");
    Value::Object(obj)
}

// ===========================================================================
// Tests
// ===========================================================================
