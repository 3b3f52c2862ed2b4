//! Format-to-type promotion.
//!
//! Some documents declare numeric values as `type: string` with a numeric
//! `format` (`int32`, `double`, ...). Generators read the `type` field, so
//! the numeric intent is lost. The rule promotes the format into the type:
//!
//! - `decimal`, `double`, `float` → `type: number`
//! - `integer`, `int32`, `int64` → `type: integer`
//!
//! `format` is kept as a precision hint unless it now merely repeats the
//! type (`format: integer` on `type: integer`). Applies to Schema nodes and
//! to the inline v2 shape of Parameter and Header nodes.

use serde_json::{json, Value};

use crate::error::NormalizeError;
use crate::walker::{walk_header, walk_parameter, walk_schema, Rule, WalkContext};

pub struct FormatToType;

impl Rule for FormatToType {
    fn name(&self) -> &'static str {
        "format-to-type"
    }

    fn visit_schema(&mut self, schema: Value, ctx: &WalkContext) -> Result<Value, NormalizeError> {
        let schema = walk_schema(self, schema, ctx)?;
        Ok(promote(schema))
    }

    fn visit_parameter(&mut self, param: Value, ctx: &WalkContext) -> Result<Value, NormalizeError> {
        let param = walk_parameter(self, param, ctx)?;
        Ok(promote(param))
    }

    fn visit_header(&mut self, header: Value, ctx: &WalkContext) -> Result<Value, NormalizeError> {
        let header = walk_header(self, header, ctx)?;
        Ok(promote(header))
    }
}

fn promoted_type(format: &str) -> Option<&'static str> {
    match format {
        "decimal" | "double" | "float" => Some("number"),
        "integer" | "int32" | "int64" => Some("integer"),
        _ => None,
    }
}

fn promote(value: Value) -> Value {
    let Value::Object(mut obj) = value else {
        return value;
    };

    let is_string = obj.get("type").and_then(Value::as_str) == Some("string");
    let new_type = obj
        .get("format")
        .and_then(Value::as_str)
        .and_then(promoted_type);

    if let (true, Some(new_type)) = (is_string, new_type) {
        obj.insert("type".to_string(), json!(new_type));
        // `format: integer` on `type: integer` carries no extra precision.
        if obj.get("format").and_then(Value::as_str) == Some(new_type) {
            obj.remove("format");
        }
    }

    Value::Object(obj)
}

// ===========================================================================
// Tests
// ===========================================================================
