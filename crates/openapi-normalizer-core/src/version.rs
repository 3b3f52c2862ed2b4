//! Document version detection.
//!
//! OpenAPI documents declare their syntax at the root: `swagger: "2.0"` for
//! the legacy Swagger shape, `openapi: "3.x.y"` for the current one. The two
//! shapes diverge enough (flat `definitions`/`parameters`/`responses` maps vs
//! a nested `components` section, inline parameter types vs `schema`) that
//! every rule receives the detected version through [`crate::WalkContext`]
//! and matches on it instead of probing for optional fields.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::NormalizeError;

/// The two document shapes this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecVersion {
    /// Swagger 2.0 — flat top-level pools, inline parameter types, `produces`.
    V2,
    /// OpenAPI 3.x — `components` section, per-response `content` maps.
    V3,
}

impl SpecVersion {
    /// Detect the version from a document's root mapping.
    ///
    /// Returns [`NormalizeError::UnknownVersion`] when neither marker is
    /// present — the rest of the document is not validated.
    pub fn detect(document: &Value) -> Result<Self, NormalizeError> {
        let Some(obj) = document.as_object() else {
            return Err(NormalizeError::UnknownVersion);
        };

        if obj.get("swagger").and_then(Value::as_str) == Some("2.0") {
            return Ok(SpecVersion::V2);
        }

        if obj
            .get("openapi")
            .and_then(Value::as_str)
            .is_some_and(|v| v.starts_with('3'))
        {
            return Ok(SpecVersion::V3);
        }

        Err(NormalizeError::UnknownVersion)
    }
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecVersion::V2 => write!(f, "2.0"),
            SpecVersion::V3 => write!(f, "3.x"),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
