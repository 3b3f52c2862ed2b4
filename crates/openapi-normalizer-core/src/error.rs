//! Error types for document normalization.

use thiserror::Error;

use crate::version::SpecVersion;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot detect document version: expected `swagger: \"2.0\"` or `openapi: \"3.x\"` at the root")]
    UnknownVersion,

    #[error("rule `{rule}` requires an OpenAPI {expected} document, got {found}")]
    VersionMismatch {
        rule: &'static str,
        expected: SpecVersion,
        found: SpecVersion,
    },

    #[error("path `{path}` already exists in x-ms-paths")]
    PathCollision { path: String },

    #[error("parameter `{name}` is already pooled with a different definition")]
    ParameterCollision { name: String },
}
