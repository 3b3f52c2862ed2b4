//! Normalize OpenAPI 2.0 (Swagger) and 3.x documents for code generators.
//!
//! Downstream generators reject or mis-handle a number of constructs that
//! appear in real-world API descriptions: numeric formats on string types,
//! `nullable` flags, single-member `allOf` wrappers, query strings embedded
//! in path keys, per-path server overrides, HTML response bodies, and more.
//! This crate rewrites such documents into shapes the generators accept,
//! without ever mutating the input tree.
//!
//! The building blocks:
//!
//! - [`Rule`] + the `walk_*` drivers in [`walker`] — a generic traversal
//!   engine: one visit operation per document node kind, defaulting to
//!   structural recursion.
//! - [`rules`] — the normalization catalog, each rule a thin [`Rule`]
//!   implementation.
//! - [`Pipeline`] — ordered composition; each rule's output document feeds
//!   the next.
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//!
//! let doc = json!({
//!     "swagger": "2.0",
//!     "definitions": {
//!         "Price": { "type": "string", "format": "decimal", "x-nullable": true }
//!     }
//! });
//!
//! let normalized = openapi_normalizer_core::normalize(&doc).unwrap();
//! assert_eq!(
//!     normalized["definitions"]["Price"],
//!     json!({ "type": ["number", "null"], "format": "decimal" })
//! );
//! ```

pub mod error;
pub mod pipeline;
pub mod rules;
pub mod version;
pub mod walker;

pub use error::NormalizeError;
pub use pipeline::{Pipeline, RuleKind};
pub use version::SpecVersion;
pub use walker::{apply, Rule, WalkContext};

use serde_json::Value;

/// Parse a JSON document into a tree ready for normalization.
pub fn parse_document(text: &str) -> Result<Value, NormalizeError> {
    Ok(serde_json::from_str(text)?)
}

/// Run the standard pipeline for the document's detected version.
pub fn normalize(document: &Value) -> Result<Value, NormalizeError> {
    let version = SpecVersion::detect(document)?;
    Pipeline::standard(version).run(document)
}
