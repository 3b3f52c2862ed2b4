//! Ordered rule composition.
//!
//! `pipeline(document) = ruleN(...rule1(document))` — each rule's output
//! document is the next rule's input, failing fast on the first error.
//! [`Pipeline::standard`] assembles the full catalog for a given document
//! version: restructuring first, then response cleanup, then the
//! schema-shape rewrites.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::NormalizeError;
use crate::rules::{
    BinaryTypeToFile, CollapseSingleOf, FormatToType, HoistPathParameters, MoveQueryPaths,
    NullableToTypeNull, PruneEmptyArrayBranches, RemoveDefaultOnlyProduces, RemoveHtmlContent,
    RemovePathsWithServers, RemoveResponseHeaders,
};
use crate::version::SpecVersion;
use crate::walker::{apply, Rule};

/// Identifier for each catalog rule, used to cherry-pick or skip rules.
///
/// Serialized in `kebab-case`, matching each rule's `name()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    MoveQueryPaths,
    RemovePathsWithServers,
    HoistPathParameters,
    RemoveHtmlContent,
    RemoveResponseHeaders,
    RemoveDefaultOnlyProduces,
    PruneEmptyArrayBranches,
    CollapseSingleOf,
    NullableToTypeNull,
    FormatToType,
    BinaryTypeToFile,
}

impl RuleKind {
    fn instantiate(self) -> Box<dyn Rule> {
        match self {
            RuleKind::MoveQueryPaths => Box::new(MoveQueryPaths),
            RuleKind::RemovePathsWithServers => Box::new(RemovePathsWithServers),
            RuleKind::HoistPathParameters => Box::new(HoistPathParameters),
            RuleKind::RemoveHtmlContent => Box::new(RemoveHtmlContent),
            RuleKind::RemoveResponseHeaders => Box::new(RemoveResponseHeaders),
            RuleKind::RemoveDefaultOnlyProduces => Box::new(RemoveDefaultOnlyProduces),
            RuleKind::PruneEmptyArrayBranches => Box::new(PruneEmptyArrayBranches),
            RuleKind::CollapseSingleOf => Box::new(CollapseSingleOf),
            RuleKind::NullableToTypeNull => Box::new(NullableToTypeNull),
            RuleKind::FormatToType => Box::new(FormatToType),
            RuleKind::BinaryTypeToFile => Box::new(BinaryTypeToFile),
        }
    }

    /// The standard catalog order for a document version.
    ///
    /// `remove-paths-with-servers` only exists for 3.x documents;
    /// `remove-default-only-produces` only runs on 2.0 (it is fatal
    /// elsewhere).
    pub fn standard_order(version: SpecVersion) -> Vec<RuleKind> {
        let mut order = vec![RuleKind::MoveQueryPaths];
        if version == SpecVersion::V3 {
            order.push(RuleKind::RemovePathsWithServers);
        }
        order.push(RuleKind::HoistPathParameters);
        order.push(RuleKind::RemoveHtmlContent);
        order.push(RuleKind::RemoveResponseHeaders);
        if version == SpecVersion::V2 {
            order.push(RuleKind::RemoveDefaultOnlyProduces);
        }
        // Nullable promotion runs last: it turns scalar `type` values into
        // lists, which the format and binary rewrites do not match.
        order.extend([
            RuleKind::PruneEmptyArrayBranches,
            RuleKind::CollapseSingleOf,
            RuleKind::FormatToType,
            RuleKind::BinaryTypeToFile,
            RuleKind::NullableToTypeNull,
        ]);
        order
    }
}

/// An ordered sequence of rule instances applied to one document.
#[derive(Default)]
pub struct Pipeline {
    rules: Vec<Box<dyn Rule>>,
}

impl Pipeline {
    /// An empty pipeline; [`run`](Self::run) returns the document unchanged.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule.
    pub fn with(mut self, rule: Box<dyn Rule>) -> Self {
        self.rules.push(rule);
        self
    }

    /// The full catalog in standard order for the given document version.
    pub fn standard(version: SpecVersion) -> Self {
        Self::standard_without(version, &[])
    }

    /// The standard catalog minus the given rules.
    pub fn standard_without(version: SpecVersion, skip: &[RuleKind]) -> Self {
        let rules = RuleKind::standard_order(version)
            .into_iter()
            .filter(|kind| !skip.contains(kind))
            .map(RuleKind::instantiate)
            .collect();
        Self { rules }
    }

    /// Run every rule in order over the document.
    ///
    /// The input tree is never mutated; on error no partial document is
    /// produced.
    pub fn run(&mut self, document: &Value) -> Result<Value, NormalizeError> {
        let mut doc = document.clone();
        for rule in &mut self.rules {
            doc = apply(rule.as_mut(), &doc)?;
        }
        Ok(doc)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
