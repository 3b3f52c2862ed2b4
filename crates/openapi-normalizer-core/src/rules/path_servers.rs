//! Per-path server override removal.
//!
//! The target representation has a single document-wide server list; a
//! PathItem that declares its own `servers` override cannot be expressed
//! and is dropped wholesale, operations included. Presence of the key is
//! the trigger — an empty `servers` list drops the PathItem too.

use serde_json::{Map, Value};

use crate::error::NormalizeError;
use crate::walker::{Rule, WalkContext};

pub struct RemovePathsWithServers;

impl Rule for RemovePathsWithServers {
    fn name(&self) -> &'static str {
        "remove-paths-with-servers"
    }

    // The rule only drops whole entries; kept PathItems need no recursion.
    fn visit_paths(&mut self, paths: Value, _ctx: &WalkContext) -> Result<Value, NormalizeError> {
        let Value::Object(paths) = paths else {
            return Ok(paths);
        };

        let mut out = Map::with_capacity(paths.len());
        for (key, item) in paths {
            if item
                .as_object()
                .is_some_and(|o| o.contains_key("servers"))
            {
                tracing::debug!(path = %key, "dropping path item with servers override");
                continue;
            }
            out.insert(key, item);
        }
        Ok(Value::Object(out))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
