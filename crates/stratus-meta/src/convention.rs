//! Naming-convention table for declaring locations.
//!
//! Host modules either write storage references directly, or defer array
//! dimensions to standard names and rely on a configured reference prefix
//! per derived type. A module absent from this table uses the direct
//! convention for all of its variables. For plain module-level variables
//! the type key equals the module name and the prefix is empty.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Module name -> (type name -> reference prefix).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConventionTable {
    entries: IndexMap<String, IndexMap<String, String>>,
}

impl ConventionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a prefix for a module/type pair.
    pub fn insert(
        &mut self,
        module: impl Into<String>,
        type_name: impl Into<String>,
        prefix: impl Into<String>,
    ) {
        self.entries
            .entry(module.into())
            .or_default()
            .insert(type_name.into(), prefix.into());
    }

    /// Whether the module uses the dimension-deferring convention at all.
    pub fn contains_module(&self, module: &str) -> bool {
        self.entries.contains_key(module)
    }

    /// Reference prefix for a module/type pair, if configured.
    pub fn prefix(&self, module: &str, type_name: &str) -> Option<&str> {
        self.entries
            .get(module)
            .and_then(|types| types.get(type_name))
            .map(String::as_str)
    }
}
