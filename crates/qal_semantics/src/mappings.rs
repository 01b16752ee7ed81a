// Copyright contributors to the qal-parser project
// SPDX-License-Identifier: Apache-2.0

//! The scope used during analysis: a case-insensitive table binding names
//! to already-evaluated values.
//!
//! QAL has a single file-level scope. Rebinding a name silently overwrites
//! the previous binding (last write wins); `map` statements rely on this.

use hashbrown::HashMap;

use crate::values::Value;

#[derive(Clone, Debug, Default)]
pub struct MappingTable {
    table: HashMap<String, Value>,
}

impl MappingTable {
    pub fn new() -> MappingTable {
        MappingTable::default()
    }

    /// Binds `name` to `value`, silently replacing any previous binding.
    /// Matching is case-insensitive.
    pub fn bind(&mut self, name: &str, value: Value) {
        self.table.insert(name.to_lowercase(), value);
    }

    /// Looks up `name` case-insensitively.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.table.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Iterates over the (lowercased) bound names and their values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.table.iter().map(|(name, value)| (name.as_str(), value))
    }
}
