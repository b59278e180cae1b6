//! Supplier record.

use crate::model::id::{generate_id, SupplierId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A supplier owning zero or more projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    /// Stable id assigned at creation.
    pub id: SupplierId,
    /// Display name. Never blank once set through the tracker.
    pub name: String,
    /// Stored fields the tracker does not use, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Supplier {
    /// Creates a supplier with a freshly generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            extra: Map::new(),
        }
    }

    /// Replaces the name unless `name` is blank after trimming.
    ///
    /// Returns whether the stored name changed.
    pub fn rename(&mut self, name: &str) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed == self.name {
            return false;
        }
        self.name = trimmed.to_string();
        true
    }
}
