//! Project and legacy line-item records.
//!
//! # Invariants
//! - `received <= total_line_items` after every constructor and setter.
//! - `LineItem` is read only by the state migration and otherwise kept as-is.

use crate::model::count::Count;
use crate::model::id::{generate_id, ProjectId, SupplierId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Legacy status marking a line item as delivered.
pub const LINE_ITEM_RECEIVED_STATUS: &str = "received";

/// A supplier project tracking received line items against a total.
///
/// Stored documents are decoded through the state migration rather than
/// deserialized directly, so the count invariant cannot be bypassed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub supplier_id: SupplierId,
    pub project_code: String,
    pub project_name: String,
    total_line_items: Count,
    received: Count,
    /// Stored fields the tracker does not use, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Project {
    /// Creates an empty project (`0` of `0` received) with a fresh id.
    pub fn new(
        supplier_id: impl Into<SupplierId>,
        project_code: impl Into<String>,
        project_name: impl Into<String>,
    ) -> Self {
        Self::with_counts(generate_id(), supplier_id, project_code, project_name, 0, 0)
    }

    /// Builds a project from explicit counts, clamping `received` to `total`.
    pub fn with_counts(
        id: impl Into<ProjectId>,
        supplier_id: impl Into<SupplierId>,
        project_code: impl Into<String>,
        project_name: impl Into<String>,
        total_line_items: Count,
        received: Count,
    ) -> Self {
        Self {
            id: id.into(),
            supplier_id: supplier_id.into(),
            project_code: project_code.into(),
            project_name: project_name.into(),
            total_line_items,
            received: received.min(total_line_items),
            extra: Map::new(),
        }
    }

    pub fn total_line_items(&self) -> Count {
        self.total_line_items
    }

    pub fn received(&self) -> Count {
        self.received
    }

    /// Line items not yet received.
    pub fn pending(&self) -> Count {
        self.total_line_items.saturating_sub(self.received)
    }

    /// Sets the total, lowering `received` when it would exceed the new total.
    pub fn set_total_line_items(&mut self, total: Count) {
        self.total_line_items = total;
        self.received = self.received.min(total);
    }

    /// Sets `received`, capped at the current total.
    pub fn set_received(&mut self, received: Count) {
        self.received = received.min(self.total_line_items);
    }

    /// Case-insensitive substring match on code or name.
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn matches_text(&self, needle: &str) -> bool {
        self.project_code.to_lowercase().contains(needle)
            || self.project_name.to_lowercase().contains(needle)
    }
}

/// Historical per-line-item record from documents written before projects
/// carried explicit counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default)]
    pub project_id: ProjectId,
    #[serde(default)]
    pub status: String,
    /// Any other fields of the stored record, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LineItem {
    pub fn is_received(&self) -> bool {
        self.status == LINE_ITEM_RECEIVED_STATUS
    }
}
