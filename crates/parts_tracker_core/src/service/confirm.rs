//! Confirmation prompts guarding destructive operations.

use crate::model::id::{ProjectId, SupplierId};

/// A destructive action waiting for the user's acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    /// Deleting a supplier also deletes its projects.
    DeleteSupplier {
        supplier_id: SupplierId,
        project_count: usize,
    },
    /// Project deletion cannot be undone.
    DeleteProject { project_id: ProjectId },
    /// Importing replaces every existing project of the supplier.
    ReplaceProjects {
        supplier_id: SupplierId,
        existing: usize,
        incoming: usize,
    },
}

impl Confirmation {
    /// Warning text shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            Self::DeleteSupplier { .. } => "Delete this supplier and all projects?",
            Self::DeleteProject { .. } => "Are you sure you want to delete this project?",
            Self::ReplaceProjects { .. } => {
                "Importing will delete existing projects for this supplier. Continue?"
            }
        }
    }
}

/// Asks the user to acknowledge a destructive action.
///
/// Returning `false` must leave the tracker untouched.
pub trait ConfirmationGate {
    fn confirm(&mut self, request: &Confirmation) -> bool;
}

impl<F> ConfirmationGate for F
where
    F: FnMut(&Confirmation) -> bool,
{
    fn confirm(&mut self, request: &Confirmation) -> bool {
        self(request)
    }
}

/// Result of an operation behind a confirmation gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome<T> {
    /// Confirmed and applied.
    Applied(T),
    /// The user declined; nothing changed.
    Declined,
    /// The target does not exist; nothing was asked or changed.
    NotFound,
}

impl<T> GateOutcome<T> {
    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Declined | Self::NotFound => None,
        }
    }
}
