//! User-action controller on top of `TrackerService`.
//!
//! # Responsibility
//! - Route destructive actions through a `ConfirmationGate`.
//! - Drive spreadsheet import/export for one supplier.
//!
//! # Invariants
//! - The gate is consulted before any mutation; a decline changes nothing.
//! - Imports are validated completely before the gate is consulted, so a
//!   structurally broken sheet never prompts and never mutates.

use crate::model::id::SupplierId;
use crate::repo::kv_store::{KeyValueStore, StoreError, StoreResult};
use crate::service::confirm::{Confirmation, ConfirmationGate, GateOutcome};
use crate::service::tracker_service::TrackerService;
use crate::sheet::export::{export_projects, ExportFile};
use crate::sheet::import::plan_import;
use crate::sheet::{SheetError, Workbook, WorkbookCodec};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Why an import did not happen.
#[derive(Debug)]
pub enum ImportError {
    Sheet(SheetError),
    SupplierNotFound(SupplierId),
    Store(StoreError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sheet(err) => write!(f, "{err}"),
            Self::SupplierNotFound(id) => write!(f, "supplier not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sheet(err) => Some(err),
            Self::SupplierNotFound(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<SheetError> for ImportError {
    fn from(value: SheetError) -> Self {
        Self::Sheet(value)
    }
}

impl From<StoreError> for ImportError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Tracker service plus the confirmation gate used for destructive actions.
pub struct TrackerController<S: KeyValueStore, G: ConfirmationGate> {
    service: TrackerService<S>,
    gate: G,
}

impl<S: KeyValueStore, G: ConfirmationGate> TrackerController<S, G> {
    pub fn new(service: TrackerService<S>, gate: G) -> Self {
        Self { service, gate }
    }

    pub fn service(&self) -> &TrackerService<S> {
        &self.service
    }

    /// Non-destructive edits go straight to the service.
    pub fn service_mut(&mut self) -> &mut TrackerService<S> {
        &mut self.service
    }

    pub fn into_service(self) -> TrackerService<S> {
        self.service
    }

    /// Deletes a supplier and its projects after confirmation.
    pub fn delete_supplier(&mut self, supplier_id: &str) -> StoreResult<GateOutcome<usize>> {
        if self.service.supplier(supplier_id).is_none() {
            return Ok(GateOutcome::NotFound);
        }
        let request = Confirmation::DeleteSupplier {
            supplier_id: supplier_id.to_string(),
            project_count: self.service.projects_for_supplier(supplier_id).len(),
        };
        if !self.gate.confirm(&request) {
            return Ok(declined("supplier_delete"));
        }
        self.service
            .delete_supplier(supplier_id)
            .map(GateOutcome::Applied)
    }

    /// Deletes a project after confirmation.
    pub fn delete_project(&mut self, project_id: &str) -> StoreResult<GateOutcome<()>> {
        if self.service.project(project_id).is_none() {
            return Ok(GateOutcome::NotFound);
        }
        let request = Confirmation::DeleteProject {
            project_id: project_id.to_string(),
        };
        if !self.gate.confirm(&request) {
            return Ok(declined("project_delete"));
        }
        self.service.delete_project(project_id)?;
        Ok(GateOutcome::Applied(()))
    }

    /// Replaces a supplier's projects with the rows of `workbook`.
    ///
    /// Returns the number of imported projects once confirmed.
    pub fn import_workbook(
        &mut self,
        supplier_id: &str,
        workbook: &Workbook,
    ) -> Result<GateOutcome<usize>, ImportError> {
        if self.service.supplier(supplier_id).is_none() {
            return Err(ImportError::SupplierNotFound(supplier_id.to_string()));
        }

        let plan = plan_import(workbook).map_err(|err| {
            warn!("event=sheet_import module=controller status=error supplier_id={supplier_id} error={err}");
            err
        })?;

        let request = Confirmation::ReplaceProjects {
            supplier_id: supplier_id.to_string(),
            existing: self.service.projects_for_supplier(supplier_id).len(),
            incoming: plan.drafts.len(),
        };
        if !self.gate.confirm(&request) {
            return Ok(declined("sheet_import"));
        }

        let imported = self
            .service
            .replace_supplier_projects(supplier_id, &plan.drafts)?
            .ok_or_else(|| ImportError::SupplierNotFound(supplier_id.to_string()))?;
        info!(
            "event=sheet_import module=controller status=ok supplier_id={supplier_id} imported={imported} skipped={}",
            plan.skipped_rows
        );
        Ok(GateOutcome::Applied(imported))
    }

    /// Decodes `bytes` with `codec` and imports the result.
    pub fn import_bytes(
        &mut self,
        supplier_id: &str,
        codec: &impl WorkbookCodec,
        bytes: &[u8],
    ) -> Result<GateOutcome<usize>, ImportError> {
        let workbook = codec.decode(bytes)?;
        self.import_workbook(supplier_id, &workbook)
    }

    /// Status report for one supplier, or `None` when it does not exist.
    pub fn export_workbook(&self, supplier_id: &str) -> Option<ExportFile> {
        let supplier = self.service.supplier(supplier_id)?;
        Some(export_projects(
            &supplier.name,
            self.service.projects_for_supplier(supplier_id),
        ))
    }

    /// Encoded status report as `(file name, bytes)`.
    pub fn export_bytes(
        &self,
        supplier_id: &str,
        codec: &impl WorkbookCodec,
    ) -> Result<Option<(String, Vec<u8>)>, SheetError> {
        let Some(file) = self.export_workbook(supplier_id) else {
            return Ok(None);
        };
        let bytes = codec.encode(&file.workbook)?;
        info!(
            "event=sheet_export module=controller status=ok supplier_id={supplier_id} bytes={}",
            bytes.len()
        );
        Ok(Some((file.file_name, bytes)))
    }
}

fn declined<T>(event: &str) -> GateOutcome<T> {
    info!("event={event} module=controller status=declined");
    GateOutcome::Declined
}
