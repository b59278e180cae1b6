//! Supplier/project tracker use-case service.
//!
//! # Responsibility
//! - Own the single in-memory `State` and every mutation/query on it.
//! - Persist the full state after each mutation.
//!
//! # Invariants
//! - Mutations are staged on a copy and committed only after a successful
//!   save, so a failed write leaves the in-memory state untouched.
//! - Blank required text and unknown ids are silent no-ops, not errors.
//! - Count edits go through lenient coercion; they never fail.

use crate::model::count::LenientCount;
use crate::model::id::{generate_id, ProjectId, SupplierId};
use crate::model::project::Project;
use crate::model::query::{ProjectQuery, StatusFilter};
use crate::model::state::State;
use crate::model::summary::{SupplierSummary, SupplierTotals};
use crate::model::supplier::Supplier;
use crate::repo::kv_store::{KeyValueStore, StoreResult};
use crate::repo::state_repo::StateRepository;
use crate::service::state_migration::{decode_state, MigrationReport};
use crate::sheet::import::ProjectDraft;
use log::info;

/// Tracker facade over a key-value store.
pub struct TrackerService<S: KeyValueStore> {
    repo: StateRepository<S>,
    state: State,
    migration: MigrationReport,
}

impl<S: KeyValueStore> TrackerService<S> {
    /// Loads the state stored under the default key.
    pub fn open(store: S) -> StoreResult<Self> {
        Self::open_repository(StateRepository::new(store))
    }

    /// Loads the state stored under `key`.
    pub fn open_with_key(store: S, key: impl Into<String>) -> StoreResult<Self> {
        Self::open_repository(StateRepository::with_key(store, key))
    }

    /// Loads, upgrades and, when the upgrade changed anything, re-saves the
    /// stored document.
    ///
    /// Missing or corrupt documents produce the default state; only storage
    /// transport failures are returned.
    pub fn open_repository(repo: StateRepository<S>) -> StoreResult<Self> {
        let (state, migration) = decode_state(repo.load_document()?);
        if migration.changed() {
            repo.save(&state)?;
            info!(
                "event=state_migrate module=tracker status=ok backfilled={} clamped={} undecoded={}",
                migration.backfilled, migration.clamped, migration.undecoded
            );
        }
        info!(
            "event=tracker_open module=tracker status=ok suppliers={} projects={}",
            state.suppliers.len(),
            state.projects.len()
        );
        Ok(Self {
            repo,
            state,
            migration,
        })
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// What the load-time upgrade changed.
    pub fn migration_report(&self) -> MigrationReport {
        self.migration
    }

    pub fn supplier(&self, id: &str) -> Option<&Supplier> {
        self.state.supplier(id)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.state.project(id)
    }

    /// All projects of `supplier_id`, in stored order.
    pub fn projects_for_supplier(&self, supplier_id: &str) -> Vec<&Project> {
        self.state.projects_for_supplier(supplier_id).collect()
    }

    /// Appends a supplier. Returns `None` when `name` is blank.
    pub fn create_supplier(&mut self, name: &str) -> StoreResult<Option<SupplierId>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        let supplier = Supplier::new(name);
        let id = supplier.id.clone();
        self.apply(|state| {
            state.suppliers.push(supplier);
            Some(())
        })?;
        info!("event=supplier_create module=tracker status=ok supplier_id={id}");
        Ok(Some(id))
    }

    /// Renames a supplier; a blank name keeps the current one.
    ///
    /// Returns whether the stored name changed.
    pub fn rename_supplier(&mut self, id: &str, name: &str) -> StoreResult<bool> {
        let renamed = self.apply(|state| {
            state
                .supplier_mut(id)
                .and_then(|supplier| supplier.rename(name).then_some(()))
        })?;
        Ok(renamed.is_some())
    }

    /// Deletes a supplier and all of its projects.
    ///
    /// Returns the number of projects removed. Unknown ids remove nothing.
    pub fn delete_supplier(&mut self, id: &str) -> StoreResult<usize> {
        let id = id.to_string();
        let removed = self
            .apply(|state| Some(state.remove_supplier(&id)))?
            .unwrap_or(0);
        info!(
            "event=supplier_delete module=tracker status=ok supplier_id={id} projects_removed={removed}"
        );
        Ok(removed)
    }

    /// Appends an empty project to `supplier_id`.
    ///
    /// Returns `None` when code or name is blank or the supplier is unknown.
    pub fn create_project(
        &mut self,
        supplier_id: &str,
        code: &str,
        name: &str,
    ) -> StoreResult<Option<ProjectId>> {
        let (code, name) = (code.trim(), name.trim());
        if code.is_empty() || name.is_empty() || self.state.supplier(supplier_id).is_none() {
            return Ok(None);
        }
        let project = Project::new(supplier_id, code, name);
        let id = project.id.clone();
        self.apply(|state| {
            state.projects.push(project);
            Some(())
        })?;
        info!(
            "event=project_create module=tracker status=ok supplier_id={supplier_id} project_id={id}"
        );
        Ok(Some(id))
    }

    /// Deletes one project. Returns whether it existed.
    pub fn delete_project(&mut self, id: &str) -> StoreResult<bool> {
        let id = id.to_string();
        let removed = self
            .apply(|state| Some(state.remove_project(&id)))?
            .unwrap_or(false);
        info!("event=project_delete module=tracker status=ok project_id={id} removed={removed}");
        Ok(removed)
    }

    /// Sets a project's total line items, lowering `received` when needed.
    ///
    /// Returns whether the project exists.
    pub fn set_project_total(&mut self, id: &str, value: impl LenientCount) -> StoreResult<bool> {
        let total = value.to_count();
        let updated = self.apply(|state| {
            state
                .project_mut(id)
                .map(|project| project.set_total_line_items(total))
        })?;
        Ok(updated.is_some())
    }

    /// Sets a project's received count, capped at its total.
    ///
    /// Returns whether the project exists.
    pub fn set_project_received(
        &mut self,
        id: &str,
        value: impl LenientCount,
    ) -> StoreResult<bool> {
        let received = value.to_count();
        let updated = self.apply(|state| {
            state
                .project_mut(id)
                .map(|project| project.set_received(received))
        })?;
        Ok(updated.is_some())
    }

    /// Replaces every project of `supplier_id` with fresh projects built from
    /// `drafts`, in one write.
    ///
    /// Returns the number of projects created, or `None` when the supplier is
    /// unknown (nothing is changed then).
    pub fn replace_supplier_projects(
        &mut self,
        supplier_id: &str,
        drafts: &[ProjectDraft],
    ) -> StoreResult<Option<usize>> {
        if self.state.supplier(supplier_id).is_none() {
            return Ok(None);
        }
        let replaced = self.apply(|state| {
            let removed = state.remove_projects_of(supplier_id);
            state.projects.extend(drafts.iter().map(|draft| {
                Project::with_counts(
                    generate_id(),
                    supplier_id,
                    draft.project_code.as_str(),
                    draft.project_name.as_str(),
                    draft.total_line_items,
                    draft.received,
                )
            }));
            Some(removed)
        })?;
        info!(
            "event=projects_replace module=tracker status=ok supplier_id={supplier_id} removed={} added={}",
            replaced.unwrap_or(0),
            drafts.len()
        );
        Ok(Some(drafts.len()))
    }

    /// Line-item totals across a supplier's projects. Unknown ids yield zeros.
    pub fn supplier_totals(&self, supplier_id: &str) -> SupplierTotals {
        SupplierTotals::from_projects(self.state.projects_for_supplier(supplier_id))
    }

    /// A supplier's projects matching `search` and `status`, in stored order.
    pub fn query_projects(
        &self,
        supplier_id: &str,
        search: &str,
        status: StatusFilter,
    ) -> Vec<&Project> {
        ProjectQuery::new(search, status).apply(self.state.projects_for_supplier(supplier_id))
    }

    /// Dashboard rows for every supplier, in stored order.
    pub fn supplier_summaries(&self) -> Vec<SupplierSummary> {
        self.state
            .suppliers
            .iter()
            .map(|supplier| {
                let totals = self.supplier_totals(&supplier.id);
                SupplierSummary {
                    supplier_id: supplier.id.clone(),
                    name: supplier.name.clone(),
                    received_pct: totals.received_pct(),
                    pending_pct: totals.pending_pct(),
                    totals,
                }
            })
            .collect()
    }

    /// Runs `mutate` on a copy of the state; when it reports a change
    /// (`Some`), saves the copy and makes it current.
    fn apply<T>(&mut self, mutate: impl FnOnce(&mut State) -> Option<T>) -> StoreResult<Option<T>> {
        let mut next = self.state.clone();
        let Some(outcome) = mutate(&mut next) else {
            return Ok(None);
        };
        self.repo.save(&next)?;
        self.state = next;
        Ok(Some(outcome))
    }
}
