//! Core domain logic for the supplier parts tracker.
//! This crate is the single source of truth for tracker invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod sheet;

pub use config::{load_config, ConfigError, TrackerConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::count::{Count, LenientCount};
pub use model::id::{ProjectId, SupplierId};
pub use model::project::{LineItem, Project};
pub use model::query::{ProjectQuery, StatusFilter};
pub use model::state::State;
pub use model::summary::{ProjectProgress, SupplierSummary, SupplierTotals};
pub use model::supplier::Supplier;
pub use repo::kv_store::{KeyValueStore, MemoryKvStore, SqliteKvStore, StoreError, StoreResult};
pub use repo::state_repo::{StateRepository, DEFAULT_STORAGE_KEY};
pub use service::confirm::{Confirmation, ConfirmationGate, GateOutcome};
pub use service::controller::{ImportError, TrackerController};
pub use service::state_migration::MigrationReport;
pub use service::tracker_service::TrackerService;
pub use sheet::{Cell, Sheet, SheetError, Workbook, WorkbookCodec};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
