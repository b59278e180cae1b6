//! Decoding and upgrade of stored tracker documents.
//!
//! # Responsibility
//! - Turn an untyped stored document into a valid `State`.
//! - Backfill project counts for documents written before projects carried
//!   `totalLineItems`/`received`, using the legacy line items.
//!
//! # Invariants
//! - Shape is inferred from field presence only; there is no version field.
//! - Fields already present are never recomputed, so decoding is idempotent.
//! - Every decoded project satisfies `received <= total_line_items`.
//! - List entries that do not decode are kept verbatim, never discarded.

use crate::model::count::{Count, LenientCount};
use crate::model::project::{LineItem, Project};
use crate::model::state::{default_suppliers, State, UndecodedRecords};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

/// What decoding had to change relative to the stored document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Projects that were missing one or both count fields.
    pub backfilled: usize,
    /// Projects whose stored `received` exceeded their total.
    pub clamped: usize,
    /// Stored records that could not be decoded; kept verbatim.
    pub undecoded: usize,
}

impl MigrationReport {
    /// Whether the decoded state differs from what is stored and should be
    /// written back.
    ///
    /// Undecoded records are carried unchanged and do not count.
    pub fn changed(&self) -> bool {
        self.backfilled > 0 || self.clamped > 0
    }
}

/// Project as it may appear in older documents.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredProject {
    id: String,
    #[serde(default)]
    supplier_id: String,
    #[serde(default)]
    project_code: String,
    #[serde(default)]
    project_name: String,
    total_line_items: Option<Value>,
    received: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Decodes `document` into a `State`, upgrading legacy shapes.
///
/// `None` (nothing stored, or unparseable text) and non-object documents
/// yield `State::default()`. A supplier list that is missing or not an array
/// falls back to the default supplier; missing project or line-item lists
/// are empty.
pub fn decode_state(document: Option<Value>) -> (State, MigrationReport) {
    let mut report = MigrationReport::default();
    let Some(Value::Object(mut root)) = document else {
        return (State::default(), report);
    };
    let mut undecoded = UndecodedRecords::default();

    let suppliers = match root.remove("suppliers") {
        Some(list @ Value::Array(_)) => decode_records(Some(list), &mut undecoded.suppliers),
        _ => default_suppliers(),
    };
    let line_items: Vec<LineItem> =
        decode_records(root.remove("lineItems"), &mut undecoded.line_items);
    let stored_projects: Vec<StoredProject> =
        decode_records(root.remove("projects"), &mut undecoded.projects);

    let projects = stored_projects
        .into_iter()
        .map(|stored| upgrade_project(stored, &line_items, &mut report))
        .collect();

    report.undecoded = undecoded.len();
    if report.undecoded > 0 {
        warn!(
            "event=state_decode module=migration status=partial undecoded={}",
            report.undecoded
        );
    }

    let state = State {
        suppliers,
        projects,
        line_items,
        undecoded,
    };
    (state, report)
}

fn upgrade_project(
    stored: StoredProject,
    line_items: &[LineItem],
    report: &mut MigrationReport,
) -> Project {
    let mut total = stored.total_line_items.as_ref().map(stored_count);
    let mut received = stored.received.as_ref().map(stored_count);

    if total.is_none() || received.is_none() {
        report.backfilled += 1;
    }

    if total.is_none() {
        let owned = line_items
            .iter()
            .filter(|item| item.project_id == stored.id);
        let (count, received_count) = owned.fold((0_usize, 0_usize), |(all, got), item| {
            (all + 1, got + usize::from(item.is_received()))
        });
        total = Some(count.to_count());
        received = Some(received_count.to_count());
    }

    let total = total.unwrap_or(0);
    let received = received.unwrap_or(0);
    if received > total {
        report.clamped += 1;
    }

    let mut project = Project::with_counts(
        stored.id,
        stored.supplier_id,
        stored.project_code,
        stored.project_name,
        total,
        received,
    );
    project.extra = stored.extra;
    project
}

/// Decodes each array element independently; the ones that fail are pushed
/// to `undecoded` unchanged.
fn decode_records<T: DeserializeOwned>(
    value: Option<Value>,
    undecoded: &mut Vec<Value>,
) -> Vec<T> {
    let Some(Value::Array(entries)) = value else {
        return Vec::new();
    };

    let mut records = Vec::with_capacity(entries.len());
    for entry in entries {
        match T::deserialize(&entry) {
            Ok(record) => records.push(record),
            Err(_) => undecoded.push(entry),
        }
    }
    records
}

/// Reads a stored count the way numeric document fields are interpreted:
/// whole-string numeric text, numbers and booleans count; anything else is 0.
fn stored_count(value: &Value) -> Count {
    match value {
        Value::Number(number) => number.as_f64().map_or(0, |n| n.to_count()),
        Value::String(text) => text.trim().parse::<f64>().map_or(0, |n| n.to_count()),
        Value::Bool(flag) => Count::from(*flag),
        _ => 0,
    }
}
