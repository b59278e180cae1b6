//! Root state document persisted as a single blob.

use crate::model::id::{ProjectId, SupplierId};
use crate::model::project::{LineItem, Project};
use crate::model::supplier::Supplier;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

const DEFAULT_SUPPLIER_ID: &str = "supplier1";
const DEFAULT_SUPPLIER_NAME: &str = "Supplier 1";

/// Everything the tracker knows, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub suppliers: Vec<Supplier>,
    pub projects: Vec<Project>,
    /// Legacy records, carried along so older documents round-trip.
    pub line_items: Vec<LineItem>,
    pub(crate) undecoded: UndecodedRecords,
}

/// Stored list entries that did not decode into typed records.
///
/// They are invisible to every query and written back after the typed
/// records of the same list on save.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct UndecodedRecords {
    pub suppliers: Vec<Value>,
    pub projects: Vec<Value>,
    pub line_items: Vec<Value>,
}

impl UndecodedRecords {
    pub fn len(&self) -> usize {
        self.suppliers.len() + self.projects.len() + self.line_items.len()
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum Entry<'a, T> {
    Typed(&'a T),
    Raw(&'a Value),
}

struct Entries<'a, T>(&'a [T], &'a [Value]);

impl<T: Serialize> Serialize for Entries<'_, T> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.collect_seq(
            self.0
                .iter()
                .map(Entry::Typed)
                .chain(self.1.iter().map(Entry::Raw)),
        )
    }
}

impl Serialize for State {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let mut document = serializer.serialize_struct("State", 3)?;
        document.serialize_field(
            "suppliers",
            &Entries(&self.suppliers, &self.undecoded.suppliers),
        )?;
        document.serialize_field(
            "projects",
            &Entries(&self.projects, &self.undecoded.projects),
        )?;
        document.serialize_field(
            "lineItems",
            &Entries(&self.line_items, &self.undecoded.line_items),
        )?;
        document.end()
    }
}

impl Default for State {
    /// Fresh document with a single placeholder supplier.
    fn default() -> Self {
        Self {
            suppliers: default_suppliers(),
            projects: Vec::new(),
            line_items: Vec::new(),
            undecoded: UndecodedRecords::default(),
        }
    }
}

impl State {
    pub fn supplier(&self, id: &str) -> Option<&Supplier> {
        self.suppliers.iter().find(|supplier| supplier.id == id)
    }

    pub fn supplier_mut(&mut self, id: &str) -> Option<&mut Supplier> {
        self.suppliers.iter_mut().find(|supplier| supplier.id == id)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    pub fn project_mut(&mut self, id: &str) -> Option<&mut Project> {
        self.projects.iter_mut().find(|project| project.id == id)
    }

    /// Projects owned by `supplier_id`, in stored order.
    pub fn projects_for_supplier<'a, 's>(
        &'a self,
        supplier_id: &'s str,
    ) -> impl Iterator<Item = &'a Project> + 's
    where
        'a: 's,
    {
        self.projects
            .iter()
            .filter(move |project| project.supplier_id == supplier_id)
    }

    /// Removes a supplier together with all of its projects.
    ///
    /// Returns the number of projects removed.
    pub(crate) fn remove_supplier(&mut self, id: &SupplierId) -> usize {
        let removed = self.remove_projects_of(id);
        self.suppliers.retain(|supplier| &supplier.id != id);
        removed
    }

    /// Removes every project owned by `supplier_id` and returns how many.
    ///
    /// Undecoded project entries naming the supplier go too but are not
    /// counted.
    pub(crate) fn remove_projects_of(&mut self, supplier_id: &str) -> usize {
        let before = self.projects.len();
        self.projects
            .retain(|project| project.supplier_id != supplier_id);
        self.undecoded.projects.retain(|raw| {
            raw.get("supplierId").and_then(Value::as_str) != Some(supplier_id)
        });
        before - self.projects.len()
    }

    pub(crate) fn remove_project(&mut self, id: &ProjectId) -> bool {
        let before = self.projects.len();
        self.projects.retain(|project| &project.id != id);
        before != self.projects.len()
    }
}

/// Supplier list used when a stored document has none.
pub(crate) fn default_suppliers() -> Vec<Supplier> {
    vec![Supplier {
        id: DEFAULT_SUPPLIER_ID.to_string(),
        name: DEFAULT_SUPPLIER_NAME.to_string(),
        extra: Map::new(),
    }]
}
