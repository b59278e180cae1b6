//! Whole-document load/save for the tracker state.
//!
//! # Responsibility
//! - Read the stored JSON blob and hand it to the state migration.
//! - Serialize and write the full state back under one key.
//!
//! # Invariants
//! - Malformed stored text is logged and treated as absent.

use crate::model::state::State;
use crate::repo::kv_store::{KeyValueStore, StoreResult};
use log::{debug, warn};
use serde_json::Value;

/// Key the tracker document is stored under by default.
pub const DEFAULT_STORAGE_KEY: &str = "supplierPartsTracker";

/// Loads and saves the tracker document through a key-value store.
pub struct StateRepository<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> StateRepository<S> {
    /// Uses `DEFAULT_STORAGE_KEY`.
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the stored document as untyped JSON.
    ///
    /// Returns `Ok(None)` when nothing is stored or the text is not JSON.
    /// Storage transport failures are still returned as errors.
    pub fn load_document(&self) -> StoreResult<Option<Value>> {
        let Some(raw) = self.store.get(&self.key)? else {
            debug!("event=state_load module=repo status=absent");
            return Ok(None);
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(document) => {
                debug!(
                    "event=state_load module=repo status=ok bytes={}",
                    raw.len()
                );
                Ok(Some(document))
            }
            Err(err) => {
                warn!(
                    "event=state_load module=repo status=corrupt bytes={} error={}",
                    raw.len(),
                    err
                );
                Ok(None)
            }
        }
    }

    /// Serializes and writes the complete state.
    pub fn save(&self, state: &State) -> StoreResult<()> {
        let encoded = serde_json::to_string(state)?;
        self.store.set(&self.key, &encoded)?;
        debug!(
            "event=state_save module=repo status=ok suppliers={} projects={} bytes={}",
            state.suppliers.len(),
            state.projects.len(),
            encoded.len()
        );
        Ok(())
    }
}
