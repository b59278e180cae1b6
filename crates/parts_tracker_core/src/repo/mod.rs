//! Persistence adapter over a key-value substrate.
//!
//! # Responsibility
//! - Define the key-value contract the tracker persists through.
//! - Encode/decode the whole state document as one JSON value.
//!
//! # Invariants
//! - Writes replace the whole document; there are no partial updates.
//! - Unreadable stored documents are reported as absent, never as errors.

pub mod kv_store;
pub mod state_repo;
