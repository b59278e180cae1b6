//! Domain model for suppliers, their projects and line-item counts.
//!
//! # Responsibility
//! - Define the canonical records held in the tracker state document.
//! - Own the count invariants shared by every mutation path.
//!
//! # Invariants
//! - Every project satisfies `received <= total_line_items`.
//! - Identifiers are assigned once and never reused.

pub mod count;
pub mod id;
pub mod project;
pub mod query;
pub mod state;
pub mod summary;
pub mod supplier;
