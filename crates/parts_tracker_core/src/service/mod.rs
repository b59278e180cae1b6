//! Core use-case services.
//!
//! # Responsibility
//! - Own the tracker state and orchestrate persistence around mutations.
//! - Keep UI layers decoupled from storage and spreadsheet details.

pub mod confirm;
pub mod controller;
pub mod state_migration;
pub mod tracker_service;
