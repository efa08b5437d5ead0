//! Clinic domain model.
//!
//! # Responsibility
//! - Define typed records for appointments and billing rows.
//! - Define the validated request shapes accepted by the request facade.
//!
//! # Invariants
//! - Ids are store-assigned integers and never reused by SQLite AUTOINCREMENT.
//! - A bill is a query-time grouping of billing rows, not a stored entity.
//! - Wire names are camelCase to match the persisted column names.

pub mod appointment;
pub mod billing;
pub mod validation;
