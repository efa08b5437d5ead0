//! Request facade services.
//!
//! # Responsibility
//! - Accept typed, validated requests from the presentation boundary.
//! - Delegate each request to exactly one store operation.
//!
//! # Invariants
//! - Storage errors pass through unchanged inside `ServiceError::Store`.
//! - The facade keeps no cache; callers own their state.

pub mod clinic_service;
