//! Read-only access to externally owned records.
//!
//! # Responsibility
//! - Define the record shapes the surrounding application stores.
//! - Reduce those records to anchor records before they enter the engine.
//!
//! # Invariants
//! - The engine never mutates a source record.

pub mod records;
