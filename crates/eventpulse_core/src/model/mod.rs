//! Domain model for occurrence projection.
//!
//! # Responsibility
//! - Define the anchor shapes that enter the engine and the occurrence shape
//!   that leaves it.
//! - Keep recurrence an explicit tag so projection has one code path.
//!
//! # Invariants
//! - Source records are never owned or mutated; anchors are snapshots.
//! - Occurrences are ephemeral and computed fresh per query.

pub mod anchor;
pub mod occurrence;
