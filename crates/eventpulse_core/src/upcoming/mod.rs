//! Upcoming-occurrence aggregation.
//!
//! # Responsibility
//! - Merge birthday, custom-event and holiday projections into one timeline.
//! - Apply search filtering, deduplication and tier ceilings.
//!
//! # Invariants
//! - Output is ascending by instant with a deterministic tie-break.
//! - At most one occurrence per `(source_id, calendar year)`.

pub mod aggregator;
pub mod tier;
