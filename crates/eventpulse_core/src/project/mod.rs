//! Occurrence projection.
//!
//! # Responsibility
//! - Expand one anchor into the calendar instants it hits inside a window.
//!
//! # Invariants
//! - Projection is stateless; concurrent calls never interfere.
//! - Output is ascending and inside the requested window.

pub mod projector;
