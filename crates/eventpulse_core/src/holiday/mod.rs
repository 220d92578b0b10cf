//! Holiday reference data.
//!
//! # Responsibility
//! - Describe greeting holidays as per-year date rules.
//! - Materialize one-off anchor records for every year a window touches.
//!
//! # See also
//! - `upcoming::aggregator` for how holiday records are merged.

pub mod calendar;
