//! Date expression resolution.
//!
//! # Responsibility
//! - Turn user-typed or tool-supplied date strings into absolute instants.
//! - Enforce purpose-specific year policies with structured errors.
//!
//! # Invariants
//! - Strategy order is fixed: numeric `MM/DD/YYYY`, natural language, then
//!   generic absolute formats.
//! - Resolution is pure apart from the injected `now`.

pub mod expression;
pub mod natural;
