//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate record sources and the aggregator into use-case APIs.
//! - Keep tool-call handlers decoupled from storage details.

pub mod upcoming_service;
