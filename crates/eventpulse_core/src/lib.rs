//! Occurrence engine for EventPulse.
//!
//! Resolves typed date expressions, projects birthdays, custom events and
//! holidays onto calendar windows, and merges them into one upcoming
//! timeline. Pure computation: no I/O, no shared mutable state.

pub mod calendar;
pub mod config;
pub mod holiday;
pub mod logging;
pub mod model;
pub mod project;
pub mod resolve;
pub mod service;
pub mod source;
pub mod upcoming;

pub use calendar::{EpochMs, MS_PER_DAY};
pub use config::{ConfigError, EngineConfig};
pub use holiday::calendar::{Holiday, HolidayCalendar, HolidayRule};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::anchor::{AnchorDate, AnchorRecord, Recurrence};
pub use model::occurrence::{Occurrence, OccurrenceKind, QueryWindow};
pub use project::projector::{project_occurrences, ProjectionError, ProjectionResult};
pub use resolve::expression::{
    resolve_date_expression, DateExpressionResolver, DatePurpose, ResolveError, ResolveResult,
    ResolveStrategy, ResolvedDate,
};
pub use resolve::natural::{NaturalDateParser, RuleBasedDateParser};
pub use service::upcoming_service::{UpcomingEventsResponse, UpcomingRequest, UpcomingService};
pub use source::records::{CustomEventRecord, EventSource, InMemoryEventSource, RecipientRecord};
pub use upcoming::aggregator::{
    aggregate_upcoming, days_until, AggregateResult, UpcomingError, UpcomingQuery, UpcomingReport,
};
pub use upcoming::tier::{SubscriptionTier, TierLimits};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
