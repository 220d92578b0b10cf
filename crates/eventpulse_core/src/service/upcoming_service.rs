//! Upcoming-events use-case service.
//!
//! # Responsibility
//! - Pull records from an `EventSource`, reduce them to anchors and run the
//!   aggregator with tier-aware ceilings.
//! - Provide a never-panicking response envelope for tool-call handlers.
//!
//! # Invariants
//! - Service APIs never bypass aggregator validation.
//! - The service stays storage-agnostic; it only sees `EventSource`.

use crate::calendar::EpochMs;
use crate::config::EngineConfig;
use crate::holiday::calendar::HolidayCalendar;
use crate::model::anchor::AnchorRecord;
use crate::model::occurrence::{Occurrence, QueryWindow};
use crate::source::records::EventSource;
use crate::upcoming::aggregator::{
    aggregate_upcoming, AggregateResult, UpcomingError, UpcomingQuery, UpcomingReport,
};
use crate::upcoming::tier::{SubscriptionTier, TierLimits};
use log::warn;
use serde::Serialize;

/// One upcoming-events request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingRequest {
    pub window: QueryWindow,
    pub tier: SubscriptionTier,
    pub search_term: Option<String>,
    pub include_holidays: bool,
    /// Reference instant for `days_until`.
    pub now: EpochMs,
}

/// Response envelope for assistant tool calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingEventsResponse {
    /// Whether the query succeeded.
    pub ok: bool,
    pub occurrences: Vec<Occurrence>,
    /// Aggregator summary on success, empty on failure.
    pub summary: String,
    /// Ceiling that was applied.
    pub applied_limit: usize,
    /// Error text on failure, empty on success.
    pub message: String,
}

impl UpcomingEventsResponse {
    fn success(report: UpcomingReport, applied_limit: usize) -> Self {
        Self {
            ok: true,
            occurrences: report.occurrences,
            summary: report.summary,
            applied_limit,
            message: String::new(),
        }
    }

    fn failure(message: impl Into<String>, applied_limit: usize) -> Self {
        Self {
            ok: false,
            occurrences: Vec::new(),
            summary: String::new(),
            applied_limit,
            message: message.into(),
        }
    }
}

/// Use-case service wrapper over one record source.
pub struct UpcomingService<S: EventSource> {
    source: S,
    holidays: HolidayCalendar,
    limits: TierLimits,
    default_days_ahead: u32,
    include_holidays: bool,
}

impl<S: EventSource> UpcomingService<S> {
    /// Creates a service with default configuration.
    pub fn new(source: S) -> Self {
        Self::with_config(source, &EngineConfig::default())
    }

    /// Creates a service using `config` for ceilings and defaults.
    pub fn with_config(source: S, config: &EngineConfig) -> Self {
        Self {
            source,
            holidays: HolidayCalendar::greeting(),
            limits: config.tier_limits,
            default_days_ahead: config.default_days_ahead,
            include_holidays: config.include_holidays,
        }
    }

    /// Replaces the holiday reference data.
    pub fn with_holidays(mut self, holidays: HolidayCalendar) -> Self {
        self.holidays = holidays;
        self
    }

    pub fn limits(&self) -> TierLimits {
        self.limits
    }

    /// Runs one aggregation over the source's current records.
    ///
    /// # Errors
    /// - Source, record-reduction, window and projection errors unchanged.
    pub fn upcoming(&self, request: &UpcomingRequest) -> AggregateResult<UpcomingReport> {
        let recipients = self
            .source
            .recipients()?
            .iter()
            .map(|recipient| recipient.to_anchor_record())
            .collect::<AggregateResult<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();
        let events = self
            .source
            .custom_events()?
            .iter()
            .map(|event| event.to_anchor_record())
            .collect::<AggregateResult<Vec<_>>>()?;
        let holidays: Vec<AnchorRecord> = if request.include_holidays {
            self.holidays.records_for_window(&request.window)
        } else {
            Vec::new()
        };

        let mut query = UpcomingQuery::new(
            request.window,
            self.limits.ceiling_for(request.tier),
            request.now,
        );
        query.search_term = request.search_term.clone();

        aggregate_upcoming(&query, &recipients, &events, &holidays)
    }

    /// Upcoming occurrences from the day of `now` through `days_ahead` days.
    ///
    /// `None` uses the configured default look-ahead; holidays follow the
    /// configured default.
    ///
    /// # Errors
    /// - `DaysAheadOutOfRange` when the look-ahead leaves the calendar range.
    /// - Everything [`UpcomingService::upcoming`] returns.
    pub fn upcoming_for_days(
        &self,
        days_ahead: Option<u32>,
        tier: SubscriptionTier,
        search_term: Option<&str>,
        now: EpochMs,
    ) -> AggregateResult<UpcomingReport> {
        let days = days_ahead.unwrap_or(self.default_days_ahead);
        let window = QueryWindow::upcoming_days(now, days).ok_or(
            UpcomingError::DaysAheadOutOfRange {
                now,
                days_ahead: days,
            },
        )?;
        self.upcoming(&UpcomingRequest {
            window,
            tier,
            search_term: search_term.map(str::to_string),
            include_holidays: self.include_holidays,
            now,
        })
    }

    /// Tool-call entry point. Never panics; failures land in `message`.
    pub fn upcoming_events_response(
        &self,
        days_ahead: Option<u32>,
        tier: SubscriptionTier,
        search_term: Option<&str>,
        now: EpochMs,
    ) -> UpcomingEventsResponse {
        let applied_limit = self.limits.ceiling_for(tier);
        match self.upcoming_for_days(days_ahead, tier, search_term, now) {
            Ok(report) => UpcomingEventsResponse::success(report, applied_limit),
            Err(err) => {
                warn!(
                    "event=upcoming_response module=service status=error applied_limit={}",
                    applied_limit
                );
                UpcomingEventsResponse::failure(
                    format!("upcoming events failed: {err}"),
                    applied_limit,
                )
            }
        }
    }
}
