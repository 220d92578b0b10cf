//! Upcoming timeline aggregation.
//!
//! # Responsibility
//! - Project every recipient, custom-event and holiday anchor over one window.
//! - Produce an ordered, deduplicated, filtered and truncated timeline.
//!
//! # Invariants
//! - Recipients are always projected as annual birthdays; holidays always as
//!   one-off dates; custom events use their own recurrence tag.
//! - Sort key: `occurs_at`, then kind priority
//!   (`custom_event < birthday < holiday`), then label, then source ID.
//! - Dedupe keeps the first occurrence per `(source_id, calendar year)`.
//! - The ceiling applies after the search filter.
//! - `days_until` is never clamped; a window starting before `now` can yield
//!   negative values.

use crate::calendar::{date_of, EpochMs, MS_PER_DAY};
use crate::model::anchor::{AnchorRecord, Recurrence};
use crate::model::occurrence::{ceil_div, Occurrence, OccurrenceKind, QueryWindow};
use crate::project::projector::{project_occurrences, ProjectionError};
use chrono::Datelike;
use log::debug;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AggregateResult<T> = Result<T, UpcomingError>;

/// Aggregation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpcomingError {
    /// Window start is after its end. Bounds are never swapped.
    InvalidWindow { start: EpochMs, end: EpochMs },
    /// An anchor could not be projected.
    Projection(ProjectionError),
    /// An external record could not be reduced to an anchor.
    InvalidRecord { source_id: String, reason: String },
    /// A look-ahead reaches past the representable calendar.
    DaysAheadOutOfRange { now: EpochMs, days_ahead: u32 },
}

impl Display for UpcomingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidWindow { start, end } => {
                write!(f, "invalid query window: start {start} is after end {end}")
            }
            Self::Projection(err) => write!(f, "{err}"),
            Self::InvalidRecord { source_id, reason } => {
                write!(f, "invalid record `{source_id}`: {reason}")
            }
            Self::DaysAheadOutOfRange { now, days_ahead } => write!(
                f,
                "looking {days_ahead} days ahead of {now} leaves the calendar range"
            ),
        }
    }
}

impl Error for UpcomingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Projection(err) => Some(err),
            Self::InvalidWindow { .. }
            | Self::InvalidRecord { .. }
            | Self::DaysAheadOutOfRange { .. } => None,
        }
    }
}

impl From<ProjectionError> for UpcomingError {
    fn from(value: ProjectionError) -> Self {
        Self::Projection(value)
    }
}

/// Parameters of one aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingQuery {
    pub window: QueryWindow,
    /// Maximum number of occurrences returned.
    pub ceiling: usize,
    /// Case-insensitive label substring. Blank means no filter.
    pub search_term: Option<String>,
    /// Reference instant for `days_until`.
    pub now: EpochMs,
}

impl UpcomingQuery {
    pub fn new(window: QueryWindow, ceiling: usize, now: EpochMs) -> Self {
        Self {
            window,
            ceiling,
            search_term: None,
            now,
        }
    }

    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    /// Lowercased, trimmed term, or `None` when blank.
    fn normalized_term(&self) -> Option<String> {
        self.search_term
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
    }
}

/// Aggregation output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingReport {
    /// Ascending, deduplicated, truncated occurrences.
    pub occurrences: Vec<Occurrence>,
    /// Human-readable count/window/filter description.
    pub summary: String,
    /// Matches before the ceiling was applied.
    pub total_matched: usize,
    /// Whether the ceiling dropped any matches.
    pub truncated: bool,
}

/// Merges all anchor sets into one upcoming timeline.
///
/// # Errors
/// - `InvalidWindow` when `query.window.start > query.window.end`.
/// - `Projection` when any anchor is malformed.
pub fn aggregate_upcoming(
    query: &UpcomingQuery,
    recipients: &[AnchorRecord],
    events: &[AnchorRecord],
    holidays: &[AnchorRecord],
) -> AggregateResult<UpcomingReport> {
    let window = query.window;
    if !window.is_valid() {
        return Err(UpcomingError::InvalidWindow {
            start: window.start,
            end: window.end,
        });
    }

    let mut candidates = Vec::new();
    for record in recipients {
        project_record(
            &mut candidates,
            record,
            OccurrenceKind::Birthday,
            Recurrence::Annual,
            query,
        )?;
    }
    for record in events {
        project_record(
            &mut candidates,
            record,
            OccurrenceKind::CustomEvent,
            record.recurrence,
            query,
        )?;
    }
    for record in holidays {
        project_record(
            &mut candidates,
            record,
            OccurrenceKind::Holiday,
            Recurrence::Once,
            query,
        )?;
    }
    let projected = candidates.len();

    let term = query.normalized_term();
    if let Some(term) = term.as_deref() {
        candidates.retain(|occurrence| occurrence.label.to_lowercase().contains(term));
    }

    candidates.sort_by(compare_occurrences);

    let mut seen = HashSet::new();
    candidates.retain(|occurrence| {
        let year = date_of(occurrence.occurs_at).map(|date| date.year());
        seen.insert((occurrence.source_id.clone(), year))
    });

    let total_matched = candidates.len();
    let truncated = total_matched > query.ceiling;
    candidates.truncate(query.ceiling);

    let summary = summarize(
        candidates.len(),
        total_matched,
        &window,
        term.as_deref(),
    );
    debug!(
        "event=upcoming_aggregate module=upcoming status=ok projected={} matched={} returned={} truncated={} filtered={}",
        projected,
        total_matched,
        candidates.len(),
        truncated,
        term.is_some()
    );

    Ok(UpcomingReport {
        occurrences: candidates,
        summary,
        total_matched,
        truncated,
    })
}

fn project_record(
    out: &mut Vec<Occurrence>,
    record: &AnchorRecord,
    kind: OccurrenceKind,
    recurrence: Recurrence,
    query: &UpcomingQuery,
) -> AggregateResult<()> {
    let instants = project_occurrences(&record.anchor, recurrence, &query.window)?;
    out.extend(instants.into_iter().map(|occurs_at| Occurrence {
        kind,
        label: record.label.clone(),
        source_id: record.source_id.clone(),
        occurs_at,
        recurring: recurrence.is_recurring(),
        days_until: days_until(occurs_at, query.now),
    }));
    Ok(())
}

/// `ceil((occurs_at - now) / day)`.
pub fn days_until(occurs_at: EpochMs, now: EpochMs) -> i64 {
    ceil_div(occurs_at.saturating_sub(now), MS_PER_DAY)
}

fn compare_occurrences(left: &Occurrence, right: &Occurrence) -> Ordering {
    left.occurs_at
        .cmp(&right.occurs_at)
        .then_with(|| left.kind.priority().cmp(&right.kind.priority()))
        .then_with(|| left.label.cmp(&right.label))
        .then_with(|| left.source_id.cmp(&right.source_id))
}

fn summarize(returned: usize, total: usize, window: &QueryWindow, term: Option<&str>) -> String {
    let range = format!(
        "between {} and {}",
        format_day(window.start),
        format_day(window.end)
    );
    let filter = term
        .map(|term| format!(" matching \"{term}\""))
        .unwrap_or_default();

    if total == 0 {
        return format!("No upcoming occurrences {range}{filter}.");
    }

    let noun = if total == 1 {
        "occurrence"
    } else {
        "occurrences"
    };
    let mut summary = format!("Found {total} upcoming {noun} {range}{filter}");
    if returned < total {
        summary.push_str(&format!(" (showing first {returned})"));
    }
    summary.push('.');
    summary
}

fn format_day(ms: EpochMs) -> String {
    date_of(ms)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| ms.to_string())
}
