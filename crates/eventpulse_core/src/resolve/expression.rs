//! Date expression resolver.
//!
//! # Responsibility
//! - Resolve one input string to midnight UTC of a calendar date.
//! - Validate the resolved year against the caller's purpose.
//!
//! # Invariants
//! - A string shaped like `MM/DD/YYYY` is never handed to other strategies;
//!   an impossible numeric date fails instead of rolling over.
//! - Errors carry enough detail to render a user-facing message.

use crate::calendar::{date_of, day_start_ms, EpochMs};
use crate::resolve::natural::{NaturalDateParser, RuleBasedDateParser};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Earliest birth year accepted.
pub const MIN_BIRTH_YEAR: i32 = 1900;
/// How many years ahead a future event may be scheduled.
pub const FUTURE_EVENT_HORIZON_YEARS: i32 = 10;

static NUMERIC_MDY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("valid numeric date regex")
});

const ABSOLUTE_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const ABSOLUTE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

pub type ResolveResult<T> = Result<T, ResolveError>;

/// Selects which year policy applies to a resolved date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePurpose {
    /// Year within `[1900, current_year]`.
    Birthday,
    /// Year within `[current_year, current_year + 10]`.
    FutureEvent,
}

impl DatePurpose {
    /// Inclusive `(min, max)` year bounds for `current_year`.
    pub fn year_bounds(self, current_year: i32) -> (i32, i32) {
        match self {
            Self::Birthday => (MIN_BIRTH_YEAR, current_year),
            Self::FutureEvent => (current_year, current_year + FUTURE_EVENT_HORIZON_YEARS),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Birthday => "birthday",
            Self::FutureEvent => "future_event",
        }
    }
}

/// Which strategy produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStrategy {
    NumericMonthDayYear,
    NaturalLanguage,
    Absolute,
}

impl ResolveStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NumericMonthDayYear => "numeric_mdy",
            Self::NaturalLanguage => "natural_language",
            Self::Absolute => "absolute",
        }
    }
}

/// Successful resolution with provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDate {
    /// Midnight UTC of the resolved date.
    pub instant: EpochMs,
    pub date: NaiveDate,
    pub strategy: ResolveStrategy,
}

/// Resolver failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No strategy produced a date.
    InvalidDateFormat { input: String },
    /// A date was produced but its year violates the purpose's policy.
    DateOutOfRange {
        year: i32,
        min_year: i32,
        max_year: i32,
        purpose: DatePurpose,
    },
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDateFormat { input } => write!(
                f,
                "could not understand the date `{input}`; use MM/DD/YYYY or a phrase like `next tuesday`"
            ),
            Self::DateOutOfRange {
                year,
                min_year,
                max_year,
                purpose,
            } => write!(
                f,
                "the year {year} seems invalid for a {}; use a year between {min_year} and {max_year}",
                purpose.as_str()
            ),
        }
    }
}

impl Error for ResolveError {}

/// Strategy-ordered date resolver.
///
/// Cheap to clone; the natural-language capability is shared.
#[derive(Clone)]
pub struct DateExpressionResolver {
    natural: Arc<dyn NaturalDateParser>,
}

impl Default for DateExpressionResolver {
    fn default() -> Self {
        Self::new(Arc::new(RuleBasedDateParser::default()))
    }
}

impl DateExpressionResolver {
    /// Creates a resolver using `natural` for strategy 2.
    pub fn new(natural: Arc<dyn NaturalDateParser>) -> Self {
        Self { natural }
    }

    /// Resolves against the current wall-clock time.
    pub fn resolve(&self, input: &str, purpose: DatePurpose) -> ResolveResult<EpochMs> {
        self.resolve_at(input, purpose, Utc::now())
    }

    /// Resolves against an explicit `now`.
    pub fn resolve_at(
        &self,
        input: &str,
        purpose: DatePurpose,
        now: DateTime<Utc>,
    ) -> ResolveResult<EpochMs> {
        self.resolve_detailed(input, purpose, now)
            .map(|resolved| resolved.instant)
    }

    /// Resolves and reports which strategy matched.
    ///
    /// # Errors
    /// - `InvalidDateFormat` when no strategy yields a date, or when the
    ///   input is numeric `MM/DD/YYYY` naming an impossible date.
    /// - `DateOutOfRange` when the year fails the purpose's policy.
    pub fn resolve_detailed(
        &self,
        input: &str,
        purpose: DatePurpose,
        now: DateTime<Utc>,
    ) -> ResolveResult<ResolvedDate> {
        let trimmed = input.trim();
        let (date, strategy) = self.parse(trimmed, now).ok_or_else(|| {
            debug!(
                "event=date_resolve module=resolve status=error reason=invalid_format purpose={} input_len={}",
                purpose.as_str(),
                trimmed.len()
            );
            ResolveError::InvalidDateFormat {
                input: trimmed.to_string(),
            }
        })?;

        let (min_year, max_year) = purpose.year_bounds(now.year());
        let year = date.year();
        if year < min_year || year > max_year {
            debug!(
                "event=date_resolve module=resolve status=error reason=out_of_range purpose={} year={} min={} max={}",
                purpose.as_str(),
                year,
                min_year,
                max_year
            );
            return Err(ResolveError::DateOutOfRange {
                year,
                min_year,
                max_year,
                purpose,
            });
        }

        debug!(
            "event=date_resolve module=resolve status=ok purpose={} strategy={}",
            purpose.as_str(),
            strategy.as_str()
        );
        Ok(ResolvedDate {
            instant: day_start_ms(date),
            date,
            strategy,
        })
    }

    fn parse(&self, input: &str, now: DateTime<Utc>) -> Option<(NaiveDate, ResolveStrategy)> {
        if input.is_empty() {
            return None;
        }

        // A numeric match is final either way.
        if let Some(caps) = NUMERIC_MDY_RE.captures(input) {
            let month: u32 = caps[1].parse().ok()?;
            let day: u32 = caps[2].parse().ok()?;
            let year: i32 = caps[3].parse().ok()?;
            let date = NaiveDate::from_ymd_opt(year, month, day)?;
            return Some((date, ResolveStrategy::NumericMonthDayYear));
        }

        if let Some(date) = self.natural.parse(input, now).and_then(date_of) {
            return Some((date, ResolveStrategy::NaturalLanguage));
        }

        parse_absolute(input).map(|date| (date, ResolveStrategy::Absolute))
    }
}

/// Generic absolute formats: RFC 3339, ISO dates and spelled-out dates.
fn parse_absolute(input: &str) -> Option<NaiveDate> {
    if let Ok(value) = DateTime::parse_from_rfc3339(input) {
        return Some(value.with_timezone(&Utc).date_naive());
    }
    if let Some(date) = ABSOLUTE_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
    {
        return Some(date);
    }
    ABSOLUTE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .map(|value| value.date())
}

/// Resolves with the built-in parser.
///
/// `now` defaults to the current wall-clock time.
pub fn resolve_date_expression(
    input: &str,
    purpose: DatePurpose,
    now: Option<DateTime<Utc>>,
) -> ResolveResult<EpochMs> {
    static DEFAULT_RESOLVER: Lazy<DateExpressionResolver> =
        Lazy::new(DateExpressionResolver::default);
    DEFAULT_RESOLVER.resolve_at(input, purpose, now.unwrap_or_else(Utc::now))
}
