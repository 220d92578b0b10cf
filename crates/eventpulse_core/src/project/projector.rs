//! Anchor-to-instant projection with annual wraparound.
//!
//! # Invariants
//! - `Recurrence::Once` yields at most one instant: its own date, if inside.
//! - `Recurrence::Annual` scans the window's years with one year of slack on
//!   both sides, so windows crossing Dec 31 need no special handling.
//! - A recurring Feb 29 lands on Feb 28 in non-leap years.
//! - Window bounds are clamped to the representable calendar range; an
//!   open-ended window is valid for every anchor.

use crate::calendar::{
    calendar_ms_range, date_of, day_start_ms, is_leap_year, max_day_of_month, EpochMs,
};
use crate::model::anchor::{AnchorDate, Recurrence};
use crate::model::occurrence::QueryWindow;
use chrono::{Datelike, NaiveDate};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ProjectionResult<T> = Result<T, ProjectionError>;

/// Projection failures. Always a contract violation upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    /// Anchor cannot name a calendar date.
    InvalidAnchor { anchor: AnchorDate, reason: String },
}

impl Display for ProjectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAnchor { anchor, reason } => write!(
                f,
                "invalid anchor date (year={:?}, month={}, day={}): {reason}",
                anchor.year, anchor.month, anchor.day
            ),
        }
    }
}

impl Error for ProjectionError {}

/// Projects `anchor` into every matching instant inside `window`.
///
/// Instants are midnight UTC of each occurrence date, ascending. A window
/// with `start > end` contains nothing and yields an empty list. Recurring
/// anchors cost one step per year the window covers after clamping.
///
/// # Errors
/// - `InvalidAnchor` for month/day outside the calendar, or a one-off anchor
///   without a year or with a date its year does not have.
pub fn project_occurrences(
    anchor: &AnchorDate,
    recurrence: Recurrence,
    window: &QueryWindow,
) -> ProjectionResult<Vec<EpochMs>> {
    validate_month_day(anchor)?;

    match recurrence {
        Recurrence::Once => project_once(anchor, window),
        Recurrence::Annual => project_annual(anchor, window),
    }
}

fn project_once(anchor: &AnchorDate, window: &QueryWindow) -> ProjectionResult<Vec<EpochMs>> {
    let Some(year) = anchor.year else {
        return Err(invalid(anchor, "one-off anchor requires a year"));
    };
    let date = NaiveDate::from_ymd_opt(year, anchor.month, anchor.day)
        .ok_or_else(|| invalid(anchor, "date does not exist in its year"))?;

    let instant = day_start_ms(date);
    if window.contains(instant) {
        Ok(vec![instant])
    } else {
        Ok(Vec::new())
    }
}

fn project_annual(anchor: &AnchorDate, window: &QueryWindow) -> ProjectionResult<Vec<EpochMs>> {
    if !window.is_valid() {
        return Ok(Vec::new());
    }

    let (min_ms, max_ms) = calendar_ms_range();
    let start = window.start.max(min_ms);
    let end = window.end.min(max_ms);
    let (Some(start_date), Some(end_date)) = (date_of(start), date_of(end)) else {
        return Ok(Vec::new());
    };
    if start > end {
        return Ok(Vec::new());
    }
    let (start_year, end_year) = (start_date.year(), end_date.year());

    let mut instants = Vec::new();
    for year in start_year.saturating_sub(1)..=end_year.saturating_add(1) {
        let Some(date) = annual_date_in(anchor, year) else {
            continue;
        };
        let instant = day_start_ms(date);
        if window.contains(instant) {
            instants.push(instant);
        }
    }
    Ok(instants)
}

/// Calendar date of a recurring anchor in `year`, applying the Feb 29 rule.
pub fn annual_date_in(anchor: &AnchorDate, year: i32) -> Option<NaiveDate> {
    if anchor.is_leap_day() && !is_leap_year(year) {
        return NaiveDate::from_ymd_opt(year, 2, 28);
    }
    NaiveDate::from_ymd_opt(year, anchor.month, anchor.day)
}

fn validate_month_day(anchor: &AnchorDate) -> ProjectionResult<()> {
    let Some(max_day) = max_day_of_month(anchor.month) else {
        return Err(invalid(anchor, "month must be within 1..=12"));
    };
    if anchor.day == 0 || anchor.day > max_day {
        return Err(invalid(
            anchor,
            &format!("day must be within 1..={max_day} for month {}", anchor.month),
        ));
    }
    Ok(())
}

fn invalid(anchor: &AnchorDate, reason: &str) -> ProjectionError {
    ProjectionError::InvalidAnchor {
        anchor: *anchor,
        reason: reason.to_string(),
    }
}
