//! Occurrence value type and query window.
//!
//! # Invariants
//! - `Occurrence::occurs_at` lies inside the window it was produced for.
//! - `QueryWindow` bounds are inclusive; `start <= end` for a valid window.

use crate::calendar::{date_of, day_end_ms, day_start_ms, EpochMs};
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Category of an occurrence. Also decides tie-break priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccurrenceKind {
    Birthday,
    CustomEvent,
    Holiday,
}

impl OccurrenceKind {
    /// Sort rank for equal instants; lower sorts first.
    pub fn priority(self) -> u8 {
        match self {
            Self::CustomEvent => 0,
            Self::Birthday => 1,
            Self::Holiday => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Birthday => "birthday",
            Self::CustomEvent => "custom_event",
            Self::Holiday => "holiday",
        }
    }
}

/// One calendar occurrence of a source entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub kind: OccurrenceKind,
    pub label: String,
    /// Opaque ID of the originating entity.
    pub source_id: String,
    /// Midnight UTC of the occurrence date, epoch milliseconds.
    pub occurs_at: EpochMs,
    pub recurring: bool,
    /// `ceil((occurs_at - now) / day)` at aggregation time.
    pub days_until: i64,
}

/// Inclusive `[start, end]` range of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryWindow {
    pub start: EpochMs,
    pub end: EpochMs,
}

impl QueryWindow {
    /// Creates a window without checking bound order.
    ///
    /// Use [`QueryWindow::is_valid`] or let the aggregator reject it.
    pub fn new(start: EpochMs, end: EpochMs) -> Self {
        Self { start, end }
    }

    /// Window covering whole UTC days from the day of `now` through
    /// `days_ahead` days later.
    ///
    /// Starts at midnight of `now`'s day so that an occurrence today is still
    /// "upcoming" with `days_until == 0`.
    pub fn upcoming_days(now: EpochMs, days_ahead: u32) -> Option<Self> {
        let today = date_of(now)?;
        let last = today.checked_add_signed(Duration::days(i64::from(days_ahead)))?;
        Some(Self::new(day_start_ms(today), day_end_ms(last)))
    }

    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    pub fn contains(&self, instant: EpochMs) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Signed ceiling division for a positive divisor.
///
/// Saturates at `i64::MIN` instead of overflowing on negation.
pub(crate) fn ceil_div(numerator: i64, divisor: i64) -> i64 {
    -(numerator.saturating_neg().div_euclid(divisor))
}

#[cfg(test)]
mod tests {
    use super::{ceil_div, OccurrenceKind, QueryWindow};
    use crate::calendar::MS_PER_DAY;

    #[test]
    fn kind_priority_orders_custom_then_birthday_then_holiday() {
        assert!(OccurrenceKind::CustomEvent.priority() < OccurrenceKind::Birthday.priority());
        assert!(OccurrenceKind::Birthday.priority() < OccurrenceKind::Holiday.priority());
    }

    #[test]
    fn ceil_div_rounds_toward_positive_infinity() {
        assert_eq!(ceil_div(0, MS_PER_DAY), 0);
        assert_eq!(ceil_div(1, MS_PER_DAY), 1);
        assert_eq!(ceil_div(MS_PER_DAY, MS_PER_DAY), 1);
        assert_eq!(ceil_div(-1, MS_PER_DAY), 0);
        assert_eq!(ceil_div(-MS_PER_DAY - 1, MS_PER_DAY), -1);
        assert_eq!(ceil_div(i64::MIN, MS_PER_DAY), -(i64::MAX / MS_PER_DAY));
        assert_eq!(ceil_div(i64::MAX, MS_PER_DAY), i64::MAX / MS_PER_DAY + 1);
    }

    #[test]
    fn upcoming_days_spans_whole_days() {
        // 2025-03-18T15:00:00Z
        let now = 1_742_310_000_000;
        let window = QueryWindow::upcoming_days(now, 7).unwrap();
        assert_eq!(window.start, 1_742_256_000_000);
        assert_eq!(window.end, 1_742_256_000_000 + 8 * MS_PER_DAY - 1);
        assert!(window.is_valid());
        assert!(window.contains(now));
    }

    #[test]
    fn reversed_window_is_invalid() {
        assert!(!QueryWindow::new(10, 5).is_valid());
        assert!(QueryWindow::new(5, 5).is_valid());
    }
}
