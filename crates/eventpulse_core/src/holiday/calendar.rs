//! Rule-based holiday calendar.
//!
//! # Invariants
//! - Every holiday resolves to at most one date per year.
//! - Record source IDs are `holiday:<slug>` and stable across years, so the
//!   aggregator dedupes by `(source_id, year)`.
//! - Holiday records are always `Recurrence::Once`; a new record is produced
//!   per year instead of repeating one anchor.

use crate::calendar::{
    calendar_ms_range, date_of, easter_sunday, last_weekday_of_month, nth_weekday_of_month,
    EpochMs,
};
use crate::model::anchor::AnchorRecord;
use crate::model::occurrence::QueryWindow;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Source ID prefix for holiday records.
pub const HOLIDAY_SOURCE_PREFIX: &str = "holiday:";

/// How a holiday's date is derived for a given year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum HolidayRule {
    /// Same month/day every year.
    Fixed { month: u32, day: u32 },
    /// `n`-th weekday of a month, e.g. fourth Thursday of November.
    NthWeekday { month: u32, weekday: Weekday, n: u32 },
    /// Last weekday of a month, e.g. last Monday of May.
    LastWeekday { month: u32, weekday: Weekday },
    /// Offset in days from Western Easter Sunday.
    EasterOffset { days: i64 },
}

impl HolidayRule {
    pub fn date_in(&self, year: i32) -> Option<NaiveDate> {
        match *self {
            Self::Fixed { month, day } => NaiveDate::from_ymd_opt(year, month, day),
            Self::NthWeekday { month, weekday, n } => {
                nth_weekday_of_month(year, month, weekday, n)
            }
            Self::LastWeekday { month, weekday } => last_weekday_of_month(year, month, weekday),
            Self::EasterOffset { days } => {
                easter_sunday(year)?.checked_add_signed(Duration::try_days(days)?)
            }
        }
    }
}

/// One named holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// Stable identifier, lowercase with dashes.
    pub slug: String,
    pub name: String,
    /// Extra spellings accepted by [`HolidayCalendar::find`].
    #[serde(default)]
    pub aliases: Vec<String>,
    pub rule: HolidayRule,
}

impl Holiday {
    pub fn new(slug: &str, name: &str, aliases: &[&str], rule: HolidayRule) -> Self {
        Self {
            slug: slug.to_string(),
            name: name.to_string(),
            aliases: aliases.iter().map(|alias| alias.to_string()).collect(),
            rule,
        }
    }

    pub fn source_id(&self) -> String {
        format!("{HOLIDAY_SOURCE_PREFIX}{}", self.slug)
    }

    fn matches(&self, normalized: &str) -> bool {
        normalize_name(&self.name) == normalized
            || normalize_name(&self.slug.replace('-', " ")) == normalized
            || self
                .aliases
                .iter()
                .any(|alias| normalize_name(alias) == normalized)
    }
}

/// Holiday reference data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayCalendar {
    holidays: Vec<Holiday>,
}

impl Default for HolidayCalendar {
    fn default() -> Self {
        Self::greeting()
    }
}

impl HolidayCalendar {
    pub fn new(holidays: Vec<Holiday>) -> Self {
        Self { holidays }
    }

    /// Greeting-card holidays observed in the US.
    pub fn greeting() -> Self {
        use HolidayRule::{EasterOffset, Fixed, LastWeekday, NthWeekday};

        Self::new(vec![
            Holiday::new(
                "new-years-day",
                "New Year's Day",
                &["new year", "new years"],
                Fixed { month: 1, day: 1 },
            ),
            Holiday::new(
                "valentines-day",
                "Valentine's Day",
                &["valentines"],
                Fixed { month: 2, day: 14 },
            ),
            Holiday::new(
                "st-patricks-day",
                "St. Patrick's Day",
                &["saint patricks day", "st patricks"],
                Fixed { month: 3, day: 17 },
            ),
            Holiday::new("easter", "Easter", &["easter sunday"], EasterOffset { days: 0 }),
            Holiday::new(
                "mothers-day",
                "Mother's Day",
                &[],
                NthWeekday {
                    month: 5,
                    weekday: Weekday::Sun,
                    n: 2,
                },
            ),
            Holiday::new(
                "memorial-day",
                "Memorial Day",
                &[],
                LastWeekday {
                    month: 5,
                    weekday: Weekday::Mon,
                },
            ),
            Holiday::new(
                "fathers-day",
                "Father's Day",
                &[],
                NthWeekday {
                    month: 6,
                    weekday: Weekday::Sun,
                    n: 3,
                },
            ),
            Holiday::new(
                "independence-day",
                "Independence Day",
                &["fourth of july", "4th of july", "july 4th"],
                Fixed { month: 7, day: 4 },
            ),
            Holiday::new(
                "labor-day",
                "Labor Day",
                &[],
                NthWeekday {
                    month: 9,
                    weekday: Weekday::Mon,
                    n: 1,
                },
            ),
            Holiday::new("halloween", "Halloween", &[], Fixed { month: 10, day: 31 }),
            Holiday::new(
                "thanksgiving",
                "Thanksgiving",
                &["thanksgiving day"],
                NthWeekday {
                    month: 11,
                    weekday: Weekday::Thu,
                    n: 4,
                },
            ),
            Holiday::new(
                "christmas-eve",
                "Christmas Eve",
                &[],
                Fixed { month: 12, day: 24 },
            ),
            Holiday::new(
                "christmas",
                "Christmas",
                &["christmas day", "xmas"],
                Fixed { month: 12, day: 25 },
            ),
            Holiday::new(
                "new-years-eve",
                "New Year's Eve",
                &["nye"],
                Fixed { month: 12, day: 31 },
            ),
        ])
    }

    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }

    /// Looks up a holiday by name, slug or alias, ignoring case and
    /// apostrophes.
    pub fn find(&self, name: &str) -> Option<&Holiday> {
        let normalized = normalize_name(name);
        if normalized.is_empty() {
            return None;
        }
        self.holidays
            .iter()
            .find(|holiday| holiday.matches(&normalized))
    }

    /// First date of the named holiday on or after `on_or_after`.
    pub fn next_occurrence(&self, name: &str, on_or_after: NaiveDate) -> Option<NaiveDate> {
        let holiday = self.find(name)?;
        let year = on_or_after.year();
        [year, year + 1]
            .into_iter()
            .filter_map(|candidate| holiday.rule.date_in(candidate))
            .find(|date| *date >= on_or_after)
    }

    /// One-off records for every holiday in `year`.
    pub fn records_for_year(&self, year: i32) -> Vec<AnchorRecord> {
        self.holidays
            .iter()
            .filter_map(|holiday| {
                let date = holiday.rule.date_in(year)?;
                Some(AnchorRecord::once(
                    holiday.source_id(),
                    holiday.name.clone(),
                    date.year(),
                    date.month(),
                    date.day(),
                ))
            })
            .collect()
    }

    /// One-off records for every year `window` touches.
    ///
    /// Records outside the window are left for the projector to drop. Bounds
    /// beyond the calendar are clamped to it; a reversed window or one lying
    /// entirely outside the calendar yields an empty list.
    pub fn records_for_window(&self, window: &QueryWindow) -> Vec<AnchorRecord> {
        let (min_ms, max_ms) = calendar_ms_range();
        let start = window.start.max(min_ms);
        let end = window.end.min(max_ms);
        let (Some(start_year), Some(end_year)) = (year_of(start), year_of(end)) else {
            return Vec::new();
        };
        if start_year > end_year {
            return Vec::new();
        }
        (start_year..=end_year)
            .flat_map(|year| self.records_for_year(year))
            .collect()
    }
}

fn year_of(ms: EpochMs) -> Option<i32> {
    date_of(ms).map(|date| date.year())
}

fn normalize_name(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .replace(['\'', '’', '.'], "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::{normalize_name, HolidayCalendar, HolidayRule};
    use chrono::NaiveDate;

    #[test]
    fn normalize_name_strips_punctuation_and_case() {
        assert_eq!(normalize_name("  Mother’s  Day "), "mothers day");
        assert_eq!(normalize_name("St. Patrick's Day"), "st patricks day");
    }

    #[test]
    fn find_accepts_slug_name_and_alias() {
        let calendar = HolidayCalendar::greeting();
        assert_eq!(calendar.find("xmas").unwrap().slug, "christmas");
        assert_eq!(calendar.find("Mother's Day").unwrap().slug, "mothers-day");
        assert_eq!(calendar.find("new years eve").unwrap().slug, "new-years-eve");
        assert!(calendar.find("   ").is_none());
        assert!(calendar.find("arbor day").is_none());
    }

    #[test]
    fn next_occurrence_rolls_into_next_year() {
        let calendar = HolidayCalendar::greeting();
        let after_christmas = NaiveDate::from_ymd_opt(2025, 12, 26).unwrap();
        assert_eq!(
            calendar.next_occurrence("christmas", after_christmas),
            NaiveDate::from_ymd_opt(2026, 12, 25)
        );
        let christmas = NaiveDate::from_ymd_opt(2025, 12, 25).unwrap();
        assert_eq!(calendar.next_occurrence("christmas", christmas), Some(christmas));
    }

    #[test]
    fn oversized_easter_offset_yields_no_date() {
        let rule = HolidayRule::EasterOffset { days: i64::MAX };
        assert_eq!(rule.date_in(2025), None);
        let rule = HolidayRule::EasterOffset { days: -1_000_000_000 };
        assert_eq!(rule.date_in(2025), None);
        let rule = HolidayRule::EasterOffset { days: -2 };
        assert_eq!(rule.date_in(2025), NaiveDate::from_ymd_opt(2025, 4, 18));
    }
}
