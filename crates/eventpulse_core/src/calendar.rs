//! Calendar arithmetic shared by resolver, projector and holiday rules.
//!
//! # Responsibility
//! - Convert between epoch milliseconds and UTC calendar dates.
//! - Answer month-length and leap-year questions without panicking.
//!
//! # Invariants
//! - A calendar date maps to exactly one instant: midnight UTC of that date.
//! - Helpers return `None` instead of panicking on unrepresentable values.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Weekday};

/// Absolute instant in Unix epoch milliseconds.
pub type EpochMs = i64;

/// Milliseconds in one calendar day.
pub const MS_PER_DAY: i64 = 86_400_000;

/// Returns the instant of midnight UTC for `date`.
pub fn day_start_ms(date: NaiveDate) -> EpochMs {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Returns the last millisecond of `date` in UTC.
pub fn day_end_ms(date: NaiveDate) -> EpochMs {
    day_start_ms(date) + MS_PER_DAY - 1
}

/// Returns the UTC calendar date containing `ms`.
pub fn date_of(ms: EpochMs) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(ms).map(|value| value.date_naive())
}

/// Truncates `ms` to midnight UTC of its calendar date.
pub fn truncate_to_day(ms: EpochMs) -> Option<EpochMs> {
    date_of(ms).map(day_start_ms)
}

/// First and last millisecond that map to a calendar date.
pub fn calendar_ms_range() -> (EpochMs, EpochMs) {
    (day_start_ms(NaiveDate::MIN), day_end_ms(NaiveDate::MAX))
}

/// Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` of `year`, or `None` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let days = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => return None,
    };
    Some(days)
}

/// Largest day any year allows for `month` (February allows 29).
pub fn max_day_of_month(month: u32) -> Option<u32> {
    // 2000 is a leap year, so February reports 29.
    days_in_month(2000, month)
}

/// Finds the `n`-th (1-based) `weekday` of `month`.
pub fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, n: u32) -> Option<NaiveDate> {
    if n == 0 {
        return None;
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let offset = (7 + weekday.num_days_from_monday() - first.weekday().num_days_from_monday()) % 7;
    let day = 1 + offset + (n - 1) * 7;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Finds the last `weekday` of `month`.
pub fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let last_day = days_in_month(year, month)?;
    let last = NaiveDate::from_ymd_opt(year, month, last_day)?;
    let back = (7 + last.weekday().num_days_from_monday() - weekday.num_days_from_monday()) % 7;
    NaiveDate::from_ymd_opt(year, month, last_day - back)
}

/// Western (Gregorian) Easter Sunday, anonymous Gregorian algorithm.
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
}

#[cfg(test)]
mod tests {
    use super::{
        calendar_ms_range, date_of, day_end_ms, day_start_ms, days_in_month, easter_sunday,
        is_leap_year, last_weekday_of_month, nth_weekday_of_month, MS_PER_DAY,
    };
    use chrono::{NaiveDate, Weekday};

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn day_bounds_cover_exactly_one_day() {
        let date = ymd(2025, 3, 18);
        assert_eq!(day_start_ms(date), 1_742_256_000_000);
        assert_eq!(day_end_ms(date) - day_start_ms(date), MS_PER_DAY - 1);
        assert_eq!(date_of(day_end_ms(date)), Some(date));
    }

    #[test]
    fn leap_year_rule_handles_centuries() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2025));
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2025, 2), Some(28));
        assert_eq!(days_in_month(2025, 13), None);
    }

    #[test]
    fn weekday_rules_find_floating_dates() {
        // Thanksgiving 2025: fourth Thursday of November.
        assert_eq!(
            nth_weekday_of_month(2025, 11, Weekday::Thu, 4),
            Some(ymd(2025, 11, 27))
        );
        // Memorial Day 2025: last Monday of May.
        assert_eq!(
            last_weekday_of_month(2025, 5, Weekday::Mon),
            Some(ymd(2025, 5, 26))
        );
        assert_eq!(nth_weekday_of_month(2025, 2, Weekday::Mon, 5), None);
    }

    #[test]
    fn easter_matches_known_dates() {
        assert_eq!(easter_sunday(2024), Some(ymd(2024, 3, 31)));
        assert_eq!(easter_sunday(2025), Some(ymd(2025, 4, 20)));
        assert_eq!(easter_sunday(2026), Some(ymd(2026, 4, 5)));
    }

    #[test]
    fn calendar_range_bounds_map_to_dates() {
        let (min_ms, max_ms) = calendar_ms_range();
        assert_eq!(date_of(min_ms), Some(NaiveDate::MIN));
        assert_eq!(date_of(max_ms), Some(NaiveDate::MAX));
        assert_eq!(date_of(min_ms - 1), None);
        assert_eq!(date_of(max_ms + 1), None);
    }
}
