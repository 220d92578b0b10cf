//! Natural-language date parsing.
//!
//! The resolver only depends on [`NaturalDateParser`]; callers may inject any
//! implementation. [`RuleBasedDateParser`] is the built-in one and covers the
//! phrases people and assistants actually type:
//!
//! - `today`, `tomorrow`, `yesterday`
//! - `friday`, `this friday`, `next friday`
//! - `in 3 months`, `two weeks from today`, `a year from now`, `5 days ago`
//! - `next week`, `next month`, `next year`
//! - `march 18, 2025`, `mar 18`, `18th of march 2025`
//! - named holidays such as `christmas` or `mother's day`
//!
//! Every result is a whole day: midnight UTC of the resolved date. Partial
//! dates such as `march` are not understood and return `None`.

use crate::calendar::{day_start_ms, EpochMs};
use crate::holiday::calendar::HolidayCalendar;
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;

/// Injected natural-language date capability.
///
/// Implementations must be side-effect free; `None` means "not understood"
/// and lets the resolver fall through to its next strategy.
pub trait NaturalDateParser: Send + Sync {
    fn parse(&self, input: &str, now: DateTime<Utc>) -> Option<EpochMs>;
}

const COUNT_PATTERN: &str =
    r"(\d{1,4}|a|an|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve)";
const UNIT_PATTERN: &str = r"(day|week|month|year)s?";
const MONTH_PATTERN: &str = r"(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?";
const WEEKDAY_PATTERN: &str = r"(monday|mon|tuesday|tues|tue|wednesday|wed|thursday|thurs|thu|friday|fri|saturday|sat|sunday|sun)";

static IN_OFFSET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^in\s+{COUNT_PATTERN}\s+{UNIT_PATTERN}$")).expect("valid offset regex")
});
static FROM_NOW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^{COUNT_PATTERN}\s+{UNIT_PATTERN}\s+from\s+(?:today|now)$"
    ))
    .expect("valid from-now regex")
});
static AGO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^{COUNT_PATTERN}\s+{UNIT_PATTERN}\s+ago$")).expect("valid ago regex")
});
static NEXT_PERIOD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^next\s+(week|month|year)$").expect("valid next-period regex"));
static WEEKDAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(?:(this|next)\s+)?{WEEKDAY_PATTERN}$")).expect("valid weekday regex")
});
static MONTH_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^{MONTH_PATTERN}\s+(\d{{1,2}})(?:st|nd|rd|th)?(?:,?\s+(\d{{4}}))?$"
    ))
    .expect("valid month-day regex")
});
static DAY_MONTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?{MONTH_PATTERN}(?:,?\s+(\d{{4}}))?$"
    ))
    .expect("valid day-month regex")
});

/// Years scanned forward when a month/day without year does not exist in the
/// current year (Feb 29).
const MAX_YEAR_LOOKAHEAD: i32 = 8;

/// Built-in rule-based parser.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedDateParser {
    holidays: HolidayCalendar,
}

impl RuleBasedDateParser {
    /// Parser resolving holiday names against `holidays`.
    pub fn with_holidays(holidays: HolidayCalendar) -> Self {
        Self { holidays }
    }

    /// Parses `input` relative to `today`, returning a calendar date.
    pub fn parse_date(&self, input: &str, today: NaiveDate) -> Option<NaiveDate> {
        let text = normalize(input);
        if text.is_empty() {
            return None;
        }

        match text.as_str() {
            "today" | "now" => return Some(today),
            "tomorrow" => return today.succ_opt(),
            "yesterday" => return today.pred_opt(),
            _ => {}
        }

        if let Some(caps) = IN_OFFSET_RE
            .captures(&text)
            .or_else(|| FROM_NOW_RE.captures(&text))
        {
            let count = parse_count(&caps[1])?;
            return shift(today, count, &caps[2], true);
        }
        if let Some(caps) = AGO_RE.captures(&text) {
            let count = parse_count(&caps[1])?;
            return shift(today, count, &caps[2], false);
        }
        if let Some(caps) = NEXT_PERIOD_RE.captures(&text) {
            return shift(today, 1, &caps[1], true);
        }
        if let Some(caps) = WEEKDAY_RE.captures(&text) {
            let weekday = weekday_from_name(&caps[2])?;
            let strictly_after = caps.get(1).is_some_and(|m| m.as_str() == "next");
            return next_weekday(today, weekday, strictly_after);
        }
        if let Some(caps) = MONTH_DAY_RE.captures(&text) {
            return month_day_date(today, &caps[1], &caps[2], caps.get(3).map(|m| m.as_str()));
        }
        if let Some(caps) = DAY_MONTH_RE.captures(&text) {
            return month_day_date(today, &caps[2], &caps[1], caps.get(3).map(|m| m.as_str()));
        }

        self.holidays.next_occurrence(&text, today)
    }
}

impl NaturalDateParser for RuleBasedDateParser {
    fn parse(&self, input: &str, now: DateTime<Utc>) -> Option<EpochMs> {
        self.parse_date(input, now.date_naive()).map(day_start_ms)
    }
}

fn normalize(input: &str) -> String {
    input
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_count(raw: &str) -> Option<u32> {
    let count = match raw {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        digits => digits.parse().ok()?,
    };
    Some(count)
}

/// Moves `from` by `count` units. Month and year steps clamp to month end.
fn shift(from: NaiveDate, count: u32, unit: &str, forward: bool) -> Option<NaiveDate> {
    let unit = unit.trim_end_matches('s');
    match unit {
        "day" | "week" => {
            let per_unit = if unit == "week" { 7 } else { 1 };
            let days = Duration::days(i64::from(count) * per_unit);
            if forward {
                from.checked_add_signed(days)
            } else {
                from.checked_sub_signed(days)
            }
        }
        "month" | "year" => {
            let per_unit = if unit == "year" { 12 } else { 1 };
            let months = Months::new(count.checked_mul(per_unit)?);
            if forward {
                from.checked_add_months(months)
            } else {
                from.checked_sub_months(months)
            }
        }
        _ => None,
    }
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    let weekday = match name.get(..3)? {
        "mon" => Weekday::Mon,
        "tue" => Weekday::Tue,
        "wed" => Weekday::Wed,
        "thu" => Weekday::Thu,
        "fri" => Weekday::Fri,
        "sat" => Weekday::Sat,
        "sun" => Weekday::Sun,
        _ => return None,
    };
    Some(weekday)
}

/// Next `weekday` on or after `today`, or strictly after when requested.
fn next_weekday(today: NaiveDate, weekday: Weekday, strictly_after: bool) -> Option<NaiveDate> {
    let current = today.weekday().num_days_from_monday();
    let target = weekday.num_days_from_monday();
    let mut ahead = (7 + target - current) % 7;
    if ahead == 0 && strictly_after {
        ahead = 7;
    }
    today.checked_add_signed(Duration::days(i64::from(ahead)))
}

fn month_from_name(name: &str) -> Option<u32> {
    let month = match name.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Builds a date from month name and day. Without a year, picks the first
/// date on or after `today`.
fn month_day_date(
    today: NaiveDate,
    month_name: &str,
    day: &str,
    year: Option<&str>,
) -> Option<NaiveDate> {
    let month = month_from_name(month_name)?;
    let day: u32 = day.parse().ok()?;

    if let Some(year) = year {
        return NaiveDate::from_ymd_opt(year.parse().ok()?, month, day);
    }

    (today.year()..=today.year() + MAX_YEAR_LOOKAHEAD)
        .filter_map(|candidate| NaiveDate::from_ymd_opt(candidate, month, day))
        .find(|date| *date >= today)
}
