use chrono::{Datelike, NaiveDate};
use eventpulse_core::calendar::{day_end_ms, day_start_ms};
use eventpulse_core::{
    aggregate_upcoming, Holiday, HolidayCalendar, HolidayRule, OccurrenceKind, QueryWindow,
    UpcomingQuery,
};

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn window(from: NaiveDate, to: NaiveDate) -> QueryWindow {
    QueryWindow::new(day_start_ms(from), day_end_ms(to))
}

#[test]
fn movable_holidays_land_on_expected_dates() {
    let calendar = HolidayCalendar::greeting();
    let cases = [
        ("Easter", 2024, ymd(2024, 3, 31)),
        ("Easter", 2025, ymd(2025, 4, 20)),
        ("Mother's Day", 2025, ymd(2025, 5, 11)),
        ("Memorial Day", 2025, ymd(2025, 5, 26)),
        ("Father's Day", 2025, ymd(2025, 6, 15)),
        ("Labor Day", 2025, ymd(2025, 9, 1)),
        ("Thanksgiving", 2024, ymd(2024, 11, 28)),
        ("Thanksgiving", 2025, ymd(2025, 11, 27)),
    ];
    for (name, year, expected) in cases {
        let holiday = calendar.find(name).unwrap();
        assert_eq!(holiday.rule.date_in(year), Some(expected), "{name} {year}");
    }
}

#[test]
fn lookup_ignores_case_and_punctuation() {
    let calendar = HolidayCalendar::greeting();
    for spelling in ["mothers day", "MOTHER'S DAY", "  Mother’s   Day "] {
        assert_eq!(calendar.find(spelling).unwrap().slug, "mothers-day");
    }
    assert_eq!(calendar.find("xmas").unwrap().slug, "christmas");
    assert_eq!(calendar.find("fourth of july").unwrap().slug, "independence-day");
    assert!(calendar.find("arbor day").is_none());
    assert!(calendar.find("").is_none());
}

#[test]
fn next_occurrence_rolls_into_following_year() {
    let calendar = HolidayCalendar::greeting();
    assert_eq!(
        calendar.next_occurrence("halloween", ymd(2025, 10, 31)),
        Some(ymd(2025, 10, 31))
    );
    assert_eq!(
        calendar.next_occurrence("halloween", ymd(2025, 11, 1)),
        Some(ymd(2026, 10, 31))
    );
}

#[test]
fn records_cover_every_year_the_window_touches() {
    let calendar = HolidayCalendar::greeting();
    let records = calendar.records_for_window(&window(ymd(2025, 12, 20), ymd(2026, 1, 10)));

    assert_eq!(records.len(), calendar.holidays().len() * 2);
    assert!(records
        .iter()
        .all(|record| record.source_id.starts_with("holiday:")));
    assert!(records
        .iter()
        .any(|record| record.source_id == "holiday:new-years-day"
            && record.anchor.year == Some(2026)));
}

#[test]
fn reversed_window_yields_no_records() {
    let calendar = HolidayCalendar::greeting();
    let reversed = QueryWindow::new(day_start_ms(ymd(2026, 1, 1)), day_start_ms(ymd(2025, 1, 1)));
    assert!(calendar.records_for_window(&reversed).is_empty());
}

#[test]
fn year_end_window_merges_holidays_in_order() {
    let calendar = HolidayCalendar::greeting();
    let query_window = window(ymd(2025, 12, 20), ymd(2026, 1, 10));
    let holidays = calendar.records_for_window(&query_window);
    let query = UpcomingQuery::new(query_window, 10, query_window.start);

    let report = aggregate_upcoming(&query, &[], &[], &holidays).unwrap();
    let found: Vec<_> = report
        .occurrences
        .iter()
        .map(|occurrence| (occurrence.label.as_str(), occurrence.occurs_at))
        .collect();
    assert_eq!(
        found,
        vec![
            ("Christmas Eve", day_start_ms(ymd(2025, 12, 24))),
            ("Christmas", day_start_ms(ymd(2025, 12, 25))),
            ("New Year's Eve", day_start_ms(ymd(2025, 12, 31))),
            ("New Year's Day", day_start_ms(ymd(2026, 1, 1))),
        ]
    );
    assert!(report
        .occurrences
        .iter()
        .all(|occurrence| occurrence.kind == OccurrenceKind::Holiday && !occurrence.recurring));
}

#[test]
fn custom_calendar_loads_from_json() {
    let json = r#"[
        {"slug": "founders-day", "name": "Founders Day", "rule": {"rule": "fixed", "month": 4, "day": 1}},
        {"slug": "pentecost", "name": "Pentecost", "aliases": ["whitsunday"], "rule": {"rule": "easter_offset", "days": 49}}
    ]"#;
    let holidays: Vec<Holiday> = serde_json::from_str(json).unwrap();
    let calendar = HolidayCalendar::new(holidays);

    assert_eq!(
        calendar.find("founders day").unwrap().rule,
        HolidayRule::Fixed { month: 4, day: 1 }
    );
    // Easter 2025 is April 20.
    assert_eq!(
        calendar.next_occurrence("whitsunday", ymd(2025, 1, 1)),
        Some(ymd(2025, 6, 8))
    );
    assert_eq!(calendar.records_for_year(2025).len(), 2);
}

#[test]
fn host_supplied_rule_with_huge_offset_is_skipped() {
    let json = r#"[
        {"slug": "broken", "name": "Broken", "rule": {"rule": "easter_offset", "days": 9223372036854775807}},
        {"slug": "founders-day", "name": "Founders Day", "rule": {"rule": "fixed", "month": 4, "day": 1}}
    ]"#;
    let holidays: Vec<Holiday> = serde_json::from_str(json).unwrap();
    let calendar = HolidayCalendar::new(holidays);

    let records = calendar.records_for_year(2025);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].source_id, "holiday:founders-day");
    assert_eq!(calendar.next_occurrence("broken", ymd(2025, 1, 1)), None);
}

#[test]
fn window_running_past_the_calendar_is_clamped() {
    let calendar = HolidayCalendar::greeting();
    let last_year = NaiveDate::MAX.year();
    let open = QueryWindow::new(day_start_ms(ymd(last_year, 1, 1)), i64::MAX);

    let records = calendar.records_for_window(&open);
    assert_eq!(records.len(), calendar.holidays().len());
    assert!(records
        .iter()
        .all(|record| record.anchor.year == Some(last_year)));

    let beyond = QueryWindow::new(i64::MAX - 10, i64::MAX);
    assert!(calendar.records_for_window(&beyond).is_empty());
}
