//! Tests for building hours and the open/closed gate.

use chrono::{DateTime, TimeZone, Utc, Weekday};
use studyspot_engine::hours::{evaluate, is_weekend};
use studyspot_engine::{DailyHours, EngineError, TimeOfDay, WeeklyHours};

fn tod(hour: u32, min: u32) -> TimeOfDay {
    TimeOfDay::from_hms(hour, min, 0).unwrap()
}

/// 2026-03-16 is a Monday; 2026-03-21 is a Saturday.
fn monday(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, hour, min, 0).unwrap()
}

fn saturday(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 21, hour, min, 0).unwrap()
}

fn eight_to_ten() -> DailyHours {
    DailyHours::open(tod(8, 0), tod(22, 0)).unwrap()
}

#[test]
fn open_rejects_inverted_or_empty_window() {
    assert!(matches!(
        DailyHours::open(tod(22, 0), tod(8, 0)),
        Err(EngineError::InvalidInterval { .. })
    ));
    assert!(matches!(
        DailyHours::open(tod(8, 0), tod(8, 0)),
        Err(EngineError::InvalidInterval { .. })
    ));
}

#[test]
fn gate_open_between_bounds_inclusive() {
    let hours = eight_to_ten();

    for t in [monday(8, 0), monday(12, 0), monday(22, 0)] {
        let gate = evaluate(Some(&hours), &t);
        assert!(gate.is_open, "{t} should be open");
        assert_eq!(gate.opens_at, Some(monday(8, 0)));
        assert_eq!(gate.closes_at, Some(monday(22, 0)));
    }
}

#[test]
fn gate_carries_bounds_before_opening_and_after_closing() {
    let hours = eight_to_ten();

    let early = evaluate(Some(&hours), &monday(7, 59));
    assert!(!early.is_open);
    assert_eq!(early.opens_at, Some(monday(8, 0)));
    assert_eq!(early.closes_at, Some(monday(22, 0)));

    let late = evaluate(Some(&hours), &monday(22, 1));
    assert!(!late.is_open);
    assert_eq!(late.closes_at, Some(monday(22, 0)));
}

#[test]
fn gate_closed_without_hours() {
    let missing = evaluate(None, &monday(12, 0));
    assert!(!missing.is_open);
    assert!(missing.opens_at.is_none() && missing.closes_at.is_none());

    let closed = evaluate(Some(&DailyHours::Closed), &monday(12, 0));
    assert!(!closed.is_open);
    assert!(closed.opens_at.is_none() && closed.closes_at.is_none());
}

#[test]
fn gate_closed_on_weekends_even_with_hours() {
    let gate = evaluate(Some(&eight_to_ten()), &saturday(12, 0));

    assert!(!gate.is_open);
    assert!(gate.opens_at.is_none() && gate.closes_at.is_none());
}

#[test]
fn weekly_hours_collapse_weekends() {
    let hours = WeeklyHours::weekdays(tod(8, 0), tod(22, 0))
        .unwrap()
        .with_day(Weekday::Sat, DailyHours::open(tod(10, 0), tod(14, 0)).unwrap());

    assert!(hours.stored(Weekday::Sat).is_some());
    assert!(hours.hours_on(Weekday::Sat).is_none());
    assert!(hours.hours_on(Weekday::Sun).is_none());
    assert_eq!(hours.hours_on(Weekday::Wed), Some(&eight_to_ten()));
}

#[test]
fn weekly_hours_deserialize_by_day_name() {
    let json = r#"{
        "monday": {"state": "open", "opens_at": "08:00", "closes_at": "22:00"},
        "friday": {"state": "closed"}
    }"#;
    let hours: WeeklyHours = serde_json::from_str(json).unwrap();

    assert_eq!(hours.hours_on(Weekday::Mon), Some(&eight_to_ten()));
    assert_eq!(hours.hours_on(Weekday::Fri), Some(&DailyHours::Closed));
    assert_eq!(hours.hours_on(Weekday::Tue), None);
}

#[test]
fn weekend_days() {
    assert!(is_weekend(Weekday::Sat));
    assert!(is_weekend(Weekday::Sun));
    assert!(!is_weekend(Weekday::Fri));
}
