//! Tests for wire records and their conversion into the scheduling model.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use chrono_tz::Tz;
use planit_engine::error::PlanError;
use planit_engine::records::{
    appointments_from, parse_events, parse_local_datetime, parse_time_of_day, parse_timezone,
    parse_unavailable, parse_weekday, windows_from, DEFAULT_TIMEZONE,
};
use planit_engine::{Appointment, EventRecord, UnavailabilityWindow, UnavailableRecord};

fn denver() -> Tz {
    parse_timezone(DEFAULT_TIMEZONE).unwrap()
}

fn local(day: u32, hour: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, day)
        .unwrap()
        .and_hms_opt(hour, min, 0)
        .unwrap()
}

// ── Model constructors ──────────────────────────────────────────────────────

#[test]
fn appointment_end_adds_whole_hours() {
    let appointment = Appointment::new(local(16, 15, 30), 3).unwrap();
    assert_eq!(appointment.end(), local(16, 18, 30));
    assert_eq!(appointment.interval(), (local(16, 15, 30), local(16, 18, 30)));
}

#[test]
fn appointment_rejects_zero_hours() {
    let result = Appointment::new(local(16, 9, 0), 0);
    assert!(matches!(result, Err(PlanError::InvalidDuration(0))));
}

#[test]
fn window_rejects_end_before_or_at_start() {
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
    let eleven = NaiveTime::from_hms_opt(11, 0, 0).unwrap();

    assert!(matches!(
        UnavailabilityWindow::new(Weekday::Mon, noon, noon),
        Err(PlanError::InvalidWindow(_))
    ));
    assert!(matches!(
        UnavailabilityWindow::new(Weekday::Mon, noon, eleven),
        Err(PlanError::InvalidWindow(_))
    ));
}

#[test]
fn window_on_date_matches_weekday_only() {
    let window = UnavailabilityWindow::new(
        Weekday::Mon,
        NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
    )
    .unwrap();

    let monday = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
    let tuesday = NaiveDate::from_ymd_opt(2026, 3, 17).unwrap();

    assert_eq!(window.on_date(monday), Some((local(16, 12, 0), local(16, 13, 0))));
    assert_eq!(window.on_date(tuesday), None);
}

// ── Field parsers ───────────────────────────────────────────────────────────

#[test]
fn parse_weekday_accepts_short_and_long_names() {
    assert_eq!(parse_weekday("mon").unwrap(), Weekday::Mon);
    assert_eq!(parse_weekday("Sat").unwrap(), Weekday::Sat);
    assert_eq!(parse_weekday("wednesday").unwrap(), Weekday::Wed);
    assert!(matches!(parse_weekday("funday"), Err(PlanError::InvalidWeekday(_))));
}

#[test]
fn parse_time_of_day_accepts_hours_and_minutes() {
    assert_eq!(parse_time_of_day("09:30").unwrap(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
    assert_eq!(parse_time_of_day("17:00:00").unwrap(), NaiveTime::from_hms_opt(17, 0, 0).unwrap());
    assert!(matches!(parse_time_of_day("25:00"), Err(PlanError::InvalidTime(_))));
}

#[test]
fn parse_local_datetime_keeps_naive_times() {
    assert_eq!(parse_local_datetime("2026-03-16T10:00:00", denver()).unwrap(), local(16, 10, 0));
    assert_eq!(parse_local_datetime("2026-03-16T10:00", denver()).unwrap(), local(16, 10, 0));
}

#[test]
fn parse_local_datetime_converts_instants_into_business_timezone() {
    // 2026-03-16 is after the US spring-forward, so Denver is UTC-6.
    let parsed = parse_local_datetime("2026-03-16T16:00:00.000Z", denver()).unwrap();
    assert_eq!(parsed, local(16, 10, 0));

    let offset = parse_local_datetime("2026-03-16T12:00:00-04:00", denver()).unwrap();
    assert_eq!(offset, local(16, 10, 0));
}

#[test]
fn parse_local_datetime_rejects_garbage() {
    assert!(matches!(
        parse_local_datetime("next tuesday", denver()),
        Err(PlanError::InvalidDateTime(_))
    ));
}

#[test]
fn parse_timezone_rejects_unknown_names() {
    assert!(matches!(parse_timezone("Mars/Olympus"), Err(PlanError::InvalidTimezone(_))));
}

// ── Records ─────────────────────────────────────────────────────────────────

#[test]
fn event_records_parse_from_camel_case_json() {
    let json = r#"[
        {"id":"e1","title":"Standup","date":"2026-03-16T09:00:00","durationHours":1,"ownerEmail":"a@example.com"},
        {"title":"Review","date":"2026-03-16T13:00:00","durationHours":2}
    ]"#;

    let records = parse_events(json).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id.as_deref(), Some("e1"));
    assert_eq!(records[1].owner_email, None);

    let appointments = appointments_from(&records, denver()).unwrap();
    assert_eq!(
        appointments,
        vec![
            Appointment::new(local(16, 9, 0), 1).unwrap(),
            Appointment::new(local(16, 13, 0), 2).unwrap(),
        ]
    );
}

#[test]
fn unavailable_records_parse_from_camel_case_json() {
    let json = r#"[{"id":"u1","day":"mon","startTime":"12:00","endTime":"13:00","ownerEmail":"a@example.com"}]"#;

    let records = parse_unavailable(json).unwrap();
    let windows = windows_from(&records).unwrap();

    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].day, Weekday::Mon);
    assert_eq!(windows[0].start_time, NaiveTime::from_hms_opt(12, 0, 0).unwrap());
    assert_eq!(windows[0].end_time, NaiveTime::from_hms_opt(13, 0, 0).unwrap());
}

#[test]
fn inverted_unavailable_record_is_rejected() {
    let record = UnavailableRecord {
        id: None,
        day: "tue".to_string(),
        start_time: "15:00".to_string(),
        end_time: "14:00".to_string(),
        owner_email: None,
    };
    assert!(matches!(record.to_window(), Err(PlanError::InvalidWindow(_))));
}

#[test]
fn zero_hour_event_record_is_rejected() {
    let record = EventRecord {
        id: None,
        title: "Nothing".to_string(),
        date: "2026-03-16T09:00:00".to_string(),
        duration_hours: 0,
        owner_email: None,
    };
    assert!(matches!(record.to_appointment(denver()), Err(PlanError::InvalidDuration(0))));
}

#[test]
fn malformed_json_is_a_json_error() {
    assert!(matches!(parse_events("{not json"), Err(PlanError::Json(_))));
}

#[test]
fn scheduled_record_leaves_identity_to_persistence() {
    let record = EventRecord::scheduled("Write report", local(16, 10, 30), 2);
    let json = serde_json::to_value(&record).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "title": "Write report",
            "date": "2026-03-16T10:30:00",
            "durationHours": 2
        })
    );
}
