//! WASM bindings for planit-engine.
//!
//! Exposes slot finding, single-candidate availability checks and conflict
//! listing to the browser front-end via `wasm-bindgen`. Calendars cross the
//! boundary as JSON strings of the same event and unavailability records the
//! service stores, and times come back as local ISO strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p planit-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/wasm/ \
//!   target/wasm32-unknown-unknown/release/planit_engine_wasm.wasm
//! ```

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use planit_engine::error::Result;
use planit_engine::records::{self, DEFAULT_TIMEZONE};
use planit_engine::{Appointment, Conflict, UnavailabilityWindow};
use wasm_bindgen::prelude::*;

const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// ---------------------------------------------------------------------------
// Helpers: JSON records → model values
// ---------------------------------------------------------------------------

struct Calendar {
    appointments: Vec<Appointment>,
    windows: Vec<UnavailabilityWindow>,
}

fn timezone(name: Option<&str>) -> Result<Tz> {
    records::parse_timezone(name.unwrap_or(DEFAULT_TIMEZONE))
}

/// Parse both record arrays. An empty string is treated as an empty array.
fn load_calendar(events_json: &str, unavailable_json: &str, tz: Tz) -> Result<Calendar> {
    let events = if events_json.trim().is_empty() {
        Vec::new()
    } else {
        records::parse_events(events_json)?
    };
    let unavailable = if unavailable_json.trim().is_empty() {
        Vec::new()
    } else {
        records::parse_unavailable(unavailable_json)?
    };

    Ok(Calendar {
        appointments: records::appointments_from(&events, tz)?,
        windows: records::windows_from(&unavailable)?,
    })
}

fn next_slot(
    duration_hours: u32,
    events_json: &str,
    unavailable_json: &str,
    now: &str,
    tz_name: Option<&str>,
) -> Result<Option<NaiveDateTime>> {
    let tz = timezone(tz_name)?;
    let calendar = load_calendar(events_json, unavailable_json, tz)?;
    let now = records::parse_local_datetime(now, tz)?;
    planit_engine::find_next_available_slot(
        duration_hours,
        &calendar.appointments,
        &calendar.windows,
        now,
    )
}

fn conflicts_for(
    start: &str,
    duration_hours: u32,
    events_json: &str,
    unavailable_json: &str,
    tz_name: Option<&str>,
) -> Result<Vec<Conflict>> {
    let tz = timezone(tz_name)?;
    let calendar = load_calendar(events_json, unavailable_json, tz)?;
    let candidate = Appointment::new(records::parse_local_datetime(start, tz)?, duration_hours)?;
    Ok(planit_engine::find_conflicts(
        &candidate,
        &calendar.appointments,
        &calendar.windows,
    ))
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Find the next available start time for a task of `durationHours`.
///
/// Returns the local start as `"YYYY-MM-DDTHH:MM:SS"`, or `undefined` when no
/// slot exists within 30 days.
///
/// # Arguments
/// - `duration_hours` -- Task length in whole hours (at least 1)
/// - `events_json` -- JSON array of `{date, durationHours, ...}` event records
/// - `unavailable_json` -- JSON array of `{day, startTime, endTime, ...}` records
/// - `now` -- Search start, RFC 3339 or naive local datetime
/// - `timezone` -- Optional IANA business timezone (default `America/Denver`)
#[wasm_bindgen(js_name = "findNextAvailableSlot")]
pub fn find_next_available_slot(
    duration_hours: u32,
    events_json: &str,
    unavailable_json: &str,
    now: &str,
    timezone: Option<String>,
) -> std::result::Result<Option<String>, JsValue> {
    let slot = next_slot(
        duration_hours,
        events_json,
        unavailable_json,
        now,
        timezone.as_deref(),
    )
    .map_err(to_js)?;
    Ok(slot.map(|start| start.format(LOCAL_FORMAT).to_string()))
}

/// Whether an appointment at `start` lasting `durationHours` fits the calendar.
#[wasm_bindgen(js_name = "isSlotAvailable")]
pub fn is_slot_available(
    start: &str,
    duration_hours: u32,
    events_json: &str,
    unavailable_json: &str,
    timezone: Option<String>,
) -> std::result::Result<bool, JsValue> {
    conflicts_for(
        start,
        duration_hours,
        events_json,
        unavailable_json,
        timezone.as_deref(),
    )
    .map(|conflicts| conflicts.is_empty())
    .map_err(to_js)
}

/// List everything an appointment at `start` would overlap.
///
/// Returns a JSON array of `{source: {kind, index}, start, end, overlap_minutes}`
/// objects, where `index` points into the matching input array.
#[wasm_bindgen(js_name = "findConflicts")]
pub fn find_conflicts(
    start: &str,
    duration_hours: u32,
    events_json: &str,
    unavailable_json: &str,
    timezone: Option<String>,
) -> std::result::Result<String, JsValue> {
    let conflicts = conflicts_for(
        start,
        duration_hours,
        events_json,
        unavailable_json,
        timezone.as_deref(),
    )
    .map_err(to_js)?;

    serde_json::to_string(&conflicts)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use planit_engine::error::PlanError;
    use planit_engine::ConflictSource;

    const EVENTS: &str = r#"[
        {"title":"Standup","date":"2026-03-16T09:00:00","durationHours":1},
        {"title":"Review","date":"2026-03-16T16:00:00.000Z","durationHours":2}
    ]"#;
    const UNAVAILABLE: &str = r#"[{"day":"mon","startTime":"12:00","endTime":"13:00"}]"#;

    fn local(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, LOCAL_FORMAT).unwrap()
    }

    #[test]
    fn next_slot_skips_booked_and_unavailable_time() {
        let slot = next_slot(1, EVENTS, UNAVAILABLE, "2026-03-16T09:00:00", None).unwrap();
        assert_eq!(slot, Some(local("2026-03-16T13:00:00")));
    }

    #[test]
    fn next_slot_accepts_empty_inputs() {
        let slot = next_slot(1, "", "", "2026-03-16T10:15:00", None).unwrap();
        assert_eq!(slot, Some(local("2026-03-16T10:30:00")));
    }

    #[test]
    fn next_slot_honours_timezone_for_instants() {
        // 15:15Z is 08:15 in Los Angeles (UTC-7 in March), clamped to 09:00.
        let slot = next_slot(1, "[]", "[]", "2026-03-16T15:15:00Z", Some("America/Los_Angeles"))
            .unwrap();
        assert_eq!(slot, Some(local("2026-03-16T09:00:00")));
    }

    #[test]
    fn next_slot_rejects_zero_duration() {
        let result = next_slot(0, "[]", "[]", "2026-03-16T09:00:00", None);
        assert!(matches!(result, Err(PlanError::InvalidDuration(0))));
    }

    #[test]
    fn conflicts_report_windows_then_events() {
        let conflicts =
            conflicts_for("2026-03-16T11:30:00", 1, EVENTS, UNAVAILABLE, None).unwrap();
        let sources: Vec<ConflictSource> = conflicts.iter().map(|c| c.source).collect();
        assert_eq!(
            sources,
            vec![ConflictSource::Unavailable(0), ConflictSource::Appointment(1)]
        );
    }

    #[test]
    fn back_to_back_candidate_has_no_conflicts() {
        let conflicts =
            conflicts_for("2026-03-16T13:00:00", 1, EVENTS, UNAVAILABLE, None).unwrap();
        assert!(conflicts.is_empty());
    }

    #[test]
    fn malformed_records_are_errors() {
        let bad_window = r#"[{"day":"mon","startTime":"13:00","endTime":"12:00"}]"#;
        assert!(matches!(
            next_slot(1, "[]", bad_window, "2026-03-16T09:00:00", None),
            Err(PlanError::InvalidWindow(_))
        ));
        assert!(matches!(
            next_slot(1, "[oops", "[]", "2026-03-16T09:00:00", None),
            Err(PlanError::Json(_))
        ));
    }
}
