//! Wire records exchanged with the persistence and UI layers.
//!
//! These mirror the JSON the calendar service stores per user: events carry a
//! `date` string and whole-hour `durationHours`, unavailability entries carry a
//! three-letter `day` code and `"HH:MM"` times. Conversions into the semantic
//! [`crate::model`] types validate as they go.

use chrono::{DateTime, NaiveDateTime, NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::model::{Appointment, UnavailabilityWindow};

/// Business timezone used when the caller does not name one.
pub const DEFAULT_TIMEZONE: &str = "America/Denver";

/// Format used when handing a local start time back to the caller.
const LOCAL_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A stored calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Assigned by the persistence layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    /// RFC 3339 instant or naive local `YYYY-MM-DDTHH:MM[:SS]`.
    pub date: String,
    pub duration_hours: u32,
    /// Assigned by the persistence layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
}

impl EventRecord {
    /// Build the record for a newly scheduled event. Identity and ownership are
    /// left unset for the persistence layer to fill in.
    pub fn scheduled(title: impl Into<String>, start: NaiveDateTime, duration_hours: u32) -> Self {
        Self {
            id: None,
            title: title.into(),
            date: start.format(LOCAL_DATETIME_FORMAT).to_string(),
            duration_hours,
            owner_email: None,
        }
    }

    pub fn to_appointment(&self, tz: Tz) -> Result<Appointment> {
        let start = parse_local_datetime(&self.date, tz)?;
        Appointment::new(start, self.duration_hours)
    }
}

/// A stored weekly unavailability entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailableRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// `"sun"` through `"sat"`; full day names are accepted too.
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
}

impl UnavailableRecord {
    pub fn to_window(&self) -> Result<UnavailabilityWindow> {
        UnavailabilityWindow::new(
            parse_weekday(&self.day)?,
            parse_time_of_day(&self.start_time)?,
            parse_time_of_day(&self.end_time)?,
        )
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| PlanError::InvalidTimezone(name.to_string()))
}

/// Parse a datetime into naive local time in `tz`.
///
/// RFC 3339 strings (with an offset or `Z`) are converted into `tz`. Strings
/// without an offset are taken as already local.
pub fn parse_local_datetime(s: &str, tz: Tz) -> Result<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&tz).naive_local());
    }
    NaiveDateTime::parse_from_str(s, LOCAL_DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map_err(|e| PlanError::InvalidDateTime(format!("'{}': {}", s, e)))
}

/// Parse `"HH:MM"` (or `"HH:MM:SS"`) in 24-hour form.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|e| PlanError::InvalidTime(format!("'{}': {}", s, e)))
}

pub fn parse_weekday(s: &str) -> Result<Weekday> {
    s.trim()
        .parse()
        .map_err(|_| PlanError::InvalidWeekday(s.to_string()))
}

/// Parse a JSON array of event records.
pub fn parse_events(json: &str) -> Result<Vec<EventRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a JSON array of unavailability records.
pub fn parse_unavailable(json: &str) -> Result<Vec<UnavailableRecord>> {
    Ok(serde_json::from_str(json)?)
}

pub fn appointments_from(records: &[EventRecord], tz: Tz) -> Result<Vec<Appointment>> {
    records.iter().map(|r| r.to_appointment(tz)).collect()
}

pub fn windows_from(records: &[UnavailableRecord]) -> Result<Vec<UnavailabilityWindow>> {
    records.iter().map(UnavailableRecord::to_window).collect()
}
