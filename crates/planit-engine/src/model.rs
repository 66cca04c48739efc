//! Scheduling data model: booked appointments and recurring unavailability.
//!
//! All times are naive local times in the owner's business timezone. Converting
//! from wire formats (RFC 3339 strings, `"mon"` weekday codes) happens in
//! [`crate::records`]; this module only holds the semantic types.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};

/// A half-open `[start, end)` span of local time.
pub type Interval = (NaiveDateTime, NaiveDateTime);

/// A scheduled block of time lasting a whole number of hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Appointment {
    /// Local start time.
    pub start: NaiveDateTime,
    /// Length in hours. Zero is a precondition violation.
    pub duration_hours: u32,
}

impl Appointment {
    /// Build an appointment, rejecting a zero-hour duration.
    pub fn new(start: NaiveDateTime, duration_hours: u32) -> Result<Self> {
        let appointment = Self {
            start,
            duration_hours,
        };
        appointment.validate()?;
        Ok(appointment)
    }

    /// Exclusive end of the appointment (`start + duration_hours`).
    pub fn end(&self) -> NaiveDateTime {
        self.start
            .checked_add_signed(Duration::hours(i64::from(self.duration_hours)))
            .unwrap_or(NaiveDateTime::MAX)
    }

    /// The half-open `[start, end)` interval covered by this appointment.
    pub fn interval(&self) -> Interval {
        (self.start, self.end())
    }

    pub fn validate(&self) -> Result<()> {
        if self.duration_hours == 0 {
            return Err(PlanError::InvalidDuration(self.duration_hours));
        }
        Ok(())
    }
}

/// A weekly recurring block during which the owner cannot be scheduled.
///
/// Windows never cross midnight: `end_time` must be strictly after `start_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnavailabilityWindow {
    pub day: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl UnavailabilityWindow {
    /// Build a window, rejecting empty and overnight ranges.
    pub fn new(day: Weekday, start_time: NaiveTime, end_time: NaiveTime) -> Result<Self> {
        let window = Self {
            day,
            start_time,
            end_time,
        };
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> Result<()> {
        if self.end_time <= self.start_time {
            return Err(PlanError::InvalidWindow(format!(
                "{} {}-{}: end time must be after start time",
                self.day,
                self.start_time.format("%H:%M"),
                self.end_time.format("%H:%M"),
            )));
        }
        Ok(())
    }

    /// The absolute `[start, end)` interval of this window on `date`, or `None`
    /// when `date` falls on a different weekday.
    pub fn on_date(&self, date: NaiveDate) -> Option<Interval> {
        (date.weekday() == self.day)
            .then(|| (date.and_time(self.start_time), date.and_time(self.end_time)))
    }
}
