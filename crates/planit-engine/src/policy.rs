//! Business-hours policy bounding the slot search.
//!
//! The defaults are fixed compatibility constants: 09:00-17:00, Monday to Friday,
//! 30-minute slot granularity and a 30-day search horizon.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};

pub const DEFAULT_OPEN_HOUR: u32 = 9;
pub const DEFAULT_CLOSE_HOUR: u32 = 17;
pub const DEFAULT_GRANULARITY_MINUTES: u32 = 30;
pub const DEFAULT_HORIZON_DAYS: u32 = 30;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// When, and how finely, new appointments may be placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingPolicy {
    /// Earliest start of business each workday.
    pub open: NaiveTime,
    /// Close of business. Appointments may end exactly at this time.
    pub close: NaiveTime,
    /// Days on which slots are offered.
    pub workdays: Vec<Weekday>,
    /// Candidate starts are quantized to this many minutes.
    pub granularity_minutes: u32,
    /// Number of calendar days (weekends included) the search may cover.
    pub horizon_days: u32,
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        Self {
            open: NaiveTime::from_hms_opt(DEFAULT_OPEN_HOUR, 0, 0).unwrap_or_default(),
            close: NaiveTime::from_hms_opt(DEFAULT_CLOSE_HOUR, 0, 0).unwrap_or_default(),
            workdays: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            granularity_minutes: DEFAULT_GRANULARITY_MINUTES,
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }
}

impl SchedulingPolicy {
    pub fn validate(&self) -> Result<()> {
        if self.open >= self.close {
            return Err(PlanError::InvalidPolicy(format!(
                "business hours {}-{} are empty",
                self.open.format("%H:%M"),
                self.close.format("%H:%M"),
            )));
        }
        if self.granularity_minutes == 0 || self.granularity_minutes > MINUTES_PER_DAY {
            return Err(PlanError::InvalidPolicy(format!(
                "granularity must be between 1 and {} minutes, got {}",
                MINUTES_PER_DAY, self.granularity_minutes
            )));
        }
        if self.horizon_days == 0 {
            return Err(PlanError::InvalidPolicy(
                "horizon must cover at least one day".to_string(),
            ));
        }
        if self.workdays.is_empty() {
            return Err(PlanError::InvalidPolicy("no workdays configured".to_string()));
        }
        Ok(())
    }

    pub fn is_workday(&self, date: NaiveDate) -> bool {
        self.workdays.contains(&date.weekday())
    }

    pub fn granularity(&self) -> Duration {
        Duration::minutes(i64::from(self.granularity_minutes))
    }

    /// Round `now` forward to the next granularity boundary. Seconds are dropped,
    /// so a time already on a boundary (e.g. `10:00:45`) stays where it is.
    ///
    /// Rounding past midnight lands on the following day.
    pub fn round_up(&self, now: NaiveDateTime) -> NaiveDateTime {
        let step = i64::from(self.granularity_minutes.max(1));
        let minutes = i64::from(now.hour() * 60 + now.minute());
        let rounded = (minutes + step - 1) / step * step;
        now.date().and_time(NaiveTime::default()) + Duration::minutes(rounded)
    }

    /// The first moment the search may consider, derived from `now`.
    ///
    /// After rounding, a time at or past close moves to the next day's open and a
    /// time before open is clamped to open. Non-workdays are not skipped here.
    pub fn normalize_start(&self, now: NaiveDateTime) -> NaiveDateTime {
        let rounded = self.round_up(now);
        let time = rounded.time();
        if time >= self.close {
            rounded
                .date()
                .succ_opt()
                .map_or(rounded, |next| next.and_time(self.open))
        } else if time < self.open {
            rounded.date().and_time(self.open)
        } else {
            rounded
        }
    }
}
