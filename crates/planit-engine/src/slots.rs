//! First-fit search for the next open slot within business hours.
//!
//! The search walks a bounded, lazily generated sequence of candidate start times
//! (day by day, granularity step by step) and returns the first one that passes
//! [`is_available`]. It never looks for a better alternative once a slot fits.
//!
//! "Now" is always supplied by the caller, so identical inputs give identical
//! results.

use std::iter;

use chrono::{Days, Duration, NaiveDateTime};
use tracing::{debug, instrument, trace};

use crate::availability::is_available;
use crate::error::{PlanError, Result};
use crate::model::{Appointment, UnavailabilityWindow};
use crate::policy::SchedulingPolicy;

/// Outcome of a slot search together with how much work it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSearch {
    /// The accepted appointment, or `None` when the horizon was exhausted.
    pub slot: Option<Appointment>,
    /// Number of candidates handed to the availability checker.
    pub candidates_checked: usize,
}

/// Every candidate start time the search would try, in order.
///
/// Day 0 is the date of the normalized start (see
/// [`SchedulingPolicy::normalize_start`]) and the sequence covers
/// `horizon_days` calendar days from it. Non-workdays produce nothing. Day 0
/// begins at the normalized time, later days at `open`. A start is only
/// yielded when `start + duration_hours` is at or before `close` on that date.
pub fn candidate_starts(
    policy: &SchedulingPolicy,
    duration_hours: u32,
    now: NaiveDateTime,
) -> impl Iterator<Item = NaiveDateTime> + '_ {
    let first = policy.normalize_start(now);
    let first_date = first.date();
    let length = Duration::hours(i64::from(duration_hours));
    let step = policy.granularity();

    (0..policy.horizon_days)
        .filter_map(move |offset| first_date.checked_add_days(Days::new(u64::from(offset))))
        .filter(move |date| {
            let workday = policy.is_workday(*date);
            if workday {
                debug!(%date, "scanning day");
            } else {
                trace!(%date, "skipping non-workday");
            }
            workday
        })
        .flat_map(move |date| {
            let day_start = if date == first_date {
                first
            } else {
                date.and_time(policy.open)
            };
            let close = date.and_time(policy.close);
            let fits = move |t: &NaiveDateTime| {
                t.checked_add_signed(length).is_some_and(|end| end <= close)
            };
            iter::successors(Some(day_start), move |t| t.checked_add_signed(step)).take_while(fits)
        })
}

/// Run the first-fit search under `policy`, reporting the accepted slot (if any)
/// and the number of candidates checked.
///
/// # Errors
/// Returns `PlanError::InvalidDuration` for a zero-hour request and
/// `PlanError::InvalidPolicy` when `policy` fails validation. Both are
/// rejected before any candidate is generated.
#[instrument(
    level = "debug",
    skip(policy, existing, unavailable),
    fields(existing_count = existing.len(), unavailable_count = unavailable.len())
)]
pub fn find_slot(
    policy: &SchedulingPolicy,
    duration_hours: u32,
    existing: &[Appointment],
    unavailable: &[UnavailabilityWindow],
    now: NaiveDateTime,
) -> Result<SlotSearch> {
    if duration_hours == 0 {
        return Err(PlanError::InvalidDuration(duration_hours));
    }
    policy.validate()?;

    let mut candidates_checked = 0;
    for start in candidate_starts(policy, duration_hours, now) {
        candidates_checked += 1;
        let candidate = Appointment {
            start,
            duration_hours,
        };
        if is_available(&candidate, existing, unavailable) {
            debug!(%start, candidates_checked, "slot found");
            return Ok(SlotSearch {
                slot: Some(candidate),
                candidates_checked,
            });
        }
    }

    debug!(candidates_checked, "search horizon exhausted");
    Ok(SlotSearch {
        slot: None,
        candidates_checked,
    })
}

/// Find the next available start time under a custom policy.
///
/// `Ok(None)` means no slot exists within the horizon.
pub fn find_next_available_slot_with(
    policy: &SchedulingPolicy,
    duration_hours: u32,
    existing: &[Appointment],
    unavailable: &[UnavailabilityWindow],
    now: NaiveDateTime,
) -> Result<Option<NaiveDateTime>> {
    let search = find_slot(policy, duration_hours, existing, unavailable, now)?;
    Ok(search.slot.map(|appointment| appointment.start))
}

/// Find the next available start time within 09:00-17:00, Monday to Friday,
/// on a 30-minute grid, at most 30 days ahead of `now`.
///
/// `Ok(None)` means no slot exists within the horizon.
///
/// # Errors
/// Returns `PlanError::InvalidDuration` when `duration_hours` is zero.
pub fn find_next_available_slot(
    duration_hours: u32,
    existing: &[Appointment],
    unavailable: &[UnavailabilityWindow],
    now: NaiveDateTime,
) -> Result<Option<NaiveDateTime>> {
    find_next_available_slot_with(
        &SchedulingPolicy::default(),
        duration_hours,
        existing,
        unavailable,
        now,
    )
}
