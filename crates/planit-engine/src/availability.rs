//! Decide whether a candidate appointment fits around existing commitments.
//!
//! A candidate is blocked by any unavailability window falling on its weekday and
//! by any existing appointment, whenever the half-open intervals overlap.
//! Back-to-back bookings (one ending exactly when the other starts) are NOT
//! conflicts, for windows and appointments alike.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::model::{Appointment, Interval, UnavailabilityWindow};

/// What blocked a candidate. Indices point into the slices passed to the checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum ConflictSource {
    Unavailable(usize),
    Appointment(usize),
}

/// A detected overlap between the candidate and one blocking interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub source: ConflictSource,
    /// Start of the blocking interval.
    pub start: NaiveDateTime,
    /// End of the blocking interval.
    pub end: NaiveDateTime,
    pub overlap_minutes: i64,
}

/// Two half-open intervals overlap iff `a.start < b.end && b.start < a.end`.
fn overlaps(a: Interval, b: Interval) -> bool {
    a.0 < b.1 && b.0 < a.1
}

fn conflict_with(source: ConflictSource, candidate: Interval, blocker: Interval) -> Option<Conflict> {
    overlaps(candidate, blocker).then(|| {
        let overlap_start = candidate.0.max(blocker.0);
        let overlap_end = candidate.1.min(blocker.1);
        Conflict {
            source,
            start: blocker.0,
            end: blocker.1,
            overlap_minutes: (overlap_end - overlap_start).num_minutes(),
        }
    })
}

/// Lazily yield every conflict, unavailability windows first, then appointments,
/// each in input order.
fn conflicts<'a>(
    candidate: &Appointment,
    existing: &'a [Appointment],
    unavailable: &'a [UnavailabilityWindow],
) -> impl Iterator<Item = Conflict> + 'a {
    let interval = candidate.interval();
    let date = candidate.start.date();

    let window_conflicts = unavailable.iter().enumerate().filter_map(move |(i, window)| {
        let blocker = window.on_date(date)?;
        conflict_with(ConflictSource::Unavailable(i), interval, blocker)
    });

    let appointment_conflicts = existing.iter().enumerate().filter_map(move |(i, booked)| {
        conflict_with(ConflictSource::Appointment(i), interval, booked.interval())
    });

    window_conflicts.chain(appointment_conflicts)
}

/// Find every unavailability window and existing appointment that overlaps
/// `candidate`.
///
/// Only windows on the candidate's weekday are considered, anchored to the
/// candidate's calendar date.
pub fn find_conflicts(
    candidate: &Appointment,
    existing: &[Appointment],
    unavailable: &[UnavailabilityWindow],
) -> Vec<Conflict> {
    conflicts(candidate, existing, unavailable).collect()
}

/// Returns `true` when `candidate` overlaps none of `existing` and none of the
/// `unavailable` windows.
///
/// Inputs are trusted: windows with `end_time <= start_time` or zero-hour
/// appointments are not rejected here, they simply never overlap anything.
pub fn is_available(
    candidate: &Appointment,
    existing: &[Appointment],
    unavailable: &[UnavailabilityWindow],
) -> bool {
    match conflicts(candidate, existing, unavailable).next() {
        Some(conflict) => {
            debug!(
                candidate = %candidate.start,
                hours = candidate.duration_hours,
                source = ?conflict.source,
                blocker_start = %conflict.start,
                blocker_end = %conflict.end,
                "candidate rejected"
            );
            false
        }
        None => {
            trace!(
                candidate = %candidate.start,
                hours = candidate.duration_hours,
                "candidate clear"
            );
            true
        }
    }
}
