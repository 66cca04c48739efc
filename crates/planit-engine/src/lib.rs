//! # planit-engine
//!
//! Slot finding and conflict detection for auto-scheduling tasks into working
//! hours.
//!
//! Given a task length in whole hours, the owner's booked appointments and their
//! weekly unavailability windows, the engine finds the earliest conflict-free
//! start on a 30-minute grid within 09:00-17:00, Monday to Friday, looking at
//! most 30 days ahead. The engine is pure: no clock, no I/O, no shared state.
//! "Now" is a parameter.
//!
//! ## Modules
//!
//! - [`model`] — `Appointment` and `UnavailabilityWindow`
//! - [`policy`] — Business hours, workdays, granularity and horizon
//! - [`availability`] — Half-open conflict checks for a single candidate
//! - [`slots`] — First-fit search over the candidate sequence
//! - [`records`] — JSON records shared with the persistence and UI layers
//! - [`error`] — Error types

pub mod availability;
pub mod error;
pub mod model;
pub mod policy;
pub mod records;
pub mod slots;

pub use availability::{find_conflicts, is_available, Conflict, ConflictSource};
pub use error::PlanError;
pub use model::{Appointment, UnavailabilityWindow};
pub use policy::SchedulingPolicy;
pub use records::{EventRecord, UnavailableRecord};
pub use slots::{find_next_available_slot, find_next_available_slot_with, find_slot, SlotSearch};
