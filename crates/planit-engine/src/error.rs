//! Error types for planit-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    /// Appointments last at least one whole hour.
    #[error("Invalid duration: {0} hours (must be at least 1)")]
    InvalidDuration(u32),

    #[error("Invalid unavailability window: {0}")]
    InvalidWindow(String),

    #[error("Invalid weekday: {0}")]
    InvalidWeekday(String),

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Invalid datetime: {0}")]
    InvalidDateTime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid scheduling policy: {0}")]
    InvalidPolicy(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlanError>;
