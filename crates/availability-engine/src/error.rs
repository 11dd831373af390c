//! Error types for availability-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AvailabilityError {
    /// A slot or break whose bounds are reversed, empty, or outside the day.
    #[error("Invalid interval {start}..{end} on {day}: {reason}")]
    InvalidInterval {
        day: String,
        start: i64,
        end: i64,
        reason: &'static str,
    },

    #[error("Invalid time string: {0}")]
    InvalidTimeString(String),

    #[error("Invalid weekday: {0}")]
    InvalidWeekday(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

pub type Result<T> = std::result::Result<T, AvailabilityError>;
