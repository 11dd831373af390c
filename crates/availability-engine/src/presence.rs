//! Point-in-time working-hours checks.

use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;

use crate::error::{AvailabilityError, Result};
use crate::schedule::WorkingHoursData;

/// Whether `instant` falls inside one of the provider's blocks.
///
/// The instant is converted to the provider's own IANA timezone before its
/// weekday and minute of day are compared against the blocks. Block ends are
/// exclusive.
///
/// # Errors
/// Returns `AvailabilityError::InvalidTimezone` if the provider's timezone is
/// not a valid IANA identifier.
pub fn is_within_working_hours(instant: DateTime<Utc>, data: &WorkingHoursData) -> Result<bool> {
    let tz: Tz = data
        .timezone
        .parse()
        .map_err(|_| AvailabilityError::InvalidTimezone(data.timezone.clone()))?;

    let local = instant.with_timezone(&tz);
    let day = local.weekday().num_days_from_sunday() as u8;
    let minute = local.hour() * 60 + local.minute();

    Ok(is_within_working_minute(data, day, minute))
}

/// Whether minute-of-day `minute` on weekday `day` falls inside a block.
pub fn is_within_working_minute(data: &WorkingHoursData, day: u8, minute: u32) -> bool {
    data.blocks_for_day(day)
        .any(|block| minute >= block.start_minutes() && minute < block.end_minutes())
}
