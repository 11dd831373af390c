//! Time representation utilities.
//!
//! Conversions between minutes since midnight, `HH:MM` strings, and decimal
//! hours, plus the weekday and month-boundary helpers the rest of the crate and
//! the fetch layer build on. Weekdays are numbered from Sunday (`0`) to
//! Saturday (`6`) throughout.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Offset, Utc};

use crate::error::{AvailabilityError, Result};

/// Minutes in one day. A slot may end exactly here.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Two-letter weekday codes used by the working-hours API, indexed by weekday.
pub const WEEKDAY_CODES: [&str; 7] = ["SU", "MO", "TU", "WE", "TH", "FR", "SA"];

/// Offset used for the events date-range query (UTC+05:30).
const IST_OFFSET_SECONDS: i32 = 5 * 3600 + 30 * 60;

/// Format minutes since midnight as a zero-padded 24-hour `HH:MM` string.
///
/// Inputs are expected in `[0, 1440]`; nothing is clamped or wrapped, so
/// `1440` formats as `"24:00"`.
pub fn minutes_to_time_string(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Parse an `HH:MM` string into decimal hours (`"09:30"` → `9.5`).
///
/// Accepts `00:00` through `24:00`.
///
/// # Errors
/// Returns `AvailabilityError::InvalidTimeString` when the string is not two
/// colon-separated integers, the minutes are 60 or more, or the value is past
/// `24:00`.
pub fn time_string_to_decimal_hours(time: &str) -> Result<f64> {
    let invalid = || AvailabilityError::InvalidTimeString(time.to_string());

    let (h, m) = time.split_once(':').ok_or_else(invalid)?;
    let hours: u32 = h.trim().parse().map_err(|_| invalid())?;
    let minutes: u32 = m.trim().parse().map_err(|_| invalid())?;

    if minutes >= 60 || hours > 24 || (hours == 24 && minutes > 0) {
        return Err(invalid());
    }

    Ok(hours as f64 + minutes as f64 / 60.0)
}

/// Convert minutes since midnight into decimal hours.
pub fn minutes_to_decimal_hours(minutes: u32) -> f64 {
    minutes as f64 / 60.0
}

/// Two-letter API code for a weekday index, or `None` outside `0..=6`.
pub fn weekday_code(day: u8) -> Option<&'static str> {
    WEEKDAY_CODES.get(day as usize).copied()
}

/// Weekday index for a two-letter API code (`"MO"` → `1`).
///
/// # Errors
/// Returns `AvailabilityError::InvalidWeekday` for anything other than the
/// seven upper-case codes.
pub fn weekday_from_code(code: &str) -> Result<u8> {
    WEEKDAY_CODES
        .iter()
        .position(|c| *c == code)
        .map(|i| i as u8)
        .ok_or_else(|| AvailabilityError::InvalidWeekday(code.to_string()))
}

/// Weekday index of a calendar date (Sunday = 0).
pub fn day_of_week(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AvailabilityError::InvalidDate(date.to_string()))
}

/// The date with weekday `day` in the Sunday-started week containing `base`.
///
/// # Errors
/// Returns `AvailabilityError::InvalidWeekday` when `day > 6`.
pub fn date_for_day_of_week(base: NaiveDate, day: u8) -> Result<NaiveDate> {
    if day > 6 {
        return Err(AvailabilityError::InvalidWeekday(day.to_string()));
    }
    let diff = day as i64 - day_of_week(base) as i64;
    Ok(base + Duration::days(diff))
}

/// The fixed UTC+05:30 offset.
pub fn ist_offset() -> FixedOffset {
    // 19800 seconds is always within FixedOffset's ±86400 range.
    FixedOffset::east_opt(IST_OFFSET_SECONDS).unwrap_or_else(|| Utc.fix())
}

/// First instant of the month containing `date`, as `YYYY-MM-DDT00:00:00+05:30`.
pub fn month_start_ist(date: NaiveDate) -> String {
    let first = date.with_day(1).unwrap_or(date);
    format!("{}T00:00:00+05:30", first.format("%Y-%m-%d"))
}

/// Last second of the month containing `date`, as `YYYY-MM-DDT23:59:59+05:30`.
pub fn month_end_ist(date: NaiveDate) -> String {
    let last = last_day_of_month(date);
    format!("{}T23:59:59+05:30", last.format("%Y-%m-%d"))
}

/// Month range (start, end) for the month that `now` falls in at UTC+05:30.
pub fn current_month_range_ist(now: DateTime<Utc>) -> (String, String) {
    let local_date = now.with_timezone(&ist_offset()).date_naive();
    (month_start_ist(local_date), month_end_ist(local_date))
}

fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

