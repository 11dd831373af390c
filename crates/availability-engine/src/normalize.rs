//! Working-hours normalization.
//!
//! Turns a provider's raw weekly schedule into a flat list of
//! [`WorkingHoursBlock`]s, one per contiguous availability window, with every
//! slot split around the breaks configured for its day.

use crate::error::{AvailabilityError, Result};
use crate::schedule::{
    DayConfig, WorkingHoursBlock, WorkingHoursBreak, WorkingHoursData, WorkingHoursResponse,
    WorkingHoursSlot, DEFAULT_TIMEZONE,
};
use crate::time::{MINUTES_PER_DAY, WEEKDAY_CODES};

/// Normalize a raw working-hours response into per-weekday blocks.
///
/// Weekdays with no `hours` (absent or empty) produce no blocks; the aggregator
/// reads that as a closed day. Each emitted block is tagged with the single
/// weekday it came from. A missing timezone defaults to `Asia/Kolkata`.
///
/// # Errors
/// Returns `AvailabilityError::InvalidInterval` if any slot or break on an open
/// day has `start >= end` or lies outside the day.
pub fn normalize_working_hours(response: &WorkingHoursResponse) -> Result<WorkingHoursData> {
    let timezone = response
        .timezone
        .clone()
        .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());

    let Some(config) = &response.week_day_config else {
        return Ok(WorkingHoursData {
            blocks: Vec::new(),
            timezone,
        });
    };

    let mut blocks = Vec::new();
    for (day, code) in WEEKDAY_CODES.iter().enumerate() {
        if let Some(day_config) = config.get(*code) {
            blocks.extend(normalize_day(day as u8, code, day_config)?);
        }
    }

    Ok(WorkingHoursData { blocks, timezone })
}

fn normalize_day(day: u8, code: &str, config: &DayConfig) -> Result<Vec<WorkingHoursBlock>> {
    let hours = match config.hours.as_deref() {
        Some(hours) if !hours.is_empty() => hours,
        _ => return Ok(Vec::new()),
    };
    let breaks = config.breaks.as_deref().unwrap_or_default();

    for slot in hours {
        validate_interval(code, slot, "slot")?;
    }
    for b in breaks {
        validate_interval(code, b, "break")?;
    }

    let mut blocks = Vec::new();
    for slot in hours {
        let pieces = if breaks.is_empty() {
            vec![*slot]
        } else {
            apply_breaks(*slot, breaks)
        };
        for piece in pieces {
            // Validated above: 0 <= start < end <= 1440.
            blocks.push(WorkingHoursBlock::new(
                [day],
                piece.start as u32,
                piece.end as u32,
            )?);
        }
    }

    Ok(blocks)
}

/// Split a slot around its breaks.
///
/// Breaks are sorted by start first, so they may arrive in any order and may
/// overlap. Walking the slot left to right, every break that starts strictly
/// inside the remaining part of the slot closes the current piece and moves the
/// cursor past the break's end. Breaks outside the slot are ignored.
///
/// If nothing survives (a break covering the whole slot, for example) the
/// original slot is returned unsplit, so a slot never silently disappears.
pub fn apply_breaks(slot: WorkingHoursSlot, breaks: &[WorkingHoursBreak]) -> Vec<WorkingHoursSlot> {
    let mut sorted: Vec<WorkingHoursBreak> = breaks.to_vec();
    sorted.sort_by_key(|b| b.start);

    let mut pieces = Vec::new();
    let mut cursor = slot.start;

    for b in &sorted {
        if b.start > cursor && b.start < slot.end {
            pieces.push(WorkingHoursSlot::new(cursor, b.start));
            cursor = cursor.max(b.end);
        }
    }

    // Remainder after the last break.
    if cursor < slot.end {
        pieces.push(WorkingHoursSlot::new(cursor, slot.end));
    }

    if pieces.is_empty() {
        vec![slot]
    } else {
        pieces
    }
}

fn validate_interval(code: &str, interval: &WorkingHoursSlot, kind: &str) -> Result<()> {
    let reason = if interval.start >= interval.end {
        Some("start is not before end")
    } else if interval.start < 0 || interval.start >= MINUTES_PER_DAY as i32 {
        Some("start is outside the day")
    } else if interval.end > MINUTES_PER_DAY as i32 {
        Some("end is past midnight")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(AvailabilityError::InvalidInterval {
            day: format!("{} {}", code, kind),
            start: interval.start as i64,
            end: interval.end as i64,
            reason,
        }),
        None => Ok(()),
    }
}
