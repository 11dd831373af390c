//! Interval inversion.
//!
//! Computes the unavailable gaps around a sorted, disjoint list of available
//! ranges within the `[0, 24]` hour domain, rounded to whole hours.
//!
//! Rounding always shrinks the unavailable side: gap starts round up and gap
//! ends round down. A working window of `09:30–17:15` therefore yields
//! unavailable `0–9` and `18–24`. Because of this bias, inverting the result
//! again does not reproduce the original ranges.

use serde::{Deserialize, Serialize};

use crate::merge::TimeRange;

/// End of the hour domain.
pub const HOURS_PER_DAY: u8 = 24;

/// A whole-hour unavailable range consumed by the timeline renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnavailableHour {
    pub start: u8,
    pub end: u8,
}

impl UnavailableHour {
    pub fn new(start: u8, end: u8) -> Self {
        Self { start, end }
    }

    /// The whole day, `0–24`.
    pub fn full_day() -> Self {
        Self::new(0, HOURS_PER_DAY)
    }

    pub fn hours(&self) -> u8 {
        self.end.saturating_sub(self.start)
    }
}

/// Invert sorted, disjoint available ranges into unavailable hours.
///
/// An empty input means nothing is available and yields `[0–24]`.
pub fn invert_time_ranges(available: &[TimeRange]) -> Vec<UnavailableHour> {
    let (Some(first), Some(last)) = (available.first(), available.last()) else {
        return vec![UnavailableHour::full_day()];
    };

    let mut unavailable = Vec::new();

    // Leading gap before the first available range.
    if first.start > 0.0 {
        unavailable.push(UnavailableHour::new(0, floor_hour(first.start)));
    }

    // Gaps between consecutive ranges. Merged input never has touching
    // neighbours, so equality only shows up for unmerged callers.
    for pair in available.windows(2) {
        let (current, next) = (pair[0], pair[1]);
        if next.start > current.end {
            unavailable.push(UnavailableHour::new(
                ceil_hour(current.end),
                floor_hour(next.start),
            ));
        }
    }

    // Trailing gap after the last available range.
    if last.end < HOURS_PER_DAY as f64 {
        unavailable.push(UnavailableHour::new(ceil_hour(last.end), HOURS_PER_DAY));
    }

    unavailable
}

fn floor_hour(hours: f64) -> u8 {
    hours.floor().clamp(0.0, HOURS_PER_DAY as f64) as u8
}

fn ceil_hour(hours: f64) -> u8 {
    hours.ceil().clamp(0.0, HOURS_PER_DAY as f64) as u8
}
