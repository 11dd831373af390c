//! Interval merging.
//!
//! Sorts decimal-hour ranges by start and folds overlapping or touching ranges
//! into a minimal sorted list of disjoint ranges.

use serde::{Deserialize, Serialize};

/// A half-open range of decimal hours within `[0, 24]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Merge overlapping or touching ranges.
///
/// Returns a sorted, non-overlapping list. Ranges that merely touch
/// (`a.end == b.start`) are joined, so `9–12` followed by `12–15` becomes a
/// single `9–15` window.
pub fn merge_time_ranges(ranges: &[TimeRange]) -> Vec<TimeRange> {
    if ranges.is_empty() {
        return Vec::new();
    }

    let mut sorted = ranges.to_vec();
    sorted.sort_by(|a, b| a.start.total_cmp(&b.start).then(a.end.total_cmp(&b.end)));

    let mut merged: Vec<TimeRange> = Vec::with_capacity(sorted.len());
    for range in sorted {
        if let Some(last) = merged.last_mut() {
            if range.start <= last.end {
                // Overlapping or adjacent: extend the current range.
                last.end = last.end.max(range.end);
                continue;
            }
        }
        merged.push(range);
    }

    merged
}
