//! Multi-provider aggregation.
//!
//! Collects the working-hour blocks of every provider for a weekday, merges
//! them into one availability view and inverts it into the unavailable hours a
//! timeline paints as non-bookable. Everything here is a pure function of the
//! provider map (and the date, for the date entry points).

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::invert::{invert_time_ranges, UnavailableHour};
use crate::merge::{merge_time_ranges, TimeRange};
use crate::schedule::WorkingHoursData;
use crate::time::day_of_week;

/// Provider id → normalized working hours.
pub type ProviderMap = BTreeMap<String, WorkingHoursData>;

/// Weekday index (0 = Sunday) → unavailable hours for that weekday.
pub type UnavailableHoursByDayOfWeek = BTreeMap<u8, Vec<UnavailableHour>>;

/// Compute unavailable hours for every weekday at once.
///
/// With no providers the map is empty; the caller decides what to show in that
/// case. A weekday on which no provider has any block is fully unavailable.
/// Date navigation should index into this table rather than recompute.
pub fn unavailable_hours_by_day_of_week(providers: &ProviderMap) -> UnavailableHoursByDayOfWeek {
    if providers.is_empty() {
        return UnavailableHoursByDayOfWeek::new();
    }

    (0..7u8)
        .map(|day| (day, unavailable_for_weekday(providers, day)))
        .collect()
}

/// Compute unavailable hours for a single calendar date.
///
/// Equivalent to looking up the date's weekday in
/// [`unavailable_hours_by_day_of_week`]; returns an empty list when there are
/// no providers.
pub fn unavailable_hours_for_date(providers: &ProviderMap, date: NaiveDate) -> Vec<UnavailableHour> {
    if providers.is_empty() {
        return Vec::new();
    }
    unavailable_for_weekday(providers, day_of_week(date))
}

/// Compute unavailable hours for several dates, keyed by date.
pub fn unavailable_hours_for_dates(
    providers: &ProviderMap,
    dates: &[NaiveDate],
) -> BTreeMap<NaiveDate, Vec<UnavailableHour>> {
    dates
        .iter()
        .map(|date| (*date, unavailable_hours_for_date(providers, *date)))
        .collect()
}

/// Merged available ranges for a weekday across all providers.
pub fn available_ranges_for_weekday(providers: &ProviderMap, day: u8) -> Vec<TimeRange> {
    let ranges: Vec<TimeRange> = providers
        .values()
        .flat_map(|data| data.blocks_for_day(day))
        .map(|block| block.time_range())
        .collect();

    merge_time_ranges(&ranges)
}

fn unavailable_for_weekday(providers: &ProviderMap, day: u8) -> Vec<UnavailableHour> {
    // No blocks merges to nothing, which inverts to the full day.
    invert_time_ranges(&available_ranges_for_weekday(providers, day))
}
