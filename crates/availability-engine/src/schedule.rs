//! Working-hours data model.
//!
//! Raw wire shapes (`WorkingHoursResponse`, `DayConfig`, slots and breaks) as
//! returned by the working-hours API, and the normalized per-provider
//! `WorkingHoursData` the aggregator consumes.

use std::collections::{BTreeMap, BTreeSet};

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AvailabilityError, Result};
use crate::merge::TimeRange;
use crate::time::{
    minutes_to_decimal_hours, minutes_to_time_string, time_string_to_decimal_hours,
    weekday_code, MINUTES_PER_DAY,
};

/// Timezone assumed when a provider's schedule does not name one.
pub const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";

/// One open interval within a single day, in minutes since midnight.
///
/// Signed so that out-of-range input can be reported instead of failing
/// deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHoursSlot {
    pub start: i32,
    pub end: i32,
}

/// A sub-interval of a slot during which the provider is not available.
pub type WorkingHoursBreak = WorkingHoursSlot;

impl WorkingHoursSlot {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }
}

/// Raw configuration for one weekday.
///
/// A `hours` or `breaks` value of the wrong shape reads as absent, so a
/// malformed field closes that day instead of rejecting the whole schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayConfig {
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub hours: Option<Vec<WorkingHoursSlot>>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub breaks: Option<Vec<WorkingHoursBreak>>,
}

/// A provider's raw weekly schedule, keyed by two-letter weekday code.
///
/// A weekday entry that is not an object (`null`, a string, ...) reads as an
/// empty [`DayConfig`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingHoursResponse {
    #[serde(
        default,
        deserialize_with = "lenient_days",
        skip_serializing_if = "Option::is_none"
    )]
    pub week_day_config: Option<BTreeMap<String, DayConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// Either a well-formed `T` or anything else.
#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Valid(T),
    Invalid(IgnoredAny),
}

impl<T> Lenient<T> {
    fn valid(self) -> Option<T> {
        match self {
            Lenient::Valid(value) => Some(value),
            Lenient::Invalid(_) => None,
        }
    }
}

fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Lenient::<T>::deserialize(deserializer)?.valid())
}

fn lenient_days<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<BTreeMap<String, DayConfig>>, D::Error>
where
    D: Deserializer<'de>,
{
    let days: Option<BTreeMap<String, Lenient<DayConfig>>> = lenient(deserializer)?;
    Ok(days.map(|days| {
        days.into_iter()
            .map(|(code, config)| (code, config.valid().unwrap_or_default()))
            .collect()
    }))
}

/// A normalized contiguous availability window, already split around breaks.
///
/// Blocks can only be built through [`WorkingHoursBlock::new`] or by
/// deserializing a record whose time strings agree with its minute fields, so
/// every block in memory satisfies `start_minutes < end_minutes <= 1440` and
/// has at least one weekday in `0..=6`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "BlockRecord")]
pub struct WorkingHoursBlock {
    days_of_week: BTreeSet<u8>,
    start_time: String,
    end_time: String,
    start_minutes: u32,
    end_minutes: u32,
}

impl WorkingHoursBlock {
    /// Build a block covering `start_minutes..end_minutes` on `days`.
    ///
    /// # Errors
    /// Returns `AvailabilityError::InvalidWeekday` for an empty day set or a day
    /// past 6, and `AvailabilityError::InvalidInterval` when the minutes are not
    /// an ordered, non-empty range within the day.
    pub fn new(
        days: impl IntoIterator<Item = u8>,
        start_minutes: u32,
        end_minutes: u32,
    ) -> Result<Self> {
        let days_of_week: BTreeSet<u8> = days.into_iter().collect();
        if days_of_week.is_empty() {
            return Err(AvailabilityError::InvalidWeekday("empty day set".to_string()));
        }
        if let Some(bad) = days_of_week.iter().find(|d| **d > 6) {
            return Err(AvailabilityError::InvalidWeekday(bad.to_string()));
        }
        if start_minutes >= end_minutes || end_minutes > MINUTES_PER_DAY {
            return Err(AvailabilityError::InvalidInterval {
                day: describe_days(&days_of_week),
                start: start_minutes as i64,
                end: end_minutes as i64,
                reason: "block must satisfy start < end <= 1440",
            });
        }

        Ok(Self {
            days_of_week,
            start_time: minutes_to_time_string(start_minutes),
            end_time: minutes_to_time_string(end_minutes),
            start_minutes,
            end_minutes,
        })
    }

    pub fn days_of_week(&self) -> &BTreeSet<u8> {
        &self.days_of_week
    }

    pub fn applies_to(&self, day: u8) -> bool {
        self.days_of_week.contains(&day)
    }

    /// Start as `HH:MM`.
    pub fn start_time(&self) -> &str {
        &self.start_time
    }

    /// End as `HH:MM`.
    pub fn end_time(&self) -> &str {
        &self.end_time
    }

    pub fn start_minutes(&self) -> u32 {
        self.start_minutes
    }

    pub fn end_minutes(&self) -> u32 {
        self.end_minutes
    }

    /// The block as a decimal-hour range.
    ///
    /// Both ends go through the same minutes-to-hours conversion, so a block
    /// ending at `12:20` and another starting at `12:20` produce bit-identical
    /// boundaries and the merge engine sees them as touching.
    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(
            minutes_to_decimal_hours(self.start_minutes),
            minutes_to_decimal_hours(self.end_minutes),
        )
    }
}

/// Serialized form of a block, validated on the way in.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockRecord {
    days_of_week: BTreeSet<u8>,
    start_time: String,
    end_time: String,
    start_minutes: u32,
    end_minutes: u32,
}

impl TryFrom<BlockRecord> for WorkingHoursBlock {
    type Error = AvailabilityError;

    fn try_from(record: BlockRecord) -> Result<Self> {
        let block = WorkingHoursBlock::new(
            record.days_of_week,
            record.start_minutes,
            record.end_minutes,
        )?;

        for (text, minutes) in [
            (&record.start_time, record.start_minutes),
            (&record.end_time, record.end_minutes),
        ] {
            let hours = time_string_to_decimal_hours(text)?;
            if (hours - minutes_to_decimal_hours(minutes)).abs() > 1e-9 {
                return Err(AvailabilityError::InvalidTimeString(format!(
                    "{} does not match {} minutes",
                    text, minutes
                )));
            }
        }

        Ok(block)
    }
}

/// Normalized working hours for one provider.
///
/// Replaced wholesale whenever the provider is refetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingHoursData {
    pub blocks: Vec<WorkingHoursBlock>,
    pub timezone: String,
}

impl WorkingHoursData {
    /// Blocks that apply to `day`.
    pub fn blocks_for_day(&self, day: u8) -> impl Iterator<Item = &WorkingHoursBlock> {
        self.blocks.iter().filter(move |b| b.applies_to(day))
    }
}

fn describe_days(days: &BTreeSet<u8>) -> String {
    days.iter()
        .map(|d| weekday_code(*d).unwrap_or("?"))
        .collect::<Vec<_>>()
        .join(",")
}
