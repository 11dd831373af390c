//! # availability-engine
//!
//! Working-hours normalization and multi-provider unavailable-hours computation
//! for calendar timelines.
//!
//! Providers publish weekly working hours as per-weekday slots with optional
//! breaks. The engine splits those slots around breaks, merges every provider's
//! windows for a weekday into one availability view, and inverts it into the
//! whole-hour ranges a timeline paints as unavailable. All computation is pure
//! and synchronous; fetching schedules is left to the caller.
//!
//! ## Modules
//!
//! - [`time`] — minutes ↔ `HH:MM` ↔ decimal hours, weekday codes, month bounds
//! - [`schedule`] — raw schedule wire types and normalized blocks
//! - [`normalize`] — raw schedule → blocks split around breaks
//! - [`merge`] — merge overlapping or touching ranges
//! - [`invert`] — available ranges → whole-hour unavailable ranges
//! - [`aggregate`] — multi-provider per-weekday and per-date results
//! - [`presence`] — is a provider working at a given instant
//! - [`error`] — Error types

pub mod aggregate;
pub mod error;
pub mod invert;
pub mod merge;
pub mod normalize;
pub mod presence;
pub mod schedule;
pub mod time;

pub use aggregate::{
    unavailable_hours_by_day_of_week, unavailable_hours_for_date, unavailable_hours_for_dates,
    ProviderMap, UnavailableHoursByDayOfWeek,
};
pub use error::AvailabilityError;
pub use invert::{invert_time_ranges, UnavailableHour};
pub use merge::{merge_time_ranges, TimeRange};
pub use normalize::normalize_working_hours;
pub use presence::is_within_working_hours;
pub use schedule::{
    DayConfig, WorkingHoursBlock, WorkingHoursBreak, WorkingHoursData, WorkingHoursResponse,
    WorkingHoursSlot,
};
