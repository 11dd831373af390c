//! # working-hours-sync
//!
//! Fetches provider working hours and calendar events from the scheduling
//! services and feeds them to [`availability_engine`].
//!
//! Providers are fetched concurrently; a provider that fails is omitted and
//! reported as a [`ProviderWarning`] rather than failing the whole sync. The
//! [`AvailabilityCache`] keeps the weekday table derived from the latest
//! accepted provider map so that looking up a date is a map read.
//!
//! ## Modules
//!
//! - [`config`] — environment selection, endpoints, timeouts, fallback window
//! - [`context`] — per-user request context and token source
//! - [`client`] — HTTP client with bearer auth and retry policy
//! - [`source`] — working-hours provider trait and HTTP implementation
//! - [`events`] — paginated internal and external event feeds
//! - [`orchestrator`] — concurrent fan-out, warnings, and the availability cache
//! - [`error`] — Error types

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod orchestrator;
pub mod source;

pub use client::{ApiClient, RetryPolicy};
pub use config::{Endpoints, Environment, SyncConfig};
pub use context::{ClientContext, StaticToken, TokenSource};
pub use error::SyncError;
pub use events::{
    fetch_all_events, fetch_feed, EventFeed, EventPage, EventPageSource, EventQuery,
    HttpEventSource, RawEvent,
};
pub use orchestrator::{
    fetch_multiple_working_hours, AvailabilityCache, AvailabilitySync, FetchTicket,
    ProviderWarning, RefreshReport, SyncOutcome,
};
pub use source::{HttpWorkingHoursSource, WorkingHoursSource};
