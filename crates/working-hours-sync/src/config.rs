//! Runtime configuration.
//!
//! The target environment is an explicit value chosen at startup; nothing is
//! compiled in beyond the endpoint presets for each environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use availability_engine::UnavailableHour;

use crate::client::RetryPolicy;
use crate::error::{Result, SyncError};

/// Page size requested from the events API.
pub const DEFAULT_EVENT_PAGE_LIMIT: u32 = 500;

/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Which deployment of the scheduling and working-hours services to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Staging,
}

impl FromStr for Environment {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "staging" | "stage" => Ok(Environment::Staging),
            other => Err(SyncError::Config(format!(
                "Unknown environment '{}'. Expected production or staging",
                other
            ))),
        }
    }
}

/// Service URLs for one environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub events: String,
    pub working_hours: String,
}

impl Environment {
    pub fn endpoints(&self) -> Endpoints {
        match self {
            Environment::Production => Endpoints {
                events: "https://schedule.setmore.com/schedule/v1/events".to_string(),
                working_hours: "https://api.anywhereworks.com/api/v1/awhours".to_string(),
            },
            Environment::Staging => Endpoints {
                events: "https://dev.setmore.info/schedule/v1/events".to_string(),
                working_hours: "https://api.staging.anywhereworks.com/api/v1/awhours"
                    .to_string(),
            },
        }
    }
}

/// Everything the fetch layer needs besides per-user context.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub environment: Environment,
    pub endpoints: Endpoints,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
    pub event_page_limit: u32,
    /// Shown on every weekday when no provider has working hours at all.
    pub fallback_unavailable: Vec<UnavailableHour>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl SyncConfig {
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            endpoints: environment.endpoints(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            retry: RetryPolicy::default(),
            event_page_limit: DEFAULT_EVENT_PAGE_LIMIT,
            fallback_unavailable: default_fallback_unavailable(),
        }
    }

    /// Load configuration from the process environment (and `.env` if present).
    ///
    /// Recognized variables:
    /// - `AVAILABILITY_ENV`: `production` (default) or `staging`
    /// - `AVAILABILITY_TIMEOUT_SECS`: request timeout in seconds
    /// - `AVAILABILITY_EVENTS_URL`, `AVAILABILITY_HOURS_URL`: endpoint overrides
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("AVAILABILITY_ENV") {
            Some(value) => value.parse()?,
            None => Environment::default(),
        };
        let mut config = Self::for_environment(environment);

        if let Some(secs) = lookup("AVAILABILITY_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                SyncError::Config(format!("Invalid AVAILABILITY_TIMEOUT_SECS: {}", secs))
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(url) = lookup("AVAILABILITY_EVENTS_URL") {
            config.endpoints.events = url;
        }
        if let Some(url) = lookup("AVAILABILITY_HOURS_URL") {
            config.endpoints.working_hours = url;
        }

        Ok(config)
    }
}

/// Closed overnight: `00:00–08:00` and `20:00–24:00`.
pub fn default_fallback_unavailable() -> Vec<UnavailableHour> {
    vec![UnavailableHour::new(0, 8), UnavailableHour::new(20, 24)]
}
