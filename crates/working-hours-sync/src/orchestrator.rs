//! Multi-provider fetch orchestration and the derived availability cache.
//!
//! Providers are fetched concurrently and every fetch is awaited; a provider
//! whose fetch fails is left out of the map and reported as a warning. The
//! cache recomputes the weekday table only when a new provider map is
//! accepted, and only installs the result of the most recently started
//! fetch.

use std::collections::BTreeSet;
use std::sync::Arc;

use availability_engine::time::day_of_week;
use availability_engine::{
    unavailable_hours_by_day_of_week, ProviderMap, UnavailableHour, UnavailableHoursByDayOfWeek,
};
use chrono::NaiveDate;
use futures::future::join_all;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::client::ApiClient;
use crate::config::SyncConfig;
use crate::context::{ClientContext, TokenSource};
use crate::error::{Result, SyncError};
use crate::source::{HttpWorkingHoursSource, WorkingHoursSource};

/// A provider left out of a sync, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderWarning {
    pub provider_id: String,
    pub message: String,
}

/// Result of fetching a set of providers.
#[derive(Debug, Clone, Default)]
pub struct SyncOutcome {
    /// Providers that returned a schedule.
    pub providers: ProviderMap,
    /// Providers whose fetch failed.
    pub warnings: Vec<ProviderWarning>,
}

/// Fetch working hours for every id in `provider_ids` concurrently.
///
/// Never fails as a whole. Providers with no schedule are omitted silently;
/// providers whose fetch errored are omitted with a warning.
pub async fn fetch_multiple_working_hours(
    source: &dyn WorkingHoursSource,
    provider_ids: &[String],
    account_id: &str,
) -> SyncOutcome {
    let fetches = provider_ids.iter().map(|id| async move {
        let result = source.fetch(id, account_id).await;
        (id, result)
    });

    let mut outcome = SyncOutcome::default();
    for (id, result) in join_all(fetches).await {
        match result {
            Ok(Some(data)) => {
                outcome.providers.insert(id.clone(), data);
            }
            Ok(None) => {}
            Err(e) => {
                warn!(provider_id = %id, error = %e, "omitting provider");
                outcome.warnings.push(ProviderWarning {
                    provider_id: id.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        requested = provider_ids.len(),
        fetched = outcome.providers.len(),
        failed = outcome.warnings.len(),
        "working hours sync finished"
    );
    outcome
}

/// Issued by [`AvailabilityCache::begin_fetch`]. Only the ticket of the most
/// recent fetch is honored, whatever providers it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

/// Current provider map plus the weekday table derived from it.
#[derive(Debug, Clone)]
pub struct AvailabilityCache {
    selection: BTreeSet<String>,
    providers: ProviderMap,
    by_weekday: UnavailableHoursByDayOfWeek,
    fallback: Vec<UnavailableHour>,
    generation: u64,
    revision: u64,
}

impl AvailabilityCache {
    /// An empty cache. `fallback` is returned for every day until some
    /// provider has working hours.
    pub fn new(fallback: Vec<UnavailableHour>) -> Self {
        Self {
            selection: BTreeSet::new(),
            providers: ProviderMap::new(),
            by_weekday: UnavailableHoursByDayOfWeek::new(),
            fallback,
            generation: 0,
            revision: 0,
        }
    }

    /// Record a new provider selection and return the ticket its fetch must
    /// present to [`apply`](Self::apply). Every earlier ticket is superseded,
    /// including one for the same providers.
    pub fn begin_fetch<I, S>(&mut self, provider_ids: I) -> FetchTicket
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection = provider_ids.into_iter().map(Into::into).collect();
        self.generation += 1;
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Install `outcome` if `ticket` came from the latest
    /// [`begin_fetch`](Self::begin_fetch).
    ///
    /// Returns `false`, leaving the cache untouched, for a superseded fetch.
    pub fn apply(&mut self, ticket: &FetchTicket, outcome: SyncOutcome) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.by_weekday = unavailable_hours_by_day_of_week(&outcome.providers);
        self.providers = outcome.providers;
        self.revision += 1;
        true
    }

    pub fn providers(&self) -> &ProviderMap {
        &self.providers
    }

    /// Providers named by the latest [`begin_fetch`](Self::begin_fetch).
    pub fn selection(&self) -> &BTreeSet<String> {
        &self.selection
    }

    /// Incremented every time an outcome is accepted.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The derived table, empty when no provider has data.
    pub fn weekday_table(&self) -> &UnavailableHoursByDayOfWeek {
        &self.by_weekday
    }

    pub fn unavailable_for_weekday(&self, day: u8) -> &[UnavailableHour] {
        self.by_weekday
            .get(&day)
            .map(Vec::as_slice)
            .unwrap_or(self.fallback.as_slice())
    }

    pub fn unavailable_for(&self, date: NaiveDate) -> &[UnavailableHour] {
        self.unavailable_for_weekday(day_of_week(date))
    }
}

/// Outcome of [`AvailabilitySync::refresh`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    /// Whether the fetched map was installed.
    pub accepted: bool,
    pub warnings: Vec<ProviderWarning>,
}

/// Shared, async-safe front for a working-hours source and its cache.
pub struct AvailabilitySync {
    source: Arc<dyn WorkingHoursSource>,
    cache: RwLock<AvailabilityCache>,
}

impl AvailabilitySync {
    pub fn new(source: Arc<dyn WorkingHoursSource>, fallback: Vec<UnavailableHour>) -> Self {
        Self {
            source,
            cache: RwLock::new(AvailabilityCache::new(fallback)),
        }
    }

    /// Build a sync backed by the HTTP working-hours API.
    pub fn from_config(config: &SyncConfig, tokens: Arc<dyn TokenSource>) -> Result<Self> {
        let client = ApiClient::new(config, tokens)?;
        let source = HttpWorkingHoursSource::new(client, config.endpoints.working_hours.clone());
        Ok(Self::new(
            Arc::new(source),
            config.fallback_unavailable.clone(),
        ))
    }

    /// Fetch the context's providers and install the result.
    ///
    /// # Errors
    /// `SyncError::MissingAccountId` when providers are selected but the
    /// context has no account. Individual provider failures are warnings.
    pub async fn refresh(&self, context: &ClientContext) -> Result<RefreshReport> {
        let ticket = self
            .cache
            .write()
            .await
            .begin_fetch(context.provider_ids.iter().cloned());

        let outcome = if context.provider_ids.is_empty() {
            SyncOutcome::default()
        } else {
            let account_id = context.account_id().ok_or(SyncError::MissingAccountId)?;
            fetch_multiple_working_hours(self.source.as_ref(), &context.provider_ids, account_id)
                .await
        };

        let warnings = outcome.warnings.clone();
        let accepted = self.cache.write().await.apply(&ticket, outcome);
        if !accepted {
            info!("discarding working hours from a superseded fetch");
        }
        Ok(RefreshReport { accepted, warnings })
    }

    pub async fn unavailable_for_weekday(&self, day: u8) -> Vec<UnavailableHour> {
        self.cache.read().await.unavailable_for_weekday(day).to_vec()
    }

    pub async fn unavailable_for(&self, date: NaiveDate) -> Vec<UnavailableHour> {
        self.cache.read().await.unavailable_for(date).to_vec()
    }

    pub async fn weekday_table(&self) -> UnavailableHoursByDayOfWeek {
        self.cache.read().await.weekday_table().clone()
    }

    pub async fn providers(&self) -> ProviderMap {
        self.cache.read().await.providers().clone()
    }
}
