//! Event fetching with cursor pagination.
//!
//! Two feeds share the events endpoint: internal appointments and events from
//! connected external calendars. Each is paged with its own cursor field, both
//! are fetched concurrently, and the union is deduplicated by event id.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use availability_engine::time::current_month_range_ist;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::client::ApiClient;
use crate::context::{ClientContext, DEFAULT_BRAND_ID, DEFAULT_MERCHANT_ID};
use crate::error::{Result, SyncError};

/// An event as returned by the events API. Fields this crate does not model
/// are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provider_ids: Vec<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_external: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Filter sent with every page request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventQuery {
    pub start_date_time: String,
    pub end_date_time: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub provider_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub consumer_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub calendar_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

impl EventQuery {
    /// Query for `start..end` scoped to the context's providers and calendars.
    pub fn for_context(context: &ClientContext, start: String, end: String) -> Self {
        Self {
            start_date_time: start,
            end_date_time: end,
            provider_ids: context.provider_ids.clone(),
            consumer_ids: Vec::new(),
            calendar_ids: context.calendar_ids.clone(),
            merchant_id: context.account_id().map(str::to_string),
            brand: context
                .brand_id
                .clone()
                .filter(|brand| !brand.is_empty()),
        }
    }

    /// Query covering the calendar month containing `now`, in UTC+05:30.
    pub fn current_month(context: &ClientContext, now: DateTime<Utc>) -> Self {
        let (start, end) = current_month_range_ist(now);
        Self::for_context(context, start, end)
    }

    /// The `q` parameter for one page of the internal feed.
    ///
    /// Calendar ids are not sent; merchant and brand fall back to defaults.
    pub fn internal_params(&self, limit: u32, cursor: &str) -> Value {
        let mut q = json!({
            "isGroup": true,
            "isAllSchedule": true,
            "merchantId": self.merchant_id.as_deref().unwrap_or(DEFAULT_MERCHANT_ID),
            "brand": self.brand.as_deref().unwrap_or(DEFAULT_BRAND_ID),
            "startDateTime": self.start_date_time,
            "endDateTime": self.end_date_time,
        });
        if let Value::Object(map) = &mut q {
            if !self.provider_ids.is_empty() {
                map.insert("providerIds".into(), json!(self.provider_ids));
            }
            if !self.consumer_ids.is_empty() {
                map.insert("consumerIds".into(), json!(self.consumer_ids));
            }
            map.insert("limit".into(), json!(limit));
            map.insert("cursorStr".into(), json!(cursor));
        }
        q
    }

    /// The `q` parameter for one page of the external feed: the query as is.
    pub fn external_params(&self, limit: u32, cursor: &str) -> Value {
        let mut q = serde_json::to_value(self).unwrap_or_else(|_| json!({}));
        if let Value::Object(map) = &mut q {
            map.insert("limit".into(), json!(limit));
            map.insert("cursor".into(), json!(cursor));
        }
        q
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventFeed {
    Internal,
    External,
}

/// One page of events and the cursor for the next, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPage {
    pub events: Vec<RawEvent>,
    pub next_cursor: Option<String>,
}

/// Fetches a single page of a feed.
#[async_trait]
pub trait EventPageSource: Send + Sync {
    async fn fetch_page(&self, feed: EventFeed, query: &EventQuery, cursor: &str)
        -> Result<EventPage>;
}

#[derive(Debug, Deserialize)]
struct PageEnvelope {
    #[serde(default)]
    data: Option<PageData>,
}

#[derive(Debug, Deserialize)]
struct PageData {
    #[serde(default)]
    events: Option<Vec<RawEvent>>,
    #[serde(default)]
    next_cursor: Option<String>,
    #[serde(default)]
    cursor: Option<String>,
}

/// Pages events over HTTP. The external feed lives at `{url}/external`.
#[derive(Clone)]
pub struct HttpEventSource {
    client: ApiClient,
    url: String,
    page_limit: u32,
}

impl HttpEventSource {
    pub fn new(client: ApiClient, url: impl Into<String>, page_limit: u32) -> Self {
        Self {
            client,
            url: url.into(),
            page_limit,
        }
    }
}

#[async_trait]
impl EventPageSource for HttpEventSource {
    async fn fetch_page(
        &self,
        feed: EventFeed,
        query: &EventQuery,
        cursor: &str,
    ) -> Result<EventPage> {
        let (url, q) = match feed {
            EventFeed::Internal => (
                self.url.clone(),
                query.internal_params(self.page_limit, cursor),
            ),
            EventFeed::External => (
                format!("{}/external", self.url),
                query.external_params(self.page_limit, cursor),
            ),
        };
        let q = serde_json::to_string(&q).map_err(|e| SyncError::Decode(e.to_string()))?;
        let envelope: PageEnvelope = self.client.get_json(&url, &[("q", q)]).await?;

        // A page without an events list ends the feed, cursor or not.
        let Some(PageData {
            events: Some(events),
            next_cursor,
            cursor,
        }) = envelope.data
        else {
            return Ok(EventPage::default());
        };
        let next_cursor = match feed {
            EventFeed::Internal => next_cursor,
            EventFeed::External => cursor,
        };
        Ok(EventPage {
            events,
            next_cursor,
        })
    }
}

/// Collect every page of one feed.
///
/// Stops when a page carries no events list, when the cursor is absent or
/// empty, when the external feed returns an empty page, or when the server
/// hands back a cursor it has already used.
pub async fn fetch_feed(
    source: &dyn EventPageSource,
    feed: EventFeed,
    query: &EventQuery,
) -> Result<Vec<RawEvent>> {
    let mut events = Vec::new();
    let mut cursor = String::new();
    let mut used = HashSet::new();

    loop {
        let page = source.fetch_page(feed, query, &cursor).await?;
        if feed == EventFeed::External && page.events.is_empty() {
            break;
        }
        debug!(?feed, count = page.events.len(), "fetched event page");
        events.extend(page.events);

        match page.next_cursor.filter(|next| !next.is_empty()) {
            Some(next) if used.insert(next.clone()) => cursor = next,
            Some(next) => {
                warn!(?feed, cursor = %next, "server repeated a cursor, stopping");
                break;
            }
            None => break,
        }
    }

    Ok(events)
}

/// Fetch both feeds concurrently and merge them.
///
/// Events sharing an id keep the position of their first appearance and the
/// contents of their last, so an external copy replaces an internal one.
pub async fn fetch_all_events(
    source: &dyn EventPageSource,
    query: &EventQuery,
) -> Result<Vec<RawEvent>> {
    let (internal, external) = tokio::try_join!(
        fetch_feed(source, EventFeed::Internal, query),
        fetch_feed(source, EventFeed::External, query),
    )?;
    Ok(dedupe_by_id(internal.into_iter().chain(external)))
}

fn dedupe_by_id(events: impl IntoIterator<Item = RawEvent>) -> Vec<RawEvent> {
    let mut merged: Vec<RawEvent> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for event in events {
        match index.get(&event.id) {
            Some(&i) => merged[i] = event,
            None => {
                index.insert(event.id.clone(), merged.len());
                merged.push(event);
            }
        }
    }
    merged
}
