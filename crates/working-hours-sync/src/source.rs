//! Working-hours provider.
//!
//! The API answers `{"data": {"awhours": {weekDayConfig, timezone}}}`; the
//! payload is normalized before it leaves this module.

use async_trait::async_trait;
use availability_engine::{normalize_working_hours, WorkingHoursData, WorkingHoursResponse};
use serde::Deserialize;

use crate::client::ApiClient;
use crate::error::Result;

/// Anything that can produce one provider's normalized working hours.
///
/// `Ok(None)` means the provider has no schedule on record.
#[async_trait]
pub trait WorkingHoursSource: Send + Sync {
    async fn fetch(&self, user_id: &str, account_id: &str) -> Result<Option<WorkingHoursData>>;
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<EnvelopeData>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeData {
    #[serde(default)]
    awhours: Option<WorkingHoursResponse>,
}

/// `type` query parameter: the account's own schedule or one of its users'.
pub fn schedule_type(user_id: &str, account_id: &str) -> &'static str {
    if user_id == account_id {
        "ACCOUNT"
    } else {
        "USER"
    }
}

/// Fetches working hours over HTTP.
#[derive(Clone)]
pub struct HttpWorkingHoursSource {
    client: ApiClient,
    url: String,
}

impl HttpWorkingHoursSource {
    pub fn new(client: ApiClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl WorkingHoursSource for HttpWorkingHoursSource {
    async fn fetch(&self, user_id: &str, account_id: &str) -> Result<Option<WorkingHoursData>> {
        let query = [
            ("type", schedule_type(user_id, account_id).to_string()),
            ("userId", user_id.to_string()),
        ];
        let envelope: Envelope = self.client.get_json(&self.url, &query).await?;

        match envelope.data.and_then(|d| d.awhours) {
            Some(response) => Ok(Some(normalize_working_hours(&response)?)),
            None => Ok(None),
        }
    }
}
