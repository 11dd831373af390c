//! HTTP transport with bearer auth and status-based retries.
//!
//! A 401 is retried once after re-reading the token; a 5xx up to twice. Any
//! other failure, including transport errors, is returned immediately.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::SyncConfig;
use crate::context::TokenSource;
use crate::error::{Result, SyncError};

/// How many times, and after how long, a failed request is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub auth_retries: u32,
    pub server_retries: u32,
    pub auth_delay: Duration,
    pub server_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            auth_retries: 1,
            server_retries: 2,
            auth_delay: Duration::from_secs(5),
            server_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// A policy with the default retry counts and no waiting between attempts.
    pub fn immediate() -> Self {
        Self {
            auth_delay: Duration::ZERO,
            server_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Total retries allowed once a request has failed with `status`.
    pub fn max_retries(&self, status: StatusCode) -> u32 {
        if status == StatusCode::UNAUTHORIZED {
            self.auth_retries
        } else if status.is_server_error() {
            self.server_retries
        } else {
            0
        }
    }

    /// Wait before retrying a request that failed with `status`.
    pub fn delay(&self, status: StatusCode) -> Duration {
        if status == StatusCode::UNAUTHORIZED {
            self.auth_delay
        } else {
            self.server_delay
        }
    }
}

/// JSON-over-HTTP client shared by the working-hours and events fetchers.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    tokens: Arc<dyn TokenSource>,
    retry: RetryPolicy,
}

impl ApiClient {
    pub fn new(config: &SyncConfig, tokens: Arc<dyn TokenSource>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            tokens,
            retry: config.retry,
        })
    }

    /// GET `url` with `query` and decode the JSON body.
    ///
    /// # Errors
    /// `SyncError::MissingToken` if no token is available before an attempt,
    /// `SyncError::Status` once retries for a failing status are exhausted, and
    /// `SyncError::Http` for transport or decoding failures.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let mut retries = 0;

        loop {
            let token = self
                .tokens
                .access_token()
                .await
                .ok_or(SyncError::MissingToken)?;

            debug!(url, attempt = retries + 1, "GET");
            let response = self
                .http
                .get(url)
                .query(query)
                .bearer_auth(token)
                .send()
                .await?;

            let status = response.status();
            if status.is_success() {
                return Ok(response.json::<T>().await?);
            }

            if retries >= self.retry.max_retries(status) {
                return Err(SyncError::Status {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }

            retries += 1;
            let delay = self.retry.delay(status);
            warn!(url, status = status.as_u16(), retry = retries, ?delay, "retrying request");
            tokio::time::sleep(delay).await;
        }
    }
}
