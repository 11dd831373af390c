//! Per-user request context.
//!
//! What the mobile client keeps in local storage (token, merchant and brand,
//! selected providers and calendars) is passed around explicitly as a
//! [`ClientContext`] instead of being read from ambient state.

use async_trait::async_trait;

/// Merchant used when the user has not configured one.
pub const DEFAULT_MERCHANT_ID: &str = "SEN42";

/// Brand used when the user has not configured one.
pub const DEFAULT_BRAND_ID: &str = "110003eb-76c1-4b81-a96a-4cdf91bf70fb";

/// Source of the bearer token attached to every request.
///
/// Read again before each attempt so that a retry after a 401 picks up a token
/// refreshed in the meantime.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> Option<String>;
}

/// A token fixed for the lifetime of the client.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> Option<String> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.clone())
        }
    }
}

/// Settings the user has saved on the device.
#[derive(Debug, Clone, Default)]
pub struct ClientContext {
    pub merchant_id: Option<String>,
    pub brand_id: Option<String>,
    pub provider_ids: Vec<String>,
    pub calendar_ids: Vec<String>,
}

impl ClientContext {
    /// The account working hours are requested under.
    pub fn account_id(&self) -> Option<&str> {
        self.merchant_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn merchant_id_or_default(&self) -> &str {
        self.account_id().unwrap_or(DEFAULT_MERCHANT_ID)
    }

    pub fn brand_id_or_default(&self) -> &str {
        self.brand_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(DEFAULT_BRAND_ID)
    }
}
