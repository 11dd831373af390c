//! Error types for working-hours-sync operations.

use availability_engine::AvailabilityError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No access token available")]
    MissingToken,

    #[error("Account ID not found")]
    MissingAccountId,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server kept answering with a non-success status after all retries.
    #[error("Request to {url} failed with status {status}")]
    Status { status: u16, url: String },

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error(transparent)]
    Availability(#[from] AvailabilityError),
}

pub type Result<T> = std::result::Result<T, SyncError>;
