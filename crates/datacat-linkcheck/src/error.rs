//! Link check errors.

use thiserror::Error;

use datacat_cron::CronError;
use datacat_store::StoreError;

/// Failure to obtain a status code for a URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for ProbeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProbeError::Timeout(e.to_string())
        } else if e.is_connect() {
            ProbeError::Connect(e.to_string())
        } else {
            ProbeError::Request(e.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum LinkCheckError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cron(#[from] CronError),
}
