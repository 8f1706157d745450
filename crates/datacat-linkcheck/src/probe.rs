//! HTTP link probe.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, redirect};
use tracing::debug;
use url::Url;

use datacat_config::LinkCheckConfig;

use crate::error::{LinkCheckError, ProbeError};

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;

/// `Accept` header sent with every probe.
pub const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

const MAX_REDIRECTS: usize = 10;

/// Resolves a URL to the HTTP status it currently answers with.
#[async_trait]
pub trait LinkProbe: Send + Sync {
    async fn probe(&self, url: &Url) -> Result<u16, ProbeError>;
}

/// HTTP client settings for [`HttpProbe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    pub timeout: Duration,
    pub user_agent: String,
    pub accept_invalid_certs: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self::from(&LinkCheckConfig::default())
    }
}

impl From<&LinkCheckConfig> for ProbeConfig {
    fn from(config: &LinkCheckConfig) -> Self {
        Self {
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
            accept_invalid_certs: config.accept_invalid_certs,
        }
    }
}

/// [`LinkProbe`] sending a `HEAD` request and following redirects.
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new(config: &ProbeConfig) -> Result<Self, LinkCheckError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| LinkCheckError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl LinkProbe for HttpProbe {
    async fn probe(&self, url: &Url) -> Result<u16, ProbeError> {
        let response = self.client.head(url.clone()).send().await?;
        let status = response.status().as_u16();
        debug!(url = %url, final_url = %response.url(), status, "probe finished");
        Ok(status)
    }
}
