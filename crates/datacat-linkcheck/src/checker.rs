//! Link check job.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, error, info, warn};
use url::Url;

use datacat_store::{Link, LinkCheck, LinkStore};

use crate::error::{LinkCheckError, ProbeError};
use crate::probe::LinkProbe;

#[cfg(test)]
#[path = "checker_tests.rs"]
mod tests;

/// Whether a status code counts as a reachable link (2xx and 3xx).
pub fn is_link_active(status: u16) -> bool {
    (200..400).contains(&status)
}

/// Counters of one [`LinkChecker::check_all`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSummary {
    /// Active links visited, including those without a URL.
    pub processed: usize,
    /// Links whose outcome was recorded.
    pub success: usize,
    /// Links with an unusable URL or a failed store write.
    pub failed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CheckSummary {
    pub fn duration(&self) -> TimeDelta {
        self.finished_at - self.started_at
    }
}

enum Outcome {
    Skipped,
    Recorded,
    Failed,
}

/// Probes every active link and persists its status.
pub struct LinkChecker {
    links: Arc<dyn LinkStore>,
    probe: Arc<dyn LinkProbe>,
}

impl LinkChecker {
    pub fn new(links: Arc<dyn LinkStore>, probe: Arc<dyn LinkProbe>) -> Self {
        Self { links, probe }
    }

    /// Check all active links once.
    ///
    /// A failed probe makes the link inactive, so it is not visited by later
    /// runs until it is re-enabled.
    pub async fn check_all(&self) -> Result<CheckSummary, LinkCheckError> {
        let started_at = Utc::now();
        let links = self.links.active_links().await?;
        info!("Starting link check for {} active links", links.len());

        let mut summary = CheckSummary {
            processed: 0,
            success: 0,
            failed: 0,
            started_at,
            finished_at: started_at,
        };

        for link in &links {
            summary.processed += 1;
            match self.check_link(link).await {
                Outcome::Skipped => {}
                Outcome::Recorded => summary.success += 1,
                Outcome::Failed => summary.failed += 1,
            }
        }

        summary.finished_at = Utc::now();
        info!(
            processed = summary.processed,
            success = summary.success,
            failed = summary.failed,
            duration_ms = summary.duration().num_milliseconds(),
            "Link check finished"
        );
        Ok(summary)
    }

    async fn check_link(&self, link: &Link) -> Outcome {
        let Some(raw) = link.link.as_deref().map(str::trim).filter(|u| !u.is_empty()) else {
            debug!(id = link.id, name = %link.link_name, "link has no URL, skipping");
            return Outcome::Skipped;
        };

        let url = match parse_url(raw) {
            Ok(url) => url,
            Err(e) => {
                warn!(id = link.id, "{}", e);
                return Outcome::Failed;
            }
        };

        let status_code = match self.probe.probe(&url).await {
            Ok(status) => Some(status),
            Err(e) => {
                warn!(id = link.id, url = %url, "Link check request failed: {}", e);
                None
            }
        };
        let is_active = status_code.is_some_and(is_link_active);

        let check = LinkCheck {
            status_code,
            is_active,
            checked_at: Utc::now(),
        };
        match self.links.record_check(link.id, check).await {
            Ok(()) => {
                debug!(id = link.id, url = %url, ?status_code, is_active, "link checked");
                Outcome::Recorded
            }
            Err(e) => {
                error!(id = link.id, "Failed to record link check: {}", e);
                Outcome::Failed
            }
        }
    }
}

/// Parse a URL, requiring both a scheme and a host.
fn parse_url(raw: &str) -> Result<Url, ProbeError> {
    match Url::parse(raw) {
        Ok(url) if url.host_str().is_some_and(|h| !h.is_empty()) => Ok(url),
        _ => Err(ProbeError::InvalidUrl(raw.to_string())),
    }
}
