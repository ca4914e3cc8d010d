use super::parsers::parse_feed;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use warden_dns_application::ports::{CycleSummary, FeedIngestor, ThreatTable};
use warden_dns_domain::{DomainError, FeedDescriptor, ThreatEntry};

const USER_AGENT: &str = concat!("warden-dns/", env!("CARGO_PKG_VERSION"), " (feed-sync)");

/// Fetches, parses and loads the configured feeds.
///
/// Owns the long-lived HTTP client and the feed descriptors (whose
/// `last_updated` gates per-feed cadence). Feeds are processed one at a
/// time in stable catalog order, so a capped feed resumes deterministically
/// next cycle.
pub struct FeedIngestionPipeline {
    table: Arc<dyn ThreatTable>,
    client: reqwest::Client,
    feeds: Mutex<Vec<FeedDescriptor>>,
}

impl FeedIngestionPipeline {
    pub fn new(
        table: Arc<dyn ThreatTable>,
        feeds: Vec<FeedDescriptor>,
    ) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DomainError::FeedFetchError(e.to_string()))?;

        info!(
            feeds = feeds.len(),
            enabled = feeds.iter().filter(|f| f.enabled).count(),
            "Feed ingestion pipeline ready"
        );

        Ok(Self {
            table,
            client,
            feeds: Mutex::new(feeds),
        })
    }

    async fn fetch(&self, feed: &FeedDescriptor) -> Result<Bytes, DomainError> {
        let response = self
            .client
            .get(&feed.source_url)
            .timeout(feed.format.fetch_timeout())
            .send()
            .await
            .map_err(|e| DomainError::FeedFetchError(format!("{}: {e}", feed.name)))?;

        if !response.status().is_success() {
            return Err(DomainError::FeedFetchError(format!(
                "HTTP {} for {}",
                response.status().as_u16(),
                feed.name
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| DomainError::FeedFetchError(format!("{}: {e}", feed.name)))
    }
}

/// Collapse repeat sightings of a domain within one feed body before the
/// write, keeping the maximum confidence.
fn merge_batch(entries: Vec<ThreatEntry>) -> Vec<ThreatEntry> {
    let mut merged: HashMap<Arc<str>, ThreatEntry> = HashMap::with_capacity(entries.len());
    for entry in entries {
        match merged.get_mut(&entry.domain) {
            Some(existing) => existing.merge_from(&entry),
            None => {
                merged.insert(Arc::clone(&entry.domain), entry);
            }
        }
    }
    merged.into_values().collect()
}

#[async_trait]
impl FeedIngestor for FeedIngestionPipeline {
    async fn update_all(
        &self,
        shutdown: &CancellationToken,
    ) -> Result<CycleSummary, DomainError> {
        let mut summary = CycleSummary::default();
        let mut feeds = self.feeds.lock().await;

        for feed in feeds.iter_mut() {
            if shutdown.is_cancelled() {
                info!("Ingestion cycle aborted by shutdown request");
                break;
            }
            if !feed.enabled {
                continue;
            }
            let now = Utc::now();
            if !feed.is_due(now) {
                summary.feeds_skipped += 1;
                continue;
            }

            let body = match self.fetch(feed).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(feed = %feed.name, error = %e, "Feed fetch failed, skipping this cycle");
                    summary.feeds_failed += 1;
                    continue;
                }
            };
            feed.last_updated = Some(now);
            summary.feeds_fetched += 1;

            let outcome = parse_feed(feed.format, &body, &feed.name, now);
            summary.lines_skipped += outcome.skipped;
            summary.entries_emitted += outcome.entries.len() as u64;
            debug!(
                feed = %feed.name,
                entries = outcome.entries.len(),
                skipped = outcome.skipped,
                "Feed parsed"
            );
            if outcome.entries.is_empty() {
                continue;
            }

            let batch = merge_batch(outcome.entries);
            match self.table.bulk_upsert(&batch).await {
                Ok(written) => summary.rows_upserted += written,
                Err(e) => {
                    warn!(feed = %feed.name, error = %e, "Bulk upsert failed");
                }
            }
        }

        Ok(summary)
    }
}
