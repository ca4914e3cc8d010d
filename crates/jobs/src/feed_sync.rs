use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use warden_dns_application::ports::FeedIngestor;

/// Drives the feed ingestion pipeline: one cycle at startup, then one every
/// `interval_secs`. Each feed additionally gates itself on its own
/// `update_interval`, so the loop cadence only sets how often due-ness is
/// checked.
pub struct FeedSyncJob {
    ingestor: Arc<dyn FeedIngestor>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl FeedSyncJob {
    pub fn new(ingestor: Arc<dyn FeedIngestor>) -> Self {
        Self {
            ingestor,
            interval_secs: 300,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(interval_secs = self.interval_secs, "Starting feed sync job");

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));

            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("FeedSyncJob: shutting down");
                        break;
                    }
                    // The first tick completes immediately, giving the
                    // startup run the scheduling requires.
                    _ = interval.tick() => {
                        match self.ingestor.update_all(&self.shutdown).await {
                            Ok(summary) => info!(
                                fetched = summary.feeds_fetched,
                                skipped = summary.feeds_skipped,
                                failed = summary.feeds_failed,
                                entries = summary.entries_emitted,
                                lines_skipped = summary.lines_skipped,
                                upserted = summary.rows_upserted,
                                "FeedSyncJob: cycle complete"
                            ),
                            Err(e) => error!(error = %e, "FeedSyncJob: cycle failed"),
                        }
                    }
                }
            }
        });
    }
}
