use crate::{FeedSyncJob, RetentionJob};
use std::sync::Arc;
use tracing::info;

/// Central orchestrator for the updater daemon's background jobs.
///
/// Register jobs with the builder methods, then call `.start()` once.
pub struct JobRunner {
    feed_sync: Option<FeedSyncJob>,
    retention: Option<RetentionJob>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            feed_sync: None,
            retention: None,
        }
    }

    pub fn with_feed_sync(mut self, job: FeedSyncJob) -> Self {
        self.feed_sync = Some(job);
        self
    }

    pub fn with_retention(mut self, job: RetentionJob) -> Self {
        self.retention = Some(job);
        self
    }

    /// Start all registered background jobs.
    pub async fn start(self) {
        info!("Starting background job runner");

        if let Some(job) = self.feed_sync {
            Arc::new(job).start().await;
        }

        if let Some(job) = self.retention {
            Arc::new(job).start().await;
        }

        info!("All background jobs started");
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
