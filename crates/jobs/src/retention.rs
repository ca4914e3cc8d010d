use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use warden_dns_application::use_cases::PurgeStaleDataUseCase;

const SECONDS_PER_DAY: u64 = 86_400;

/// Hourly sweep deleting threat rows and query-log records older than the
/// retention window.
pub struct RetentionJob {
    purge: Arc<PurgeStaleDataUseCase>,
    retention_days: u32,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl RetentionJob {
    pub fn new(purge: Arc<PurgeStaleDataUseCase>, retention_days: u32) -> Self {
        Self {
            purge,
            retention_days,
            interval_secs: 3_600,
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
        info!(
            retention_days = self.retention_days,
            interval_secs = self.interval_secs,
            "Starting retention job"
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            let max_age =
                Duration::from_secs(u64::from(self.retention_days) * SECONDS_PER_DAY);

            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("RetentionJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        match self.purge.execute(max_age).await {
                            Ok(report) => info!(
                                threat_rows = report.threat_rows_deleted,
                                log_rows = report.log_rows_deleted,
                                "RetentionJob: sweep complete"
                            ),
                            Err(e) => error!(error = %e, "RetentionJob: sweep failed"),
                        }
                    }
                }
            }
        });
    }
}
