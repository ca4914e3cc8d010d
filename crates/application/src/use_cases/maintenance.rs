use crate::ports::{QueryLogSink, ThreatTable};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use warden_dns_domain::DomainError;

#[derive(Debug, Clone, Copy, Default)]
pub struct PurgeReport {
    pub threat_rows_deleted: u64,
    pub log_rows_deleted: u64,
}

/// Deletes threat rows and query-log records older than the retention
/// window. Invoked hourly by the retention job.
pub struct PurgeStaleDataUseCase {
    table: Arc<dyn ThreatTable>,
    query_log: Arc<dyn QueryLogSink>,
}

impl PurgeStaleDataUseCase {
    pub fn new(table: Arc<dyn ThreatTable>, query_log: Arc<dyn QueryLogSink>) -> Self {
        Self { table, query_log }
    }

    pub async fn execute(&self, max_age: Duration) -> Result<PurgeReport, DomainError> {
        let threat_rows_deleted = self.table.cleanup(max_age).await?;

        // Log pruning is secondary; its failure should not mask a
        // successful threat-table sweep.
        let log_rows_deleted = match self.query_log.cleanup(max_age).await {
            Ok(n) => n,
            Err(e) => {
                warn!(error = %e, "Query log cleanup failed");
                0
            }
        };

        Ok(PurgeReport {
            threat_rows_deleted,
            log_rows_deleted,
        })
    }
}
