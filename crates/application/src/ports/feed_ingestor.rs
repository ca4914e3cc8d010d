use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use warden_dns_domain::DomainError;

/// Counters for one ingestion cycle, logged by the sync job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub feeds_fetched: u64,
    /// Feeds skipped because their own update interval had not elapsed.
    pub feeds_skipped: u64,
    pub feeds_failed: u64,
    pub entries_emitted: u64,
    /// Lines dropped by parsers (comments, invalid domains, cap overflow).
    pub lines_skipped: u64,
    pub rows_upserted: u64,
}

/// Application-layer port for the feed ingestion pipeline.
///
/// One implementation owns the HTTP client, the feed descriptors (including
/// their `last_updated` state) and the parser dispatch; jobs drive it on a
/// timer.
#[async_trait]
pub trait FeedIngestor: Send + Sync {
    /// Fetch, parse and upsert every enabled feed that is due. A shutdown
    /// request aborts the cycle cleanly at the next feed boundary.
    async fn update_all(&self, shutdown: &CancellationToken)
        -> Result<CycleSummary, DomainError>;
}
