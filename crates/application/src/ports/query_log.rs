use async_trait::async_trait;
use std::time::Duration;
use warden_dns_domain::{DomainError, QueryRecord};

/// Application-layer port for the append-only query log.
#[async_trait]
pub trait QueryLogSink: Send + Sync {
    /// Hand a record to the sink. Must never block the DNS handler:
    /// implementations dispatch to a background writer and drop (counting
    /// the drop) when saturated.
    fn log(&self, record: QueryRecord);

    /// Delete records older than `max_age`. Returns the number deleted.
    async fn cleanup(&self, max_age: Duration) -> Result<u64, DomainError>;
}
