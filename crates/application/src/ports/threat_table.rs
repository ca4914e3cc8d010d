use async_trait::async_trait;
use std::time::Duration;
use warden_dns_domain::{DomainError, TableStats, ThreatEntry, ThreatType};

/// The classification-relevant part of a threat row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveThreat {
    pub threat_type: ThreatType,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
}

/// Application-layer port for the durable threat table.
///
/// The classifier holds a read view (`lookup_active`); the ingestion
/// pipeline holds the write side (`bulk_upsert`, `cleanup`). Failures are
/// non-fatal to callers on the query path — the classifier fails open.
#[async_trait]
pub trait ThreatTable: Send + Sync {
    /// The highest-confidence row for `domain` whose `updated_at` falls
    /// inside the freshness window, or `None`.
    ///
    /// The blocking threshold is the caller's concern; rows of any
    /// confidence are returned as long as they are fresh.
    async fn lookup_active(&self, domain: &str) -> Result<Option<ActiveThreat>, DomainError>;

    /// Upsert a batch of normalized entries, merging per-row by maximum
    /// confidence, latest `last_seen` and latest non-empty
    /// source/threat_type. Rows that cannot be written are logged and
    /// skipped; the batch as a whole does not fail. Returns the number of
    /// rows written.
    async fn bulk_upsert(&self, entries: &[ThreatEntry]) -> Result<u64, DomainError>;

    async fn stats(&self) -> Result<TableStats, DomainError>;

    /// Delete rows whose `updated_at` is older than `max_age`. Returns the
    /// number of rows deleted.
    async fn cleanup(&self, max_age: Duration) -> Result<u64, DomainError>;
}
