use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use warden_dns_application::ports::{
    ActiveThreat, CycleSummary, FeedIngestor, QueryLogSink, ThreatTable,
};
use warden_dns_domain::{DomainError, QueryRecord, TableStats, ThreatEntry, ThreatType};

/// Counts ingestion cycles and reports a fixed summary.
#[derive(Default)]
pub struct MockIngestor {
    cycles: AtomicU64,
}

impl MockIngestor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycles.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedIngestor for MockIngestor {
    async fn update_all(
        &self,
        _shutdown: &CancellationToken,
    ) -> Result<CycleSummary, DomainError> {
        self.cycles.fetch_add(1, Ordering::SeqCst);
        Ok(CycleSummary {
            feeds_fetched: 1,
            entries_emitted: 2,
            rows_upserted: 2,
            ..CycleSummary::default()
        })
    }
}

/// Threat table with injectable row ages, for retention tests.
#[derive(Default)]
pub struct MockThreatTable {
    rows: Mutex<HashMap<String, (ThreatType, f64, DateTime<Utc>)>>,
}

impl MockThreatTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_aged(&self, domain: &str, age_days: i64) {
        self.rows.lock().unwrap().insert(
            domain.to_string(),
            (
                ThreatType::Malware,
                0.9,
                Utc::now() - ChronoDuration::days(age_days),
            ),
        );
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl ThreatTable for MockThreatTable {
    async fn lookup_active(&self, domain: &str) -> Result<Option<ActiveThreat>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(domain)
            .map(|(threat_type, confidence, _)| ActiveThreat {
                threat_type: *threat_type,
                confidence: *confidence,
            }))
    }

    async fn bulk_upsert(&self, entries: &[ThreatEntry]) -> Result<u64, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        for entry in entries {
            rows.insert(
                entry.domain.to_string(),
                (entry.threat_type, entry.confidence, Utc::now()),
            );
        }
        Ok(entries.len() as u64)
    }

    async fn stats(&self) -> Result<TableStats, DomainError> {
        Ok(TableStats {
            total: self.rows.lock().unwrap().len() as u64,
            ..TableStats::default()
        })
    }

    async fn cleanup(&self, max_age: Duration) -> Result<u64, DomainError> {
        let cutoff = Utc::now()
            - ChronoDuration::from_std(max_age).unwrap_or_else(|_| ChronoDuration::days(30));
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|_, (_, _, updated_at)| *updated_at >= cutoff);
        Ok((before - rows.len()) as u64)
    }
}

#[derive(Default)]
pub struct MockQueryLogSink {
    cleanups: AtomicU64,
}

impl MockQueryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cleanup_count(&self) -> u64 {
        self.cleanups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueryLogSink for MockQueryLogSink {
    fn log(&self, _record: QueryRecord) {}

    async fn cleanup(&self, _max_age: Duration) -> Result<u64, DomainError> {
        self.cleanups.fetch_add(1, Ordering::SeqCst);
        Ok(3)
    }
}
