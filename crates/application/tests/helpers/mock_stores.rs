//! In-memory stand-ins for the resolver's ports. The threat table applies
//! the same freshness rule as the durable store so boundary behavior can be
//! exercised without a database.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use warden_dns_application::ports::{ActiveThreat, DecisionCache, QueryLogSink, ThreatTable};
use warden_dns_domain::threat::freshness_cutoff;
use warden_dns_domain::{DomainError, QueryRecord, TableStats, ThreatEntry, ThreatType};

// ---------------------------------------------------------------------------
// Threat table
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct ThreatRow {
    threat_type: ThreatType,
    confidence: f64,
    updated_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct MockThreatTable {
    rows: Mutex<HashMap<String, ThreatRow>>,
    failing: AtomicBool,
    lookups: AtomicU64,
}

impl MockThreatTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, domain: &str, threat_type: ThreatType, confidence: f64) {
        self.insert_at(domain, threat_type, confidence, Utc::now());
    }

    pub fn insert_aged(
        &self,
        domain: &str,
        threat_type: ThreatType,
        confidence: f64,
        age_days: i64,
    ) {
        self.insert_at(
            domain,
            threat_type,
            confidence,
            Utc::now() - ChronoDuration::days(age_days),
        );
    }

    pub fn insert_at(
        &self,
        domain: &str,
        threat_type: ThreatType,
        confidence: f64,
        updated_at: DateTime<Utc>,
    ) {
        self.rows.lock().unwrap().insert(
            domain.to_string(),
            ThreatRow {
                threat_type,
                confidence,
                updated_at,
            },
        );
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn lookup_count(&self) -> u64 {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn confidence_of(&self, domain: &str) -> Option<f64> {
        self.rows.lock().unwrap().get(domain).map(|r| r.confidence)
    }
}

#[async_trait]
impl ThreatTable for MockThreatTable {
    async fn lookup_active(&self, domain: &str) -> Result<Option<ActiveThreat>, DomainError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("mock failure".into()));
        }
        let cutoff = freshness_cutoff(Utc::now());
        let rows = self.rows.lock().unwrap();
        Ok(rows.get(domain).and_then(|row| {
            (row.updated_at > cutoff).then_some(ActiveThreat {
                threat_type: row.threat_type,
                confidence: row.confidence,
            })
        }))
    }

    async fn bulk_upsert(&self, entries: &[ThreatEntry]) -> Result<u64, DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("mock failure".into()));
        }
        let mut rows = self.rows.lock().unwrap();
        let mut written = 0u64;
        for entry in entries {
            written += 1;
            rows.entry(entry.domain.to_string())
                .and_modify(|row| {
                    row.confidence = row.confidence.max(entry.confidence);
                    row.threat_type = entry.threat_type;
                    row.updated_at = Utc::now();
                })
                .or_insert(ThreatRow {
                    threat_type: entry.threat_type,
                    confidence: entry.confidence,
                    updated_at: Utc::now(),
                });
        }
        Ok(written)
    }

    async fn stats(&self) -> Result<TableStats, DomainError> {
        let rows = self.rows.lock().unwrap();
        let mut stats = TableStats {
            total: rows.len() as u64,
            ..TableStats::default()
        };
        for row in rows.values() {
            *stats.by_type.entry(row.threat_type).or_insert(0) += 1;
        }
        Ok(stats)
    }

    async fn cleanup(&self, max_age: Duration) -> Result<u64, DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("mock failure".into()));
        }
        let cutoff = Utc::now()
            - ChronoDuration::from_std(max_age).unwrap_or_else(|_| ChronoDuration::days(30));
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|_, row| row.updated_at >= cutoff);
        Ok((before - rows.len()) as u64)
    }
}

// ---------------------------------------------------------------------------
// Decision cache
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockDecisionCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
    failing: AtomicBool,
}

impl MockDecisionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Current unexpired value for `key`, without counting as a hit.
    pub fn peek(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap();
        entries.get(key).and_then(|(value, expires_at)| {
            (Instant::now() < *expires_at).then(|| value.clone())
        })
    }

    pub fn seed(&self, key: &str, value: &str, ttl: Duration) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::CacheError("mock failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl DecisionCache for MockDecisionCache {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.check()?;
        Ok(self.peek(key))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        self.check()?;
        self.seed(key, value, ttl);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        self.check()?;
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, DomainError> {
        self.check()?;
        if self.peek(key).is_some() {
            return Ok(false);
        }
        self.seed(key, value, ttl);
        Ok(true)
    }

    async fn increment_with_expiry(&self, key: &str, ttl: Duration) -> Result<i64, DomainError> {
        self.check()?;
        let current: i64 = self.peek(key).and_then(|v| v.parse().ok()).unwrap_or(0);
        let next = current + 1;
        if current == 0 {
            self.seed(key, &next.to_string(), ttl);
        } else {
            let mut entries = self.entries.lock().unwrap();
            if let Some((value, _)) = entries.get_mut(key) {
                *value = next.to_string();
            }
        }
        Ok(next)
    }
}

// ---------------------------------------------------------------------------
// Query log
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockQueryLogSink {
    records: Mutex<Vec<QueryRecord>>,
    cleanups: AtomicU64,
}

impl MockQueryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<QueryRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn cleanup_count(&self) -> u64 {
        self.cleanups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueryLogSink for MockQueryLogSink {
    fn log(&self, record: QueryRecord) {
        self.records.lock().unwrap().push(record);
    }

    async fn cleanup(&self, _max_age: Duration) -> Result<u64, DomainError> {
        self.cleanups.fetch_add(1, Ordering::SeqCst);
        Ok(0)
    }
}
