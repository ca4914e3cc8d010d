use crate::metrics::DnsMetrics;
use crate::ports::{
    domain_key, ActiveThreat, DecisionCache, ThreatTable, DECISION_ALLOWED, DECISION_BLOCKED,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use warden_dns_domain::threat::BLOCK_CONFIDENCE_THRESHOLD;
use warden_dns_domain::validators::{normalize_domain, parent_suffixes};

/// Threat label recorded when a block verdict came straight from the
/// decision cache rather than a threat-table row.
pub const CACHE_HIT_LABEL: &str = "cached";

/// Outcome of classifying one queried name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Block { threat_type: Arc<str> },
    Allow,
}

impl Verdict {
    pub fn is_block(&self) -> bool {
        matches!(self, Verdict::Block { .. })
    }
}

/// Decides block/allow for a queried name: decision cache first, then the
/// threat table, escalating through parent suffixes.
///
/// The classifier holds read views only and never fails to the caller: any
/// store error degrades to "not a threat" and resolution continues.
pub struct ClassifyQueryUseCase {
    cache: Arc<dyn DecisionCache>,
    table: Arc<dyn ThreatTable>,
    metrics: Arc<DnsMetrics>,
    blocked_ttl: Duration,
    allowed_ttl: Duration,
    cache_fault_logged: AtomicBool,
}

impl ClassifyQueryUseCase {
    pub fn new(
        cache: Arc<dyn DecisionCache>,
        table: Arc<dyn ThreatTable>,
        metrics: Arc<DnsMetrics>,
    ) -> Self {
        Self {
            cache,
            table,
            metrics,
            blocked_ttl: Duration::from_secs(3_600),
            allowed_ttl: Duration::from_secs(1_800),
            cache_fault_logged: AtomicBool::new(false),
        }
    }

    pub fn with_ttls(mut self, blocked: Duration, allowed: Duration) -> Self {
        self.blocked_ttl = blocked;
        self.allowed_ttl = allowed;
        self
    }

    /// Classify `queried_name` (as it appeared on the wire; a trailing dot
    /// is fine).
    pub async fn classify(&self, queried_name: &str) -> Verdict {
        let domain = normalize_domain(queried_name);
        let key = domain_key(&domain);

        match self.cache.get(&key).await {
            Ok(Some(v)) if v == DECISION_BLOCKED => {
                self.metrics.cache_hits.inc();
                return Verdict::Block {
                    threat_type: Arc::from(CACHE_HIT_LABEL),
                };
            }
            Ok(Some(v)) if v == DECISION_ALLOWED => {
                self.metrics.cache_hits.inc();
                return Verdict::Allow;
            }
            Ok(_) => {
                self.metrics.cache_misses.inc();
            }
            Err(e) => {
                self.metrics.cache_misses.inc();
                // One warning per process; a down cache costs latency, not
                // correctness, and repeating it per query would flood logs.
                if !self.cache_fault_logged.swap(true, Ordering::Relaxed) {
                    warn!(error = %e, "Decision cache unreachable, continuing without it");
                } else {
                    debug!(error = %e, "Decision cache error");
                }
            }
        }

        // Exact name first, then each parent suffix: a single row for
        // doubleclick.net also blocks foo.bar.doubleclick.net. The verdict
        // is cached against the original queried name so repeats are O(1).
        if let Some(threat) = self.check_table(&domain).await {
            return self.block(&key, &domain, threat).await;
        }
        for suffix in parent_suffixes(&domain) {
            if let Some(threat) = self.check_table(suffix).await {
                debug!(domain = %domain, suffix = %suffix, "Blocked via parent suffix");
                return self.block(&key, &domain, threat).await;
            }
        }

        if let Err(e) = self.cache.set(&key, DECISION_ALLOWED, self.allowed_ttl).await {
            debug!(error = %e, domain = %domain, "Failed to cache allow verdict");
        }
        Verdict::Allow
    }

    async fn check_table(&self, name: &str) -> Option<ActiveThreat> {
        self.metrics.threat_table_queries.inc();
        match self.table.lookup_active(name).await {
            Ok(Some(threat)) if threat.confidence >= BLOCK_CONFIDENCE_THRESHOLD => Some(threat),
            Ok(_) => None,
            Err(e) => {
                self.metrics.threat_table_errors.inc();
                warn!(error = %e, name = %name, "Threat table lookup failed, treating as unknown");
                None
            }
        }
    }

    async fn block(&self, key: &str, domain: &str, threat: ActiveThreat) -> Verdict {
        self.metrics.observe_threat(threat.threat_type);
        if let Err(e) = self.cache.set(key, DECISION_BLOCKED, self.blocked_ttl).await {
            debug!(error = %e, domain = %domain, "Failed to cache block verdict");
        }
        Verdict::Block {
            threat_type: Arc::from(threat.threat_type.as_str()),
        }
    }
}
