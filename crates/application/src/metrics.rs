use prometheus::{
    Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry,
};
use warden_dns_domain::{RecordType, ThreatType};

/// Resolver metrics registry.
///
/// Counters are updated inline from handler tasks; the registry itself is
/// handed to the external HTTP collaborator for scraping. No cross-metric
/// consistency is guaranteed.
pub struct DnsMetrics {
    registry: Registry,

    pub queries_total: IntCounter,
    pub blocked_total: IntCounter,
    pub allowed_total: IntCounter,
    pub errors_total: IntCounter,
    pub queries_by_type: IntCounterVec,
    pub threats_by_type: IntCounterVec,
    pub cache_hits: IntCounter,
    pub cache_misses: IntCounter,
    pub threat_table_queries: IntCounter,
    pub threat_table_errors: IntCounter,
    pub log_dropped_total: IntCounter,
    pub response_time_seconds: Histogram,
}

impl DnsMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let queries_total = IntCounter::new("queries_total", "Total DNS queries received")?;
        let blocked_total = IntCounter::new("blocked_total", "Queries answered with a block")?;
        let allowed_total = IntCounter::new("allowed_total", "Queries forwarded upstream")?;
        let errors_total = IntCounter::new("errors_total", "Queries that ended in SERVFAIL")?;
        let queries_by_type = IntCounterVec::new(
            Opts::new("queries_by_type", "Queries by record type"),
            &["qtype"],
        )?;
        let threats_by_type = IntCounterVec::new(
            Opts::new("threats_by_type", "Block verdicts by threat category"),
            &["threat_type"],
        )?;
        let cache_hits = IntCounter::new("cache_hits", "Decision cache hits")?;
        let cache_misses = IntCounter::new("cache_misses", "Decision cache misses")?;
        let threat_table_queries =
            IntCounter::new("threat_table_queries", "Threat table lookups")?;
        let threat_table_errors =
            IntCounter::new("threat_table_errors", "Threat table lookup failures")?;
        let log_dropped_total = IntCounter::new(
            "log_dropped_total",
            "Query log records dropped under overload",
        )?;
        let response_time_seconds = Histogram::with_opts(HistogramOpts::new(
            "response_time_seconds",
            "Total handler latency in seconds",
        ))?;

        registry.register(Box::new(queries_total.clone()))?;
        registry.register(Box::new(blocked_total.clone()))?;
        registry.register(Box::new(allowed_total.clone()))?;
        registry.register(Box::new(errors_total.clone()))?;
        registry.register(Box::new(queries_by_type.clone()))?;
        registry.register(Box::new(threats_by_type.clone()))?;
        registry.register(Box::new(cache_hits.clone()))?;
        registry.register(Box::new(cache_misses.clone()))?;
        registry.register(Box::new(threat_table_queries.clone()))?;
        registry.register(Box::new(threat_table_errors.clone()))?;
        registry.register(Box::new(log_dropped_total.clone()))?;
        registry.register(Box::new(response_time_seconds.clone()))?;

        Ok(Self {
            registry,
            queries_total,
            blocked_total,
            allowed_total,
            errors_total,
            queries_by_type,
            threats_by_type,
            cache_hits,
            cache_misses,
            threat_table_queries,
            threat_table_errors,
            log_dropped_total,
            response_time_seconds,
        })
    }

    /// The registry the scrape endpoint gathers from.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn observe_query_type(&self, qtype: RecordType) {
        self.queries_by_type
            .with_label_values(&[&qtype.to_string()])
            .inc();
    }

    pub fn observe_threat(&self, threat_type: ThreatType) {
        self.threats_by_type
            .with_label_values(&[threat_type.as_str()])
            .inc();
    }
}
