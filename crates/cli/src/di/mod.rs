//! Composition root: wires ports to their concrete implementations.

use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};
use warden_dns_application::ports::{DecisionCache, FeedIngestor, QueryLogSink, ThreatTable};
use warden_dns_application::use_cases::{ClassifyQueryUseCase, PurgeStaleDataUseCase};
use warden_dns_application::DnsMetrics;
use warden_dns_domain::feed::default_catalog;
use warden_dns_domain::Config;
use warden_dns_infrastructure::cache::{MemoryDecisionCache, RedisDecisionCache};
use warden_dns_infrastructure::dns::{UdpForwarder, UpstreamForwarder};
use warden_dns_infrastructure::feeds::FeedIngestionPipeline;
use warden_dns_infrastructure::repositories::{PgQueryLogSink, PgThreatTable};

/// Everything the resolver daemon needs to serve queries.
pub struct ResolverContext {
    pub classifier: Arc<ClassifyQueryUseCase>,
    pub forwarder: Arc<dyn UpstreamForwarder>,
    pub query_log: Arc<dyn QueryLogSink>,
    pub metrics: Arc<DnsMetrics>,
}

/// Connect the shared decision cache, falling back to the in-process map
/// when the store is unreachable so the resolver keeps serving.
pub async fn build_decision_cache(config: &Config) -> Arc<dyn DecisionCache> {
    match RedisDecisionCache::connect(&config.cache.redis_url).await {
        Ok(cache) => {
            info!("Decision cache connected");
            Arc::new(cache)
        }
        Err(e) => {
            warn!(error = %e, "Response cache unreachable, using in-process decision cache");
            Arc::new(MemoryDecisionCache::new())
        }
    }
}

pub async fn build_resolver_context(
    config: &Config,
    pool: PgPool,
) -> anyhow::Result<ResolverContext> {
    let metrics = Arc::new(DnsMetrics::new()?);

    let cache = build_decision_cache(config).await;
    let table: Arc<dyn ThreatTable> = Arc::new(PgThreatTable::new(
        pool.clone(),
        config.database.lookup_timeout(),
    ));

    let classifier = Arc::new(
        ClassifyQueryUseCase::new(cache, table, Arc::clone(&metrics)).with_ttls(
            config.cache.blocked_ttl(),
            config.cache.allowed_ttl(),
        ),
    );

    let forwarder: Arc<dyn UpstreamForwarder> = Arc::new(UdpForwarder::new(
        config.dns.upstream_addrs()?,
        config.dns.upstream_timeout(),
    ));

    let query_log: Arc<dyn QueryLogSink> =
        Arc::new(PgQueryLogSink::new(pool, Arc::clone(&metrics)));

    Ok(ResolverContext {
        classifier,
        forwarder,
        query_log,
        metrics,
    })
}

/// Everything the feed-updater daemon needs.
pub struct UpdaterContext {
    pub ingestor: Arc<dyn FeedIngestor>,
    pub purge: Arc<PurgeStaleDataUseCase>,
}

pub fn build_updater_context(config: &Config, pool: PgPool) -> anyhow::Result<UpdaterContext> {
    let metrics = Arc::new(DnsMetrics::new()?);
    let table: Arc<dyn ThreatTable> = Arc::new(PgThreatTable::new(
        pool.clone(),
        config.database.lookup_timeout(),
    ));
    let query_log: Arc<dyn QueryLogSink> =
        Arc::new(PgQueryLogSink::new(pool, Arc::clone(&metrics)));

    let ingestor: Arc<dyn FeedIngestor> = Arc::new(FeedIngestionPipeline::new(
        Arc::clone(&table),
        default_catalog(),
    )?);

    let purge = Arc::new(PurgeStaleDataUseCase::new(table, query_log));

    Ok(UpdaterContext { ingestor, purge })
}
