//! # Warden Feed Updater
//!
//! The ingestion daemon: polls the configured threat and ad-block feeds,
//! loads normalized entries into the threat table, and sweeps stale rows
//! on the retention cadence. Configured entirely through the environment.

use tracing::info;
use warden_dns_cli::{bootstrap, di};
use warden_dns_jobs::{FeedSyncJob, JobRunner, RetentionJob};

/// Feed due-ness is re-checked every five minutes; retention sweeps hourly.
const SYNC_INTERVAL_SECS: u64 = 300;
const CLEANUP_INTERVAL_SECS: u64 = 3_600;
const RETENTION_DAYS: u32 = 30;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = bootstrap::load_config()?;
    bootstrap::init_logging(&config.logging);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Warden feed updater starting"
    );
    bootstrap::announce_config(&config);

    let pool = bootstrap::create_pool(&config.database)?;
    bootstrap::try_migrations(&pool).await;

    let context = di::build_updater_context(&config, pool)?;

    let shutdown = tokio_util::sync::CancellationToken::new();
    JobRunner::new()
        .with_feed_sync(
            FeedSyncJob::new(context.ingestor)
                .with_interval(SYNC_INTERVAL_SECS)
                .with_cancellation(shutdown.clone()),
        )
        .with_retention(
            RetentionJob::new(context.purge, RETENTION_DAYS)
                .with_interval(CLEANUP_INTERVAL_SECS)
                .with_cancellation(shutdown.clone()),
        )
        .start()
        .await;

    bootstrap::shutdown_signal().await;
    info!("Shutdown requested, stopping jobs");
    shutdown.cancel();
    info!("Shutdown complete");

    Ok(())
}
