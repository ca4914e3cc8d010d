use sqlx::PgPool;
use tracing::{info, warn};
use warden_dns_domain::config::DatabaseConfig;
use warden_dns_infrastructure::database;

/// Build the (lazy) Postgres pool. No connection is made here, so a down
/// database never prevents a daemon from starting.
pub fn create_pool(config: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let pool = database::create_lazy_pool(config)?;
    info!(
        max_connections = config.max_connections,
        "Threat store pool configured"
    );
    Ok(pool)
}

/// Apply pending migrations, tolerating an unreachable store. The updater
/// calls this at startup; ingestion cycles simply fail and retry until the
/// store is back.
pub async fn try_migrations(pool: &PgPool) {
    match database::run_migrations(pool).await {
        Ok(()) => info!("Database migrations applied"),
        Err(e) => warn!(error = %e, "Migrations not applied, store unreachable"),
    }
}
