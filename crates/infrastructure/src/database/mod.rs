use sqlx::migrate::Migrator;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::path::Path;
use std::str::FromStr;
use warden_dns_domain::config::DatabaseConfig;

/// Build the Postgres pool without connecting.
///
/// Connections are established on first use, so a down database delays the
/// first threat-table call instead of preventing the resolver from
/// starting. Query-path callers bound each call with their own deadline.
pub fn create_lazy_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let options = PgConnectOptions::from_str(&config.url)?;
    Ok(PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(1)
        .acquire_timeout(config.lookup_timeout())
        .connect_lazy_with(options))
}

/// Run pending migrations from `./migrations`. Invoked by the feed updater
/// at startup; the resolver only reads and tolerates an unmigrated store
/// the same way it tolerates a down one.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    let migrator = Migrator::new(Path::new("./migrations")).await?;
    migrator.run(pool).await?;
    Ok(())
}
