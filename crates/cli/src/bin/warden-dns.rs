//! # Warden DNS Resolver
//!
//! The filtering resolver daemon: answers DNS over UDP, blocking names the
//! threat table marks as malicious and forwarding the rest upstream.
//! Configured entirely through the environment.

use std::sync::Arc;
use tracing::info;
use warden_dns_cli::{bootstrap, di};
use warden_dns_infrastructure::dns::DnsServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = bootstrap::load_config()?;
    bootstrap::init_logging(&config.logging);

    info!(version = env!("CARGO_PKG_VERSION"), "Warden DNS starting");
    bootstrap::announce_config(&config);

    let pool = bootstrap::create_pool(&config.database)?;
    let context = di::build_resolver_context(&config, pool).await?;

    // Bind failure is the one fatal runtime error; everything else
    // degrades and the resolver keeps answering.
    let server = DnsServer::bind(
        config.server.dns_socket_addr()?,
        context.classifier,
        context.forwarder,
        context.query_log,
        context.metrics,
    )
    .await?;

    tokio::spawn(Arc::clone(&server).run());
    info!("Resolver ready");

    bootstrap::shutdown_signal().await;
    info!("Shutdown requested, draining in-flight queries");
    server.shutdown(config.dns.shutdown_timeout()).await;
    info!("Shutdown complete");

    Ok(())
}
