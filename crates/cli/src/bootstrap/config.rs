use tracing::info;
use warden_dns_domain::Config;

/// Load and validate configuration from the environment. Runs before the
/// tracing subscriber exists, so it stays quiet; failures surface through
/// the binary's error path and a non-zero exit.
pub fn load_config() -> anyhow::Result<Config> {
    Ok(Config::from_env()?)
}

/// Log the effective configuration once logging is up.
pub fn announce_config(config: &Config) {
    info!(
        dns_address = %config.server.dns_address,
        http_address = %config.server.http_address,
        upstreams = ?config.dns.upstreams,
        log_level = %config.logging.level,
        environment = ?config.logging.environment,
        "Configuration loaded"
    );
}
