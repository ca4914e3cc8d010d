use super::cache::CacheConfig;
use super::database::DatabaseConfig;
use super::dns::DnsConfig;
use super::errors::ConfigError;
use super::limits::LimitsConfig;
use super::logging::{Environment, LoggingConfig};
use super::server::ServerConfig;

/// Complete resolver configuration, assembled from environment variables.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub dns: DnsConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub limits: LimitsConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an injectable lookup, so tests never
    /// touch process-global env state.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(v) = lookup("DNS_ADDRESS") {
            config.server.dns_address = v;
        }
        if let Some(v) = lookup("HTTP_ADDRESS") {
            config.server.http_address = v;
        }
        if let Some(v) = lookup("DATABASE_URL") {
            config.database.url = v;
        }
        if let Some(v) = lookup("REDIS_URL") {
            config.cache.redis_url = v;
        }

        let mut upstreams = Vec::new();
        if let Some(v) = lookup("UPSTREAM_DNS_1") {
            upstreams.push(v);
        }
        if let Some(v) = lookup("UPSTREAM_DNS_2") {
            upstreams.push(v);
        }
        if !upstreams.is_empty() {
            config.dns.upstreams = upstreams;
        }

        if let Some(v) = lookup("RATE_LIMIT_PER_SECOND") {
            config.limits.rate_limit_per_second = parse_u32("RATE_LIMIT_PER_SECOND", &v)?;
        }
        if let Some(v) = lookup("MAX_QUERIES_PER_IP") {
            config.limits.max_queries_per_ip = parse_u32("MAX_QUERIES_PER_IP", &v)?;
        }

        if let Some(v) = lookup("LOG_LEVEL") {
            config.logging.level = v;
        }
        if let Some(v) = lookup("APP_ENV") {
            config.logging.environment = if v.eq_ignore_ascii_case("production") {
                Environment::Production
            } else {
                Environment::Development
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the daemons cannot run with. Called once at
    /// startup; failures are fatal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.dns_socket_addr()?;
        self.server.http_socket_addr()?;
        let upstreams = self.dns.upstream_addrs()?;
        if upstreams.is_empty() {
            return Err(ConfigError::InvalidUpstream("(none configured)".into()));
        }
        if !LoggingConfig::is_valid_level(&self.logging.level) {
            return Err(ConfigError::InvalidValue {
                key: "LOG_LEVEL",
                value: self.logging.level.clone(),
                reason: "expected one of debug|info|warn|error|fatal".into(),
            });
        }
        Ok(())
    }
}

fn parse_u32(key: &'static str, value: &str) -> Result<u32, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: "expected an unsigned integer".into(),
    })
}
