use super::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Upstream resolution configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DnsConfig {
    /// Upstream resolvers tried in failover order.
    #[serde(default = "default_upstreams")]
    pub upstreams: Vec<String>,

    /// Per-attempt timeout for one upstream UDP exchange, in milliseconds.
    #[serde(default = "default_upstream_timeout_ms")]
    pub upstream_timeout_ms: u64,

    /// How long shutdown waits for in-flight handlers before abandoning
    /// them, in seconds.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl DnsConfig {
    pub fn upstream_addrs(&self) -> Result<Vec<SocketAddr>, ConfigError> {
        self.upstreams
            .iter()
            .map(|s| {
                s.parse()
                    .map_err(|_| ConfigError::InvalidUpstream(s.clone()))
            })
            .collect()
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            upstreams: default_upstreams(),
            upstream_timeout_ms: default_upstream_timeout_ms(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

fn default_upstreams() -> Vec<String> {
    vec!["1.1.1.1:53".to_string(), "8.8.8.8:53".to_string()]
}

fn default_upstream_timeout_ms() -> u64 {
    5_000
}

fn default_shutdown_timeout_secs() -> u64 {
    30
}
