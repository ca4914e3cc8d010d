use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Response-cache backing store connection string.
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// TTL for cached block verdicts, in seconds. Threat intel rarely flips
    /// back, so blocked answers are kept longer.
    #[serde(default = "default_blocked_ttl_secs")]
    pub blocked_ttl_secs: u64,

    /// TTL for cached allow verdicts, in seconds. Shorter, so newly
    /// ingested threat entries take effect within half an hour.
    #[serde(default = "default_allowed_ttl_secs")]
    pub allowed_ttl_secs: u64,
}

impl CacheConfig {
    pub fn blocked_ttl(&self) -> Duration {
        Duration::from_secs(self.blocked_ttl_secs)
    }

    pub fn allowed_ttl(&self) -> Duration {
        Duration::from_secs(self.allowed_ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: default_redis_url(),
            blocked_ttl_secs: default_blocked_ttl_secs(),
            allowed_ttl_secs: default_allowed_ttl_secs(),
        }
    }
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_blocked_ttl_secs() -> u64 {
    3_600
}

fn default_allowed_ttl_secs() -> u64 {
    1_800
}
