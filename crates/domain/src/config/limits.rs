use serde::{Deserialize, Serialize};

/// Rate-limiting knobs.
///
/// Parsed and validated at startup but not yet enforced; the limiter itself
/// is a planned addition and these exist so deployments can set them ahead
/// of time.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    #[serde(default = "default_rate_limit_per_second")]
    pub rate_limit_per_second: u32,

    #[serde(default = "default_max_queries_per_ip")]
    pub max_queries_per_ip: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            rate_limit_per_second: default_rate_limit_per_second(),
            max_queries_per_ip: default_max_queries_per_ip(),
        }
    }
}

fn default_rate_limit_per_second() -> u32 {
    100
}

fn default_max_queries_per_ip() -> u32 {
    1_000
}
