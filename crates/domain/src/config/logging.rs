use serde::{Deserialize, Serialize};

/// Deployment environment. Production switches log output to structured
/// JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level: one of `debug`, `info`, `warn`, `error`, `fatal`.
    /// `fatal` is accepted for compatibility and treated as `error`.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_environment")]
    pub environment: Environment,
}

impl LoggingConfig {
    /// The level string as understood by the tracing filter.
    pub fn filter_level(&self) -> &str {
        if self.level == "fatal" {
            "error"
        } else {
            &self.level
        }
    }

    pub fn is_valid_level(level: &str) -> bool {
        matches!(level, "debug" | "info" | "warn" | "error" | "fatal")
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            environment: default_environment(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_environment() -> Environment {
    Environment::Development
}
