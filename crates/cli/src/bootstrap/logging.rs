use tracing_subscriber::EnvFilter;
use warden_dns_domain::config::LoggingConfig;
use warden_dns_domain::Environment;

pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_new(config.filter_level())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match config.environment {
        Environment::Production => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .json()
                .init();
        }
        Environment::Development => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
