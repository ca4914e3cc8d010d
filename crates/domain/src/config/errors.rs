use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid bind address: {0:?}")]
    InvalidAddress(String),

    #[error("invalid upstream resolver address: {0:?}")]
    InvalidUpstream(String),
}
