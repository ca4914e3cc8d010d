use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid DNS message: {0}")]
    InvalidDnsMessage(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Feed fetch failed: {0}")]
    FeedFetchError(String),

    #[error("Upstream query to {server} failed: {reason}")]
    UpstreamError { server: String, reason: String },

    #[error("All upstream resolvers failed")]
    UpstreamsExhausted,

    #[error("Query timeout")]
    QueryTimeout,
}
