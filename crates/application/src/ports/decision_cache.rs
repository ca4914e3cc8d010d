use async_trait::async_trait;
use std::time::Duration;
use warden_dns_domain::DomainError;

/// Cached verdict literals. Two opaque strings keep the wire format trivial
/// and let the cache be swapped for an in-process map in tests.
pub const DECISION_BLOCKED: &str = "blocked";
pub const DECISION_ALLOWED: &str = "allowed";

/// Cache key for a classification verdict.
pub fn domain_key(domain: &str) -> String {
    format!("domain:{domain}")
}

/// Application-layer port for the response cache.
///
/// The cache is advisory: a miss or an error never changes correctness,
/// only latency. Expired entries read as absent and are reclaimed lazily.
#[async_trait]
pub trait DecisionCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError>;

    async fn delete(&self, key: &str) -> Result<(), DomainError>;

    /// Store `value` only if `key` is absent. Returns whether the write
    /// happened.
    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, DomainError>;

    /// Increment the counter at `key`, creating it with `ttl` on first
    /// increment. Returns the new count.
    async fn increment_with_expiry(&self, key: &str, ttl: Duration) -> Result<i64, DomainError>;
}
