use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::time::Duration;
use warden_dns_application::ports::DecisionCache;
use warden_dns_domain::DomainError;

fn cache_err(e: redis::RedisError) -> DomainError {
    DomainError::CacheError(e.to_string())
}

/// Redis-backed decision cache.
///
/// `ConnectionManager` reconnects on its own after transient failures, so a
/// Redis hiccup costs a few errored calls (which the classifier absorbs)
/// rather than a restart.
pub struct RedisDecisionCache {
    conn: ConnectionManager,
}

impl RedisDecisionCache {
    /// Connect to the configured Redis instance. Fails fast so the
    /// composition root can fall back to the in-process cache.
    pub async fn connect(url: &str) -> Result<Self, DomainError> {
        let client = redis::Client::open(url).map_err(cache_err)?;
        let conn = ConnectionManager::new(client).await.map_err(cache_err)?;
        Ok(Self { conn })
    }

    fn ttl_millis(ttl: Duration) -> u64 {
        // PX 0 is an error in Redis; a zero TTL means "already expired".
        (ttl.as_millis() as u64).max(1)
    }
}

#[async_trait]
impl DecisionCache for RedisDecisionCache {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(cache_err)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("PX")
            .arg(Self::ttl_millis(ttl))
            .query_async(&mut conn)
            .await
            .map_err(cache_err)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        let mut conn = self.conn.clone();
        let _: i64 = redis::cmd("DEL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(cache_err)?;
        Ok(())
    }

    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, DomainError> {
        let mut conn = self.conn.clone();
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("PX")
            .arg(Self::ttl_millis(ttl))
            .query_async(&mut conn)
            .await
            .map_err(cache_err)?;
        Ok(reply.is_some())
    }

    async fn increment_with_expiry(&self, key: &str, ttl: Duration) -> Result<i64, DomainError> {
        let mut conn = self.conn.clone();
        let count: i64 = redis::cmd("INCR")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(cache_err)?;
        if count == 1 {
            let _: i64 = redis::cmd("PEXPIRE")
                .arg(key)
                .arg(Self::ttl_millis(ttl))
                .query_async(&mut conn)
                .await
                .map_err(cache_err)?;
        }
        Ok(count)
    }
}
