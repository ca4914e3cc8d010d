use async_trait::async_trait;
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use std::time::{Duration, Instant};
use warden_dns_application::ports::DecisionCache;
use warden_dns_domain::DomainError;

struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn new(value: String, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    /// An entry at its expiry instant is already invisible.
    fn is_live(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// In-process decision cache.
///
/// The stand-in used when the shared store is unreachable, and the cache of
/// choice for tests and single-node deployments. Expired entries read as
/// absent and are reclaimed lazily on access.
#[derive(Default)]
pub struct MemoryDecisionCache {
    inner: DashMap<String, Entry, FxBuildHasher>,
}

impl MemoryDecisionCache {
    pub fn new() -> Self {
        Self {
            inner: DashMap::with_hasher(FxBuildHasher),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl DecisionCache for MemoryDecisionCache {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        if let Some(entry) = self.inner.get(key) {
            if entry.is_live() {
                return Ok(Some(entry.value.clone()));
            }
            drop(entry);
            self.inner.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        self.inner
            .insert(key.to_string(), Entry::new(value.to_string(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        self.inner.remove(key);
        Ok(())
    }

    async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, DomainError> {
        if let Some(entry) = self.inner.get(key) {
            if entry.is_live() {
                return Ok(false);
            }
            drop(entry);
            self.inner.remove(key);
        }
        self.inner
            .insert(key.to_string(), Entry::new(value.to_string(), ttl));
        Ok(true)
    }

    async fn increment_with_expiry(&self, key: &str, ttl: Duration) -> Result<i64, DomainError> {
        let mut next = 1i64;
        match self.inner.entry(key.to_string()) {
            MapEntry::Occupied(mut occupied) => {
                if occupied.get().is_live() {
                    next = occupied.get().value.parse::<i64>().unwrap_or(0) + 1;
                    occupied.get_mut().value = next.to_string();
                } else {
                    occupied.insert(Entry::new(next.to_string(), ttl));
                }
            }
            MapEntry::Vacant(vacant) => {
                vacant.insert(Entry::new(next.to_string(), ttl));
            }
        }
        Ok(next)
    }
}
