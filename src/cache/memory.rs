//! Memory cache implementation using cached::SizedCache.

use std::sync::Mutex;

use async_trait::async_trait;
use cached::{Cached, SizedCache};
use jiff::{SignedDuration, Timestamp};

use crate::cache::{AppCache, CacheError};
use crate::config::settings::MemoryCacheConfig;
use crate::utils::clock::SharedClock;

struct Entry {
    expires_at: Timestamp,
    bytes: Vec<u8>,
}

/// In-memory LRU cache with a per-entry TTL.
///
/// Expiry is judged against the injected clock. An entry stored at `t` with a
/// TTL of `n` seconds is served up to, but not including, `t + n`.
pub struct MemoryCache {
    store: Mutex<SizedCache<String, Entry>>,
    default_ttl: u64,
    clock: SharedClock,
}

impl MemoryCache {
    pub fn new(config: &MemoryCacheConfig, clock: SharedClock) -> Self {
        Self {
            store: Mutex::new(SizedCache::with_size(config.max_size.max(1))),
            default_ttl: config.ttl_seconds,
            clock,
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, SizedCache<String, Entry>>, CacheError> {
        self.store
            .lock()
            .map_err(|e| CacheError::Operation(e.to_string()))
    }
}

#[async_trait]
impl AppCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let now = self.clock.now();
        let mut store = self.lock()?;

        match store.cache_get(key) {
            Some(entry) if now < entry.expires_at => Ok(Some(entry.bytes.clone())),
            Some(_) => {
                store.cache_remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl_seconds: Option<u64>,
    ) -> Result<(), CacheError> {
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);
        let ttl = SignedDuration::from_secs(i64::try_from(ttl).unwrap_or(i64::MAX));
        let now = self.clock.now();
        let expires_at = now.checked_add(ttl).unwrap_or(Timestamp::MAX);

        self.lock()?.cache_set(
            key.to_string(),
            Entry {
                expires_at,
                bytes: value,
            },
        );
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.lock()?.cache_remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.lock()?.cache_clear();
        Ok(())
    }
}
