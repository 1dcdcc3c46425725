//! Cache manager that dispatches to the configured backend.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cache::memory::MemoryCache;
use crate::cache::noop::NoOpCache;
use crate::cache::redis::RedisCache;
use crate::cache::{AppCache, CacheError};
use crate::config::settings::{CacheBackend, CacheConfig};
use crate::utils::clock::SharedClock;

/// Cache manager that provides access to the configured cache backend.
#[derive(Clone)]
pub struct CacheManager {
    backend: Arc<dyn AppCache>,
    config: CacheConfig,
}

impl CacheManager {
    /// Create a new cache manager with the given configuration.
    ///
    /// If caching is disabled, a NoOpCache is used. The clock only drives the
    /// memory backend; Redis expires entries on its own.
    pub async fn new(config: CacheConfig, clock: SharedClock) -> Result<Self, CacheError> {
        let backend: Arc<dyn AppCache> = if !config.enabled {
            Arc::new(NoOpCache)
        } else {
            match config.backend {
                CacheBackend::Memory => Arc::new(MemoryCache::new(&config.memory, clock)),
                CacheBackend::Redis => Arc::new(RedisCache::new(&config.redis).await?),
            }
        };

        Ok(Self { backend, config })
    }

    /// Wrap an already constructed backend.
    pub fn with_backend(backend: Arc<dyn AppCache>, config: CacheConfig) -> Self {
        Self { backend, config }
    }

    /// Check if caching is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    // ========================================================================
    // Read-through caching
    // ========================================================================

    /// Return the cached value for `key`, or run `fetch` and cache its result.
    ///
    /// Only successful results are stored, so errors are never cached. A cache
    /// that fails to read or write behaves like a miss; the failure is logged
    /// and the caller still gets the fetched value.
    pub async fn get_or_fetch<T, E, F, Fut>(
        &self,
        key: &str,
        ttl_seconds: u64,
        fetch: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        match self.backend.get(key).await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(value) => {
                    tracing::debug!(cache_key = %key, "Cache hit");
                    return Ok(value);
                }
                Err(e) => {
                    tracing::warn!(cache_key = %key, error = %e, "Discarding undecodable cache entry");
                }
            },
            Ok(None) => tracing::debug!(cache_key = %key, "Cache miss"),
            Err(e) => {
                tracing::warn!(cache_key = %key, error = %e, "Cache read failed, treating as miss");
            }
        }

        let value = fetch().await?;

        match serde_json::to_vec(&value) {
            Ok(bytes) => {
                if let Err(e) = self.backend.set(key, bytes, Some(ttl_seconds)).await {
                    tracing::warn!(cache_key = %key, error = %e, "Cache write failed");
                }
            }
            Err(e) => {
                tracing::warn!(cache_key = %key, error = %e, "Value could not be serialized for caching");
            }
        }

        Ok(value)
    }

    // ========================================================================
    // AppCache proxy methods
    // ========================================================================

    /// Get a value from the cache.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.backend.get(key).await
    }

    /// Set a value in the cache.
    pub async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl_seconds: Option<u64>,
    ) -> Result<(), CacheError> {
        self.backend.set(key, value, ttl_seconds).await
    }
}
