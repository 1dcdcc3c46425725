//! AppCache trait definition.

use async_trait::async_trait;

use crate::cache::CacheError;

/// Byte-oriented key/value store with per-entry expiry.
///
/// Serialization is the caller's job (see `CacheManager::get_or_fetch`), so a
/// backend only has to move opaque bytes.
#[async_trait]
pub trait AppCache: Send + Sync {
    /// Get a live (non-expired) value from the cache.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store a value. `ttl_seconds` falls back to the backend default when `None`.
    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl_seconds: Option<u64>,
    ) -> Result<(), CacheError>;

    /// Remove a value from the cache.
    async fn remove(&self, key: &str) -> Result<(), CacheError>;

    /// Clear all values from the cache.
    async fn clear(&self) -> Result<(), CacheError>;
}
