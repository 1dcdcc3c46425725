//! Cache module providing runtime-configurable caching with multiple backends.
//!
//! This module provides a unified caching interface that supports:
//! - Memory cache (in-process LRU with per-entry expiry)
//! - Redis cache (shared between instances)
//!
//! # Configuration
//!
//! ```toml
//! [cache]
//! enabled = true
//! backend = "memory"  # or "redis"
//!
//! [cache.memory]
//! max_size = 1000
//! ttl_seconds = 300
//!
//! [cache.redis]
//! url = "redis://127.0.0.1:6379"
//! ttl_seconds = 300
//! pool_size = 4
//! connection_timeout = 5
//! key_prefix = "pokedex"
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let page = cache
//!     .get_or_fetch("pokeapi:list:offset=0:limit=20", 60, || provider.list(page))
//!     .await?;
//! ```

mod error;
mod manager;
mod memory;
mod noop;
mod redis;
mod traits;

pub use error::CacheError;
pub use manager::CacheManager;
pub use memory::MemoryCache;
pub use noop::NoOpCache;
pub use traits::AppCache;

pub use crate::config::settings::{
    CacheBackend, CacheConfig, MemoryCacheConfig, RedisCacheConfig,
};
