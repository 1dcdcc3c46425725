//! Redis cache implementation using bb8 connection pool.

use std::time::Duration;

use async_trait::async_trait;
use bb8::{Pool, PooledConnection};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, RedisError};

use crate::cache::{AppCache, CacheError};
use crate::config::settings::RedisCacheConfig;

type RedisPool = Pool<Client>;

/// Redis-based cache with bb8 connection pool.
///
/// Expiry is delegated to Redis through `SET ... EX`.
pub struct RedisCache {
    pool: RedisPool,
    key_prefix: String,
    default_ttl: u64,
}

impl RedisCache {
    pub async fn new(config: &RedisCacheConfig) -> Result<Self, CacheError> {
        let client =
            Client::open(config.url.as_str()).map_err(|e| CacheError::Connection(e.to_string()))?;

        let pool = Pool::builder()
            .max_size(config.pool_size)
            .connection_timeout(Duration::from_secs(config.connection_timeout))
            .build(client)
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        Ok(Self {
            pool,
            key_prefix: config.key_prefix.clone(),
            default_ttl: config.ttl_seconds,
        })
    }

    async fn get_conn(&self) -> Result<PooledConnection<'_, Client>, CacheError> {
        self.pool
            .get()
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))
    }
}

fn prefixed_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}:{}", prefix, key)
    }
}

/// Redis rejects `EX 0`, so the shortest expiry is one second.
fn effective_ttl(ttl_seconds: Option<u64>, default_ttl: u64) -> u64 {
    ttl_seconds.unwrap_or(default_ttl).max(1)
}

#[async_trait]
impl AppCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut conn = self.get_conn().await?;
        let conn_ref: &mut MultiplexedConnection = &mut conn;

        conn_ref
            .get(prefixed_key(&self.key_prefix, key))
            .await
            .map_err(|e: RedisError| CacheError::Operation(e.to_string()))
    }

    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl_seconds: Option<u64>,
    ) -> Result<(), CacheError> {
        let mut conn = self.get_conn().await?;
        let conn_ref: &mut MultiplexedConnection = &mut conn;
        let ttl = effective_ttl(ttl_seconds, self.default_ttl);

        conn_ref
            .set_ex::<_, _, ()>(prefixed_key(&self.key_prefix, key), value, ttl)
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.get_conn().await?;
        let conn_ref: &mut MultiplexedConnection = &mut conn;

        conn_ref
            .del::<_, ()>(prefixed_key(&self.key_prefix, key))
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))
    }

    async fn clear(&self) -> Result<(), CacheError> {
        let mut conn = self.get_conn().await?;
        let conn_ref: &mut MultiplexedConnection = &mut conn;
        let pattern = prefixed_key(&self.key_prefix, "*");

        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(&pattern)
            .query_async(&mut *conn_ref)
            .await
            .map_err(|e: RedisError| CacheError::Operation(e.to_string()))?;

        if !keys.is_empty() {
            conn_ref
                .del::<_, ()>(keys)
                .await
                .map_err(|e| CacheError::Operation(e.to_string()))?;
        }

        Ok(())
    }
}
