use async_trait::async_trait;
use curtail_core::cache::Result;
use curtail_core::{CacheError, ResolutionCache, ShortCode};
use redis::AsyncCommands;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// A Redis-based implementation of [`ResolutionCache`].
///
/// Stores the original URL as a plain string under a namespaced key with a
/// per-entry TTL (`SET` with `EX`), so entries expire autonomously on the
/// Redis side.
#[derive(Debug, Clone)]
pub struct RedisCache {
    conn: redis::aio::MultiplexedConnection,
    key_prefix: String,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> CacheError {
    let message = format!("{operation}: {err}");
    if message.to_ascii_lowercase().contains("timed out") {
        CacheError::Timeout(message)
    } else {
        CacheError::Operation(message)
    }
}

impl RedisCache {
    /// Creates a new Redis resolution cache with the default key prefix.
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self {
            conn,
            key_prefix: "curtail:url:".to_string(),
        }
    }

    /// Creates a new Redis resolution cache with a custom key prefix.
    pub fn with_prefix(
        conn: redis::aio::MultiplexedConnection,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
        }
    }

    /// Generates the cache key for a short code.
    fn cache_key(&self, code: &ShortCode) -> String {
        format!("{}{}", self.key_prefix, code.as_str())
    }
}

#[async_trait]
impl ResolutionCache for RedisCache {
    async fn get(&self, code: &ShortCode) -> Result<Option<String>> {
        let key = self.cache_key(code);
        trace!(code = %code, "fetching URL from Redis cache");

        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(url)) => {
                debug!(code = %code, "cache hit in Redis");
                Ok(Some(url))
            }
            Ok(None) => {
                trace!(code = %code, "cache miss in Redis");
                Ok(None)
            }
            Err(e) => {
                warn!(code = %code, error = %e, "Redis error on get");
                Err(map_redis_error("failed to fetch value from Redis", e))
            }
        }
    }

    async fn set(&self, code: &ShortCode, url: &str, ttl: Duration) -> Result<()> {
        let key = self.cache_key(code);
        trace!(code = %code, "storing URL in Redis cache");

        // Redis rejects EX 0, so clamp to at least one second.
        let seconds = ttl.as_secs().max(1);

        let mut conn = self.conn.clone();
        match conn.set_ex::<_, _, ()>(&key, url, seconds).await {
            Ok(()) => {
                debug!(code = %code, ttl_secs = seconds, "cached URL in Redis");
                Ok(())
            }
            Err(e) => {
                warn!(code = %code, error = %e, "failed to cache URL in Redis");
                Err(map_redis_error("failed to write value to Redis", e))
            }
        }
    }
}
