use async_trait::async_trait;
use curtail_core::cache::Result;
use curtail_core::{ResolutionCache, ShortCode};
use moka::future::Cache;
use moka::Expiry;
use std::time::{Duration, Instant};
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

const DEFAULT_CAPACITY: u64 = 10_000;

/// A cached URL together with the TTL it was stored with.
#[derive(Debug, Clone)]
struct CachedUrl {
    url: String,
    ttl: Duration,
}

/// Expires each entry after the TTL it was inserted with.
struct PerEntryTtl;

impl Expiry<String, CachedUrl> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedUrl,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// An in-process implementation of [`ResolutionCache`] using Moka.
///
/// Suited to single-node deployments or as the L1 of a
/// [`LayeredCache`](crate::LayeredCache). Each entry expires after the TTL
/// passed to [`set`](ResolutionCache::set).
#[derive(Debug, Clone)]
pub struct MokaCache {
    cache: Cache<String, CachedUrl>,
}

impl MokaCache {
    /// Creates a cache with the default maximum capacity of 10,000 entries.
    pub fn new() -> Self {
        MokaCacheConfig::builder().build().into()
    }

    /// Creates a cache with a custom maximum capacity.
    pub fn with_capacity(max_capacity: u64) -> Self {
        MokaCacheConfig::builder()
            .max_capacity(max_capacity)
            .build()
            .into()
    }
}

impl Default for MokaCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for creating a [`MokaCache`] with custom settings.
#[derive(Debug, TypedBuilder)]
pub struct MokaCacheConfig {
    /// Maximum number of entries the cache can hold.
    #[builder(default = DEFAULT_CAPACITY)]
    max_capacity: u64,
    /// Evict entries that have not been read for this long, independent of
    /// their TTL.
    #[builder(default, setter(strip_option))]
    time_to_idle: Option<Duration>,
}

impl From<MokaCacheConfig> for MokaCache {
    fn from(config: MokaCacheConfig) -> Self {
        let mut builder = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(PerEntryTtl);

        if let Some(tti) = config.time_to_idle {
            builder = builder.time_to_idle(tti);
        }

        MokaCache {
            cache: builder.build(),
        }
    }
}

#[async_trait]
impl ResolutionCache for MokaCache {
    async fn get(&self, code: &ShortCode) -> Result<Option<String>> {
        trace!(code = %code, "fetching URL from Moka cache");

        let key = code.as_str().to_string();
        match self.cache.get(&key).await {
            Some(entry) => {
                debug!(code = %code, "cache hit in Moka");
                Ok(Some(entry.url))
            }
            None => {
                trace!(code = %code, "cache miss in Moka");
                Ok(None)
            }
        }
    }

    async fn set(&self, code: &ShortCode, url: &str, ttl: Duration) -> Result<()> {
        trace!(code = %code, "storing URL in Moka cache");

        let key = code.as_str().to_string();
        self.cache
            .insert(
                key,
                CachedUrl {
                    url: url.to_string(),
                    ttl,
                },
            )
            .await;
        debug!(code = %code, "cached URL in Moka");
        Ok(())
    }
}
