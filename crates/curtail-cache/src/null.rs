use async_trait::async_trait;
use curtail_core::cache::Result;
use curtail_core::{ResolutionCache, ShortCode};
use std::time::Duration;

/// A no-op [`ResolutionCache`] for deployments that run without a cache.
///
/// Every `get` is a miss, so each resolution goes straight to the durable
/// store. Useful in tests and as the `none` cache backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ResolutionCache for NullCache {
    async fn get(&self, _code: &ShortCode) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _code: &ShortCode, _url: &str, _ttl: Duration) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_misses() {
        let cache = NullCache::new();
        let code = ShortCode::new_unchecked("abc123");

        cache
            .set(&code, "https://example.com", Duration::from_secs(60))
            .await
            .unwrap();

        assert!(cache.get(&code).await.unwrap().is_none());
    }
}
