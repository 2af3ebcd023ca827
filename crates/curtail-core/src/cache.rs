use crate::error::CacheError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use std::time::Duration;

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// How long a resolution cache entry lives before expiring on its own.
pub const RESOLUTION_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// The fast, ephemeral code-to-URL cache in front of the durable store.
///
/// Purely an accelerator with no uniqueness semantics. `Ok(None)` means
/// "not cached", never "does not exist": any absence must send the caller
/// to the durable store, and implementations must never answer a lookup
/// with a not-found error.
#[async_trait]
pub trait ResolutionCache: Send + Sync + 'static {
    /// Returns the cached original URL for a code, if present.
    async fn get(&self, code: &ShortCode) -> Result<Option<String>>;

    /// Stores the original URL for a code, expiring after `ttl`.
    async fn set(&self, code: &ShortCode, url: &str, ttl: Duration) -> Result<()>;
}

#[async_trait]
impl ResolutionCache for Box<dyn ResolutionCache> {
    async fn get(&self, code: &ShortCode) -> Result<Option<String>> {
        (**self).get(code).await
    }

    async fn set(&self, code: &ShortCode, url: &str, ttl: Duration) -> Result<()> {
        (**self).set(code, url, ttl).await
    }
}
