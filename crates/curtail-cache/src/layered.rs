use async_trait::async_trait;
use curtail_core::cache::Result;
use curtail_core::{ResolutionCache, ShortCode};
use std::time::Duration;
use tracing::{debug, trace, warn};

const DEFAULT_BACKFILL_TTL: Duration = Duration::from_secs(60 * 60);

/// A two-level [`ResolutionCache`] composing two implementations.
///
/// L1 is typically a fast in-process cache ([`MokaCache`]) and L2 a shared
/// one ([`RedisCache`]). Reads try L1, then L2, backfilling L1 on an L2
/// hit; writes go through to both. An L1 failure degrades to L2 instead of
/// failing the lookup, since losing the local layer must never hide a
/// perfectly good shared entry.
///
/// Backfilled L1 entries use a shorter TTL than the one the entry was
/// originally stored with, keeping the local layer fresh and bounded.
///
/// [`MokaCache`]: crate::MokaCache
/// [`RedisCache`]: crate::RedisCache
#[derive(Debug, Clone)]
pub struct LayeredCache<L1, L2> {
    l1: L1,
    l2: L2,
    backfill_ttl: Duration,
}

impl<L1, L2> LayeredCache<L1, L2> {
    /// Creates a layered cache with the default one-hour L1 backfill TTL.
    pub fn new(l1: L1, l2: L2) -> Self {
        Self {
            l1,
            l2,
            backfill_ttl: DEFAULT_BACKFILL_TTL,
        }
    }

    /// Overrides the TTL used when backfilling L1 from an L2 hit.
    pub fn with_backfill_ttl(mut self, backfill_ttl: Duration) -> Self {
        self.backfill_ttl = backfill_ttl;
        self
    }

    /// Returns a reference to the L1 cache.
    pub fn l1(&self) -> &L1 {
        &self.l1
    }

    /// Returns a reference to the L2 cache.
    pub fn l2(&self) -> &L2 {
        &self.l2
    }
}

#[async_trait]
impl<L1, L2> ResolutionCache for LayeredCache<L1, L2>
where
    L1: ResolutionCache,
    L2: ResolutionCache,
{
    async fn get(&self, code: &ShortCode) -> Result<Option<String>> {
        trace!(code = %code, "fetching URL from layered cache");

        match self.l1.get(code).await {
            Ok(Some(url)) => {
                debug!(code = %code, "L1 cache hit");
                return Ok(Some(url));
            }
            Ok(None) => {
                trace!(code = %code, "L1 cache miss, trying L2");
            }
            Err(e) => {
                warn!(code = %code, error = %e, "L1 cache failed, trying L2");
            }
        }

        match self.l2.get(code).await? {
            Some(url) => {
                debug!(code = %code, "L2 cache hit, backfilling L1");
                if let Err(e) = self.l1.set(code, &url, self.backfill_ttl).await {
                    warn!(code = %code, error = %e, "failed to backfill L1");
                }
                Ok(Some(url))
            }
            None => {
                trace!(code = %code, "L2 cache miss");
                Ok(None)
            }
        }
    }

    async fn set(&self, code: &ShortCode, url: &str, ttl: Duration) -> Result<()> {
        trace!(code = %code, "storing URL in layered cache");

        // L2 first: the shared layer is the one other nodes read from.
        self.l2.set(code, url, ttl).await?;
        self.l1.set(code, url, ttl).await?;

        Ok(())
    }
}
