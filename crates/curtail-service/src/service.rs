use crate::error::LinkError;
use crate::hits::HitRecorder;
use async_trait::async_trait;
use curtail_core::{
    LinkRecord, LinkStore, OwnerId, ResolutionCache, ShortCode, StoreError, RESOLUTION_TTL,
};
use curtail_generator::{parse_target, CodeGenerator, ConflictPolicy};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// How many candidate codes a single create will try before giving up.
/// Only the regenerating strategy gets the full budget; a mutating
/// strategy is limited to its single mutation.
const MAX_CREATE_ATTEMPTS: usize = 5;

/// The service surface consumed by the transport layer.
///
/// "Not found" is an `Ok(None)`, never an error; callers translate it to
/// their own not-found response.
#[async_trait]
pub trait Links: Send + Sync + 'static {
    /// Creates a link for `original_url` and returns the persisted record.
    async fn create(
        &self,
        original_url: &str,
        owner: Option<OwnerId>,
    ) -> Result<LinkRecord, LinkError>;

    /// Resolves a short code to its original URL.
    async fn resolve(&self, code: &str) -> Result<Option<String>, LinkError>;

    /// Lists the caller's links, newest first. An absent owner yields an
    /// empty list: anonymous links are not listable.
    async fn list_for_owner(
        &self,
        owner: Option<&OwnerId>,
    ) -> Result<Vec<LinkRecord>, LinkError>;
}

/// Orchestrates creation and cache-aside resolution of links.
///
/// Creation generates a candidate code, lets the durable store's insert
/// constraint arbitrate races, and populates the cache. Resolution checks
/// the cache first (hits return immediately and are not counted), falls
/// back to the store on a miss, queues a detached hit-count increment and
/// repopulates the cache. Cache failures on either path degrade to the
/// store instead of failing the operation.
#[derive(Debug, Clone)]
pub struct LinkService<S, C, G> {
    store: Arc<S>,
    cache: Arc<C>,
    generator: G,
    hits: HitRecorder,
}

impl<S: LinkStore, C: ResolutionCache, G: CodeGenerator> LinkService<S, C, G> {
    /// Creates the service and spawns its hit-count worker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(store: S, cache: C, generator: G) -> Self {
        let store = Arc::new(store);
        let hits = HitRecorder::spawn(Arc::clone(&store));
        Self {
            store,
            cache: Arc::new(cache),
            generator,
            hits,
        }
    }

    /// Returns a reference to the durable store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns a reference to the resolution cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    async fn populate_cache(&self, code: &ShortCode, url: &str) {
        if let Err(e) = self.cache.set(code, url, RESOLUTION_TTL).await {
            warn!(code = %code, error = %e, "failed to populate resolution cache");
        }
    }
}

#[async_trait]
impl<S: LinkStore, C: ResolutionCache, G: CodeGenerator> Links for LinkService<S, C, G> {
    async fn create(
        &self,
        original_url: &str,
        owner: Option<OwnerId>,
    ) -> Result<LinkRecord, LinkError> {
        // Validated before anything touches a store or a cache.
        let target = parse_target(original_url)?;

        let mut candidate = self.generator.generate(&target, &*self.store).await?;
        let mut attempts = 1;

        loop {
            let record = LinkRecord::create(candidate.clone(), original_url, owner.clone());

            match self.store.insert(record.clone()).await {
                Ok(()) => {
                    self.populate_cache(&record.code, &record.original_url).await;
                    debug!(code = %record.code, "created link");
                    return Ok(record);
                }
                Err(StoreError::DuplicateCode(_)) => {
                    debug!(code = %candidate, attempts, "candidate lost the insert race");
                    match self.generator.on_conflict(&candidate) {
                        ConflictPolicy::Regenerate if attempts < MAX_CREATE_ATTEMPTS => {
                            candidate = self.generator.generate(&target, &*self.store).await?;
                        }
                        // A mutating strategy gets exactly one more insert.
                        ConflictPolicy::Mutate(mutated) if attempts == 1 => {
                            candidate = mutated;
                        }
                        _ => return Err(LinkError::DuplicateCode(candidate.to_string())),
                    }
                    attempts += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn resolve(&self, code: &str) -> Result<Option<String>, LinkError> {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        // A code outside the alphabet cannot have been issued.
        let Ok(code) = ShortCode::new(trimmed) else {
            trace!(code = trimmed, "rejecting malformed short code");
            return Ok(None);
        };

        match self.cache.get(&code).await {
            Ok(Some(url)) => {
                debug!(code = %code, "resolved from cache");
                return Ok(Some(url));
            }
            Ok(None) => {
                trace!(code = %code, "cache miss, consulting store");
            }
            Err(e) => {
                warn!(code = %code, error = %e, "resolution cache failed, falling back to store");
            }
        }

        let Some(record) = self.store.find_by_code(&code).await? else {
            trace!(code = %code, "short code not found");
            return Ok(None);
        };

        // The URL is determined; accounting and recaching must not delay
        // or fail the response from here on.
        self.hits.record(&code);
        self.populate_cache(&code, &record.original_url).await;

        debug!(code = %code, "resolved from store");
        Ok(Some(record.original_url))
    }

    async fn list_for_owner(
        &self,
        owner: Option<&OwnerId>,
    ) -> Result<Vec<LinkRecord>, LinkError> {
        match owner {
            Some(owner) => Ok(self.store.list_by_owner(owner).await?),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curtail_cache::{MokaCache, NullCache};
    use curtail_generator::{CodeProbe, GeneratorError, RandomCode, SlugCode, Strategy};
    use curtail_storage::InMemoryStore;
    use std::time::Duration;
    use url::Url;

    fn random_service() -> LinkService<InMemoryStore, MokaCache, Strategy> {
        LinkService::new(
            InMemoryStore::new(),
            MokaCache::new(),
            Strategy::Random(RandomCode::new()),
        )
    }

    fn slug_service() -> LinkService<InMemoryStore, MokaCache, Strategy> {
        LinkService::new(
            InMemoryStore::new(),
            MokaCache::new(),
            Strategy::Slug(SlugCode::new()),
        )
    }

    fn uncached_service() -> LinkService<InMemoryStore, NullCache, Strategy> {
        LinkService::new(
            InMemoryStore::new(),
            NullCache::new(),
            Strategy::Random(RandomCode::new()),
        )
    }

    async fn stored_hits<S: LinkStore>(store: &S, code: &ShortCode) -> u64 {
        store
            .find_by_code(code)
            .await
            .unwrap()
            .expect("record should exist")
            .hit_count
    }

    async fn wait_for_hits<S: LinkStore>(store: &S, code: &ShortCode, expected: u64) {
        for _ in 0..100 {
            if stored_hits(store, code).await >= expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("hit count for '{}' never reached {}", code, expected);
    }

    #[tokio::test]
    async fn create_then_resolve_returns_the_original_url() {
        let service = random_service();

        let record = service
            .create("https://example.com/some/page?q=1", None)
            .await
            .unwrap();

        let resolved = service.resolve(record.code.as_str()).await.unwrap();
        assert_eq!(resolved.as_deref(), Some("https://example.com/some/page?q=1"));
    }

    #[tokio::test]
    async fn unknown_codes_resolve_to_none() {
        let service = random_service();

        assert!(service.resolve("nosuch").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn blank_codes_resolve_to_none_without_lookup() {
        let service = random_service();

        assert!(service.resolve("").await.unwrap().is_none());
        assert!(service.resolve("   ").await.unwrap().is_none());
        assert!(service.resolve("\t\n").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_codes_resolve_to_none() {
        let service = random_service();

        assert!(service.resolve("abc/def").await.unwrap().is_none());
        assert!(service.resolve("abc def").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn successive_creates_yield_distinct_codes() {
        let service = random_service();

        let first = service.create("https://example.com/a", None).await.unwrap();
        let second = service.create("https://example.com/b", None).await.unwrap();

        assert_ne!(first.code, second.code);
    }

    #[tokio::test]
    async fn create_with_invalid_url_writes_nothing() {
        let service = random_service();
        let owner = OwnerId::new("user-1");

        let err = service.create("not-a-url", owner.clone()).await.unwrap_err();
        assert!(matches!(err, LinkError::InvalidUrl(_)));

        let listed = service.list_for_owner(owner.as_ref()).await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn create_with_empty_url_fails() {
        let service = random_service();

        let err = service.create("", None).await.unwrap_err();
        assert!(matches!(err, LinkError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn resolution_without_a_cache_reaches_the_store() {
        let service = uncached_service();

        let record = service.create("https://example.com", None).await.unwrap();

        // Every resolve is a cache miss here; the store answers each time.
        for _ in 0..3 {
            let resolved = service.resolve(record.code.as_str()).await.unwrap();
            assert_eq!(resolved.as_deref(), Some("https://example.com"));
        }

        wait_for_hits(service.store(), &record.code, 3).await;
    }

    #[tokio::test]
    async fn store_resolution_repopulates_the_cache() {
        let service = random_service();

        // Insert behind the cache's back, as if the entry had expired.
        let code = ShortCode::new_unchecked("abc123");
        service
            .store()
            .insert(LinkRecord::create(code.clone(), "https://example.com", None))
            .await
            .unwrap();
        assert!(service.cache().get(&code).await.unwrap().is_none());

        let resolved = service.resolve("abc123").await.unwrap();
        assert_eq!(resolved.as_deref(), Some("https://example.com"));

        assert_eq!(
            service.cache().get(&code).await.unwrap().as_deref(),
            Some("https://example.com")
        );
    }

    #[tokio::test]
    async fn cache_hits_do_not_touch_the_hit_count() {
        let service = random_service();

        let record = service.create("https://example.com", None).await.unwrap();

        // Create populated the cache, so these are all cache hits.
        for _ in 0..5 {
            let resolved = service.resolve(record.code.as_str()).await.unwrap();
            assert_eq!(resolved.as_deref(), Some("https://example.com"));
        }

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(stored_hits(service.store(), &record.code).await, 0);
    }

    #[tokio::test]
    async fn repeated_resolution_is_idempotent_and_hits_never_decrease() {
        let service = uncached_service();

        let record = service.create("https://example.com", None).await.unwrap();

        let mut last_seen = 0;
        for i in 1..=3u64 {
            let resolved = service.resolve(record.code.as_str()).await.unwrap();
            assert_eq!(resolved.as_deref(), Some("https://example.com"));

            wait_for_hits(service.store(), &record.code, i).await;
            let hits = stored_hits(service.store(), &record.code).await;
            assert!(hits >= last_seen);
            last_seen = hits;
        }
    }

    #[tokio::test]
    async fn slug_creates_readable_codes() {
        let service = slug_service();

        let record = service
            .create("https://www.Example.com/Blog/My-Post", None)
            .await
            .unwrap();

        assert_eq!(record.code.as_str(), "example-com-blog-my-post");
    }

    #[tokio::test]
    async fn colliding_slugs_get_distinct_codes_and_resolve_independently() {
        let service = slug_service();

        // Same host and path after normalization, different URLs.
        let first = service
            .create("https://www.example.com/blog/my-post", None)
            .await
            .unwrap();
        let second = service
            .create("https://example.com/blog/my-post?ref=feed", None)
            .await
            .unwrap();

        assert_ne!(first.code, second.code);
        assert!(second
            .code
            .as_str()
            .starts_with("example-com-blog-my-post-"));

        assert_eq!(
            service.resolve(first.code.as_str()).await.unwrap().as_deref(),
            Some("https://www.example.com/blog/my-post")
        );
        assert_eq!(
            service.resolve(second.code.as_str()).await.unwrap().as_deref(),
            Some("https://example.com/blog/my-post?ref=feed")
        );
    }

    #[tokio::test]
    async fn list_for_owner_returns_only_their_links_newest_first() {
        let service = random_service();
        let owner = OwnerId::new("user-1");

        let a = service
            .create("https://example.com/a", owner.clone())
            .await
            .unwrap();
        let b = service
            .create("https://example.com/b", owner.clone())
            .await
            .unwrap();
        service
            .create("https://example.com/anon", None)
            .await
            .unwrap();

        let listed = service.list_for_owner(owner.as_ref()).await.unwrap();
        assert_eq!(listed.len(), 2);
        let codes: Vec<&str> = listed.iter().map(|r| r.code.as_str()).collect();
        assert!(codes.contains(&a.code.as_str()));
        assert!(codes.contains(&b.code.as_str()));
        assert!(listed
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
    }

    #[tokio::test]
    async fn absent_owner_lists_nothing() {
        let service = random_service();
        service
            .create("https://example.com/anon", None)
            .await
            .unwrap();

        assert!(service.list_for_owner(None).await.unwrap().is_empty());
    }

    /// Generator that always yields the same code; used to force insert
    /// conflicts.
    struct FixedGenerator {
        code: &'static str,
        policy_mutate: Option<&'static str>,
    }

    #[async_trait]
    impl CodeGenerator for FixedGenerator {
        async fn generate(
            &self,
            _target: &Url,
            _probe: &dyn CodeProbe,
        ) -> Result<ShortCode, GeneratorError> {
            Ok(ShortCode::new_unchecked(self.code))
        }

        fn on_conflict(&self, _taken: &ShortCode) -> ConflictPolicy {
            match self.policy_mutate {
                Some(mutated) => ConflictPolicy::Mutate(ShortCode::new_unchecked(mutated)),
                None => ConflictPolicy::Regenerate,
            }
        }
    }

    #[tokio::test]
    async fn exhausted_regeneration_surfaces_duplicate_code() {
        let service = LinkService::new(
            InMemoryStore::new(),
            NullCache::new(),
            FixedGenerator {
                code: "stuck1",
                policy_mutate: None,
            },
        );

        service.create("https://example.com/a", None).await.unwrap();
        let err = service.create("https://example.com/b", None).await.unwrap_err();
        assert!(matches!(err, LinkError::DuplicateCode(_)));
    }

    #[tokio::test]
    async fn mutation_is_tried_exactly_once() {
        let store = InMemoryStore::new();
        // Both the candidate and its mutation are already taken.
        store
            .insert(LinkRecord::create(
                ShortCode::new_unchecked("slug-a"),
                "https://example.com/x",
                None,
            ))
            .await
            .unwrap();
        store
            .insert(LinkRecord::create(
                ShortCode::new_unchecked("slug-a-1234"),
                "https://example.com/y",
                None,
            ))
            .await
            .unwrap();

        let service = LinkService::new(
            store,
            NullCache::new(),
            FixedGenerator {
                code: "slug-a",
                policy_mutate: Some("slug-a-1234"),
            },
        );

        let err = service.create("https://example.com/z", None).await.unwrap_err();
        assert!(matches!(err, LinkError::DuplicateCode(_)));
    }

    #[tokio::test]
    async fn mutation_succeeds_when_the_suffixed_code_is_free() {
        let store = InMemoryStore::new();
        store
            .insert(LinkRecord::create(
                ShortCode::new_unchecked("slug-a"),
                "https://example.com/x",
                None,
            ))
            .await
            .unwrap();

        let service = LinkService::new(
            store,
            NullCache::new(),
            FixedGenerator {
                code: "slug-a",
                policy_mutate: Some("slug-a-5678"),
            },
        );

        let record = service.create("https://example.com/z", None).await.unwrap();
        assert_eq!(record.code.as_str(), "slug-a-5678");
    }
}
