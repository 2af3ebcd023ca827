//! Short code generation for the Curtail URL shortener.
//!
//! Two strategies exist, with deliberately different uniqueness contracts:
//! [`RandomCode`] draws fixed-length codes from a CSPRNG and retries until
//! a free one is found, while [`SlugCode`] derives a human-readable code
//! from the target URL and falls back to a single numeric suffix on
//! collision. The difference is kept visible through [`ConflictPolicy`]
//! rather than unified behind one retry loop.

pub mod error;
pub mod random;
pub mod slug;

pub use error::GeneratorError;
pub use random::RandomCode;
pub use slug::SlugCode;

use async_trait::async_trait;
use curtail_core::{LinkStore, ShortCode, StoreError};
use url::Url;

/// Result type for generation.
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// An async existence check consulted while generating candidates.
///
/// Blanket-implemented for every [`LinkStore`], so a store can be passed
/// directly. The probe is an optimization only; the store's insert
/// constraint remains the authoritative uniqueness gate.
#[async_trait]
pub trait CodeProbe: Send + Sync {
    /// Returns `true` if the code is already taken.
    async fn contains(&self, code: &ShortCode) -> std::result::Result<bool, StoreError>;
}

#[async_trait]
impl<S: LinkStore> CodeProbe for S {
    async fn contains(&self, code: &ShortCode) -> std::result::Result<bool, StoreError> {
        self.exists(code).await
    }
}

/// What to do after the durable store rejected a candidate as a duplicate.
#[derive(Debug, Clone)]
pub enum ConflictPolicy {
    /// Draw an entirely new candidate; the caller may retry a bounded
    /// number of times.
    Regenerate,
    /// Retry exactly once with this mutated code; a second conflict is
    /// surfaced to the caller.
    Mutate(ShortCode),
}

/// Produces candidate short codes for a target URL.
#[async_trait]
pub trait CodeGenerator: Send + Sync + 'static {
    /// Produces a candidate code for `target`, consulting `probe` where the
    /// strategy requires it.
    async fn generate(&self, target: &Url, probe: &dyn CodeProbe) -> Result<ShortCode>;

    /// Chooses the recovery for an insert-time duplicate of `taken`.
    fn on_conflict(&self, taken: &ShortCode) -> ConflictPolicy;
}

/// The configured generation strategy.
///
/// Wraps the two generators so deployments can select one at startup
/// without erasing which collision-handling contract is in force.
#[derive(Debug, Clone)]
pub enum Strategy {
    Random(RandomCode),
    Slug(SlugCode),
}

#[async_trait]
impl CodeGenerator for Strategy {
    async fn generate(&self, target: &Url, probe: &dyn CodeProbe) -> Result<ShortCode> {
        match self {
            Strategy::Random(g) => g.generate(target, probe).await,
            Strategy::Slug(g) => g.generate(target, probe).await,
        }
    }

    fn on_conflict(&self, taken: &ShortCode) -> ConflictPolicy {
        match self {
            Strategy::Random(g) => g.on_conflict(taken),
            Strategy::Slug(g) => g.on_conflict(taken),
        }
    }
}

/// Parses and validates a target URL.
///
/// Accepts only absolute `http`/`https` URLs with a host. Checked before
/// any generation attempt, so an invalid target never reaches a store or
/// cache.
pub fn parse_target(raw: &str) -> Result<Url> {
    if raw.trim().is_empty() {
        return Err(GeneratorError::InvalidUrl("URL cannot be empty".into()));
    }

    let url = Url::parse(raw)
        .map_err(|e| GeneratorError::InvalidUrl(format!("'{}': {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(GeneratorError::InvalidUrl(format!(
                "URL scheme must be http or https: {}",
                other
            )));
        }
    }

    if url.host_str().is_none() {
        return Err(GeneratorError::InvalidUrl(format!(
            "URL must have a host: {}",
            raw
        )));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_absolute_http_urls() {
        assert!(parse_target("https://example.com").is_ok());
        assert!(parse_target("http://example.com/a/b?q=1").is_ok());
    }

    #[test]
    fn rejects_relative_and_empty() {
        assert!(matches!(
            parse_target(""),
            Err(GeneratorError::InvalidUrl(_))
        ));
        assert!(matches!(
            parse_target("   "),
            Err(GeneratorError::InvalidUrl(_))
        ));
        assert!(matches!(
            parse_target("not-a-url"),
            Err(GeneratorError::InvalidUrl(_))
        ));
        assert!(matches!(
            parse_target("/relative/path"),
            Err(GeneratorError::InvalidUrl(_))
        ));
    }

    #[test]
    fn rejects_hostless_and_foreign_schemes() {
        assert!(matches!(
            parse_target("mailto:user@example.com"),
            Err(GeneratorError::InvalidUrl(_))
        ));
        assert!(matches!(
            parse_target("file:///etc/hosts"),
            Err(GeneratorError::InvalidUrl(_))
        ));
    }
}
