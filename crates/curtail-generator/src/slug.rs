use crate::{CodeGenerator, CodeProbe, ConflictPolicy, Result};
use async_trait::async_trait;
use curtail_core::ShortCode;
use url::Url;

/// Maximum length of a derived slug, before any collision suffix.
pub const MAX_SLUG_LENGTH: usize = 25;

/// How many path segments contribute keywords to the slug.
const MAX_PATH_KEYWORDS: usize = 2;

/// Prefix used when the URL yields nothing usable after cleaning.
const FALLBACK_PREFIX: &str = "link-";
const FALLBACK_SUFFIX_LENGTH: usize = 4;

/// Path segments that carry no meaning on their own and are skipped.
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "at", "by", "for", "from", "in", "is", "of", "on", "or", "the", "to",
    "with",
];

const LOWER_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Human-readable slug generator.
///
/// Derives a code from the target URL's host (leading `www.` stripped,
/// dots replaced by hyphens) plus up to two non-stop-word path segments,
/// lower-cased and reduced to `[a-z0-9-]`, truncated to 25 characters at a
/// hyphen boundary.
///
/// Collision handling is deliberately weaker than [`RandomCode`]'s: a taken
/// slug gets a random 4-digit numeric suffix appended exactly once, with no
/// uniqueness loop. A second conflict at insert time is surfaced to the
/// caller instead of retried.
///
/// [`RandomCode`]: crate::RandomCode
#[derive(Debug, Clone, Default)]
pub struct SlugCode;

impl SlugCode {
    pub fn new() -> Self {
        Self
    }

    /// Derives the slug for a target URL without consulting any store.
    fn derive(target: &Url) -> String {
        let host = target.host_str().unwrap_or_default().to_ascii_lowercase();
        let host = host.strip_prefix("www.").unwrap_or(&host);

        let mut parts = Vec::with_capacity(1 + MAX_PATH_KEYWORDS);
        let cleaned_host = clean_part(&host.replace('.', "-"));
        if !cleaned_host.is_empty() {
            parts.push(cleaned_host);
        }

        let mut keywords = 0;
        for segment in target.path_segments().into_iter().flatten() {
            if keywords == MAX_PATH_KEYWORDS {
                break;
            }
            let cleaned = clean_part(segment);
            if cleaned.is_empty() || STOP_WORDS.contains(&cleaned.as_str()) {
                continue;
            }
            parts.push(cleaned);
            keywords += 1;
        }

        truncate_at_hyphen(&parts.join("-"), MAX_SLUG_LENGTH)
    }

    /// Slug used when the URL yields nothing after cleaning.
    fn fallback() -> String {
        let suffix: String = std::iter::repeat_with(|| {
            LOWER_ALPHABET[rand::random_range(0..LOWER_ALPHABET.len())] as char
        })
        .take(FALLBACK_SUFFIX_LENGTH)
        .collect();
        format!("{}{}", FALLBACK_PREFIX, suffix)
    }

    /// Appends the random 4-digit collision suffix to a taken slug.
    fn with_numeric_suffix(taken: &ShortCode) -> ShortCode {
        ShortCode::new_unchecked(format!("{}-{:04}", taken.as_str(), rand::random_range(0..10_000)))
    }
}

/// Lower-cases a slug part and strips everything outside `[a-z0-9-]`,
/// including leading and trailing hyphens.
fn clean_part(part: &str) -> String {
    let cleaned: String = part
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    cleaned.trim_matches('-').to_string()
}

/// Cuts `slug` down to at most `max` characters, preferring the last hyphen
/// before the limit so no word is cut in half.
fn truncate_at_hyphen(slug: &str, max: usize) -> String {
    if slug.len() <= max {
        return slug.to_string();
    }
    let cut = &slug[..max];
    match cut.rfind('-') {
        Some(idx) if idx > 0 => cut[..idx].to_string(),
        _ => cut.to_string(),
    }
}

#[async_trait]
impl CodeGenerator for SlugCode {
    async fn generate(&self, target: &Url, probe: &dyn CodeProbe) -> Result<ShortCode> {
        let derived = Self::derive(target);
        let candidate = if derived.is_empty() {
            ShortCode::new_unchecked(Self::fallback())
        } else {
            ShortCode::new_unchecked(derived)
        };

        // One probe, one suffix. The suffixed candidate is not re-checked;
        // the store's insert constraint catches the residual collision.
        if probe.contains(&candidate).await? {
            return Ok(Self::with_numeric_suffix(&candidate));
        }

        Ok(candidate)
    }

    fn on_conflict(&self, taken: &ShortCode) -> ConflictPolicy {
        ConflictPolicy::Mutate(Self::with_numeric_suffix(taken))
    }
}
