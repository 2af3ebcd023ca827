use crate::{CodeGenerator, CodeProbe, ConflictPolicy, Result};
use async_trait::async_trait;
use curtail_core::ShortCode;
use url::Url;

/// The 62-character alphanumeric code alphabet.
const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Default code length. 62^6 candidate codes make collisions negligible
/// until the store holds on the order of tens of billions of links.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Fixed-length random code generator.
///
/// Draws from the 62-character alphanumeric alphabet using the thread-local
/// CSPRNG and retries against the probe until a free code is found. There
/// is no theoretical retry bound; in practice the first draw wins. Insert
/// conflicts are recovered by drawing again
/// ([`ConflictPolicy::Regenerate`]).
#[derive(Debug, Clone)]
pub struct RandomCode {
    length: usize,
}

impl RandomCode {
    /// Creates a generator with the default 6-character length.
    pub fn new() -> Self {
        Self::with_length(DEFAULT_CODE_LENGTH)
    }

    /// Creates a generator producing codes of `length` characters.
    pub fn with_length(length: usize) -> Self {
        Self { length }
    }

    fn draw(&self) -> ShortCode {
        let code: String = std::iter::repeat_with(|| {
            ALPHABET[rand::random_range(0..ALPHABET.len())] as char
        })
        .take(self.length)
        .collect();
        ShortCode::new_unchecked(code)
    }
}

impl Default for RandomCode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CodeGenerator for RandomCode {
    async fn generate(&self, _target: &Url, probe: &dyn CodeProbe) -> Result<ShortCode> {
        loop {
            let candidate = self.draw();
            if !probe.contains(&candidate).await? {
                return Ok(candidate);
            }
        }
    }

    fn on_conflict(&self, _taken: &ShortCode) -> ConflictPolicy {
        ConflictPolicy::Regenerate
    }
}
