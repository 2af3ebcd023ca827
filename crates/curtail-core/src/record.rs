use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Trusted identity of the caller that created a link.
///
/// Issued by the authentication collaborator upstream; the core never
/// validates credentials. Guaranteed non-empty, so "anonymous" is always
/// expressed as `Option::None` rather than an empty string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(String);

impl OwnerId {
    /// Creates an `OwnerId`, returning `None` for blank input.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A durable link record.
///
/// Exactly one record exists per code. Records are never deleted, and the
/// only mutation after creation is the hit-count increment applied by the
/// resolution path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// The unique short code identifying this link.
    pub code: ShortCode,
    /// The original URL that was shortened, as provided by the caller.
    pub original_url: String,
    /// The creating caller, if any. Anonymous links have no owner.
    pub owner: Option<OwnerId>,
    /// UTC creation time.
    pub created_at: Timestamp,
    /// Number of resolutions that reached the durable store. Monotonically
    /// non-decreasing; cache hits are not counted.
    pub hit_count: u64,
}

impl LinkRecord {
    /// Creates a fresh record stamped with the current time and a zero
    /// hit count.
    pub fn create(code: ShortCode, original_url: impl Into<String>, owner: Option<OwnerId>) -> Self {
        Self {
            code,
            original_url: original_url.into(),
            owner,
            created_at: Timestamp::now(),
            hit_count: 0,
        }
    }
}
