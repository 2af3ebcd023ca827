//! [`ResolutionCache`] implementations.
//!
//! The cache holds `code -> original URL` entries with a TTL and is never
//! authoritative: callers treat a miss (or any cache failure) as a reason
//! to consult the durable store, not as "does not exist".
//!
//! [`ResolutionCache`]: curtail_core::ResolutionCache

pub mod layered;
pub mod moka;
pub mod null;
pub mod redis;

pub use crate::layered::LayeredCache;
pub use crate::moka::{MokaCache, MokaCacheConfig};
pub use crate::null::NullCache;
pub use crate::redis::RedisCache;
