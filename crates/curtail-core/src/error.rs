use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

/// Errors from the durable link store.
///
/// [`StoreError::DuplicateCode`] is the insert-time uniqueness gate; callers
/// recover from it by regenerating or mutating the candidate code. All other
/// variants are fatal to the operation that produced them.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("short code already exists: {0}")]
    DuplicateCode(String),
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
    #[error("store operation timed out: {0}")]
    Timeout(String),
    #[error("store query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("store operation failed: {0}")]
    Operation(String),
}

/// Errors from the resolution cache.
///
/// The cache is an accelerator only; callers on the resolution path treat
/// every variant as a cache miss and fall back to the durable store.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
    #[error("cache operation timed out: {0}")]
    Timeout(String),
    #[error("cache serialization failed: {0}")]
    Serialization(String),
    #[error("cache value is invalid: {0}")]
    InvalidData(String),
    #[error("cache initialization failed: {0}")]
    Initialization(String),
    #[error("cache operation failed: {0}")]
    Operation(String),
}
