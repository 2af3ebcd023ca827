use crate::error::StoreError;
use crate::record::{LinkRecord, OwnerId};
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// The durable, authoritative keyed record store.
///
/// Code uniqueness is enforced here, at insert time. Generators may consult
/// [`exists`](LinkStore::exists) as an optimization, but concurrent creates
/// that both pass the pre-check race, and the insert constraint is the sole
/// correctness backstop: the loser must receive
/// [`StoreError::DuplicateCode`].
#[async_trait]
pub trait LinkStore: Send + Sync + 'static {
    /// Checks whether a short code is already taken.
    async fn exists(&self, code: &ShortCode) -> Result<bool>;

    /// Inserts a new link record.
    ///
    /// Fails with [`StoreError::DuplicateCode`] if a record with the same
    /// code already exists.
    async fn insert(&self, record: LinkRecord) -> Result<()>;

    /// Retrieves the record for a short code. Returns `None` if the code
    /// does not exist.
    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<LinkRecord>>;

    /// Adds one to the record's hit count using the backend's native
    /// increment. A missing code is a no-op, not an error.
    async fn increment_hit(&self, code: &ShortCode) -> Result<()>;

    /// Lists the records created by `owner`, newest first.
    async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<LinkRecord>>;
}

#[async_trait]
impl LinkStore for Box<dyn LinkStore> {
    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        (**self).exists(code).await
    }

    async fn insert(&self, record: LinkRecord) -> Result<()> {
        (**self).insert(record).await
    }

    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        (**self).find_by_code(code).await
    }

    async fn increment_hit(&self, code: &ShortCode) -> Result<()> {
        (**self).increment_hit(code).await
    }

    async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<LinkRecord>> {
        (**self).list_by_owner(owner).await
    }
}
