use async_trait::async_trait;
use curtail_core::store::Result;
use curtail_core::{LinkRecord, LinkStore, OwnerId, ShortCode, StoreError};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// In-memory implementation of the [`LinkStore`] trait using DashMap.
///
/// DashMap's sharded locks let concurrent operations on different codes
/// proceed without contention. Insert goes through the entry API so the
/// occupancy check and the write are a single atomic step per shard; this
/// is the uniqueness gate concurrent creates race against.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    links: DashMap<String, LinkRecord>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            links: DashMap::new(),
        }
    }

    /// Creates a new in-memory store with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            links: DashMap::with_capacity(capacity),
        }
    }
}

#[async_trait]
impl LinkStore for InMemoryStore {
    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.links.contains_key(code.as_str()))
    }

    async fn insert(&self, record: LinkRecord) -> Result<()> {
        match self.links.entry(record.code.as_str().to_owned()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateCode(record.code.to_string())),
            Entry::Vacant(vacant) => {
                vacant.insert(record);
                Ok(())
            }
        }
    }

    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        Ok(self.links.get(code.as_str()).map(|entry| entry.value().clone()))
    }

    async fn increment_hit(&self, code: &ShortCode) -> Result<()> {
        if let Some(mut entry) = self.links.get_mut(code.as_str()) {
            entry.hit_count += 1;
        }
        Ok(())
    }

    async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<LinkRecord>> {
        let mut records: Vec<LinkRecord> = self
            .links
            .iter()
            .filter(|entry| entry.value().owner.as_ref() == Some(owner))
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}
