//! Listing storage backends.
//!
//! The filter compiler produces a backend-neutral [`FilterCondition`]; the memory backend
//! evaluates it directly while the Redis backend renders it to a RediSearch query.
//! Both return listings newest-first.

mod memory;
mod redis_store;

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

use crate::{
    errors::{RepoError, ValidationError},
    id::generate_property_id,
    property::{NewProperty, Property, PropertyPatch},
    search::{FilterCondition, SearchResult},
    validators::is_valid_uuid,
};

/// A listing in a seed file. `createdAt` defaults to load time. A fixed `id` keeps the
/// listing addressable across restarts; without one a fresh id is generated on every load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedProperty {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub property: NewProperty,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Read a JSON array of [`SeedProperty`] records.
pub async fn read_seed_file(path: &Path) -> Result<Vec<SeedProperty>, RepoError> {
    let content = tokio::fs::read_to_string(path).await?;
    let records: Vec<SeedProperty> = serde_json::from_str(&content)?;
    Ok(records)
}

pub enum PropertyStore {
    Memory(MemoryStore),
    Redis(RedisStore),
}

impl PropertyStore {
    pub fn backend_name(&self) -> &'static str {
        match self {
            PropertyStore::Memory(_) => "memory",
            PropertyStore::Redis(_) => "redis",
        }
    }

    /// Whether writes outlive the process.
    pub fn is_persistent(&self) -> bool {
        matches!(self, PropertyStore::Redis(_))
    }

    /// Prepare the backend for queries (creates the search index on Redis).
    pub async fn ensure_ready(&self) -> Result<(), RepoError> {
        match self {
            PropertyStore::Memory(_) => Ok(()),
            PropertyStore::Redis(store) => store.ensure_index().await,
        }
    }

    /// All listings matching `condition`, newest first.
    pub async fn search(&self, condition: &FilterCondition) -> Result<SearchResult<Property>, RepoError> {
        match self {
            PropertyStore::Memory(store) => store.search(condition).await,
            PropertyStore::Redis(store) => store.search(condition).await,
        }
    }

    pub async fn get(&self, id: &str) -> Result<Option<Property>, RepoError> {
        match self {
            PropertyStore::Memory(store) => store.get(id).await,
            PropertyStore::Redis(store) => store.get(id).await,
        }
    }

    pub async fn create(&self, payload: NewProperty) -> Result<Property, RepoError> {
        self.insert(payload, Utc::now()).await
    }

    pub async fn insert(&self, payload: NewProperty, created_at: DateTime<Utc>) -> Result<Property, RepoError> {
        match self {
            PropertyStore::Memory(store) => store.insert(payload, created_at).await,
            PropertyStore::Redis(store) => store.insert(payload, created_at).await,
        }
    }

    pub async fn insert_with_id(
        &self,
        id: String,
        payload: NewProperty,
        created_at: DateTime<Utc>,
    ) -> Result<Property, RepoError> {
        if !is_valid_uuid(&id) {
            return Err(ValidationError::single("id", "uuid", "id must be a UUID").into());
        }
        match self {
            PropertyStore::Memory(store) => store.insert_with_id(id, payload, created_at).await,
            PropertyStore::Redis(store) => store.insert_with_id(id, payload, created_at).await,
        }
    }

    pub async fn update(&self, id: &str, patch: &PropertyPatch) -> Result<Property, RepoError> {
        if patch.is_empty() {
            return Err(RepoError::invalid("Update requires at least one of purpose, price or isActive"));
        }
        match self {
            PropertyStore::Memory(store) => store.update(id, patch).await,
            PropertyStore::Redis(store) => store.update(id, patch).await,
        }
    }

    pub async fn delete(&self, id: &str) -> Result<(), RepoError> {
        match self {
            PropertyStore::Memory(store) => store.delete(id).await,
            PropertyStore::Redis(store) => store.delete(id).await,
        }
    }

    /// Insert every seed record. Stops at the first invalid record.
    pub async fn seed(&self, records: Vec<SeedProperty>) -> Result<Vec<Property>, RepoError> {
        let loaded_at = Utc::now();
        let mut created = Vec::with_capacity(records.len());
        for record in records {
            let created_at = record.created_at.unwrap_or(loaded_at);
            let id = record.id.unwrap_or_else(generate_property_id);
            created.push(self.insert_with_id(id, record.property, created_at).await?);
        }
        log::info!("seeded {} listings into the {} store", created.len(), self.backend_name());
        Ok(created)
    }
}
