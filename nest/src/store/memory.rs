use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{
    errors::RepoError,
    id::generate_property_id,
    property::{NewProperty, Property, PropertyPatch},
    search::{FilterCondition, SearchResult},
};

/// Listings held in process memory. Searches evaluate the predicate row by row.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<Property>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_properties(properties: Vec<Property>) -> Self {
        Self {
            rows: RwLock::new(properties),
        }
    }

    pub async fn search(&self, condition: &FilterCondition) -> Result<SearchResult<Property>, RepoError> {
        let rows = self.rows.read().await;
        let mut items: Vec<Property> = rows.iter().filter(|p| condition.matches(*p)).cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(SearchResult::from_items(items))
    }

    pub async fn get(&self, id: &str) -> Result<Option<Property>, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|p| p.id == id).cloned())
    }

    pub async fn insert(&self, payload: NewProperty, created_at: DateTime<Utc>) -> Result<Property, RepoError> {
        self.insert_with_id(generate_property_id(), payload, created_at).await
    }

    /// Store under a caller-chosen id, replacing any listing already stored under it.
    pub async fn insert_with_id(
        &self,
        id: String,
        payload: NewProperty,
        created_at: DateTime<Utc>,
    ) -> Result<Property, RepoError> {
        let property = payload.into_property(id, created_at)?;
        let mut rows = self.rows.write().await;
        rows.retain(|p| p.id != property.id);
        rows.push(property.clone());
        Ok(property)
    }

    pub async fn update(&self, id: &str, patch: &PropertyPatch) -> Result<Property, RepoError> {
        let mut rows = self.rows.write().await;
        let property = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| RepoError::not_found(id))?;
        patch.apply(property)?;
        Ok(property.clone())
    }

    pub async fn delete(&self, id: &str) -> Result<(), RepoError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|p| p.id != id);
        if rows.len() == before {
            return Err(RepoError::not_found(id));
        }
        Ok(())
    }
}
