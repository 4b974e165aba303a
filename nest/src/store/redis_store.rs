use chrono::{DateTime, Utc};
use redis::{aio::ConnectionManager, cmd};
use serde::{Deserialize, Serialize};

use crate::{
    errors::RepoError,
    id::generate_property_id,
    keys::KeyLayout,
    property::{NewProperty, PROPERTY_INDEX_SCHEMA, Property, PropertyPatch, fields},
    search::{
        FilterCondition, SearchResult, SortOrder,
        index::{self, IndexDefinition, SearchRequest},
    },
};

/// JSON document layout in Redis: the listing plus a numeric mirror of `createdAt`
/// so RediSearch can sort on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StoredProperty {
    #[serde(flatten)]
    pub property: Property,
    #[serde(rename = "createdAtTs")]
    pub created_at_ts: i64,
}

impl From<Property> for StoredProperty {
    fn from(property: Property) -> Self {
        let created_at_ts = property.created_at.timestamp_millis();
        Self {
            property,
            created_at_ts,
        }
    }
}

/// Listings stored as RedisJSON documents and searched through a RediSearch index.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    keys: KeyLayout,
}

impl RedisStore {
    pub async fn connect(url: &str, prefix: impl Into<String>) -> Result<Self, RepoError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self::new(conn, prefix))
    }

    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        Self {
            conn,
            keys: KeyLayout::new(prefix),
        }
    }

    pub fn index_definition(&self) -> IndexDefinition {
        IndexDefinition {
            name: self.keys.property_index(),
            key_prefix: self.keys.property_prefix(),
            fields: PROPERTY_INDEX_SCHEMA,
        }
    }

    pub async fn ensure_index(&self) -> Result<(), RepoError> {
        let mut conn = self.conn.clone();
        index::ensure_index(&mut conn, &self.index_definition()).await
    }

    pub async fn search(&self, condition: &FilterCondition) -> Result<SearchResult<Property>, RepoError> {
        let definition = self.index_definition();
        let request = SearchRequest::new(&definition.name, condition).sorted_by(fields::CREATED_AT, SortOrder::Desc);
        let mut conn = self.conn.clone();
        let result: SearchResult<StoredProperty> = index::run_search(&mut conn, &request).await?;

        Ok(SearchResult {
            items: result.items.into_iter().map(|stored| stored.property).collect(),
            total: result.total,
        })
    }

    pub async fn get(&self, id: &str) -> Result<Option<Property>, RepoError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = cmd("JSON.GET")
            .arg(self.keys.property_key(id))
            .arg("$")
            .query_async(&mut conn)
            .await?;
        raw.map(|json| index::decode_document::<StoredProperty>(&json).map(|stored| stored.property))
            .transpose()
    }

    pub async fn insert(&self, payload: NewProperty, created_at: DateTime<Utc>) -> Result<Property, RepoError> {
        self.insert_with_id(generate_property_id(), payload, created_at).await
    }

    /// `JSON.SET` under a caller-chosen id; an existing document with that id is overwritten.
    pub async fn insert_with_id(
        &self,
        id: String,
        payload: NewProperty,
        created_at: DateTime<Utc>,
    ) -> Result<Property, RepoError> {
        let property = payload.into_property(id, created_at)?;
        self.write(&property).await?;
        Ok(property)
    }

    pub async fn update(&self, id: &str, patch: &PropertyPatch) -> Result<Property, RepoError> {
        let mut property = self.get(id).await?.ok_or_else(|| RepoError::not_found(id))?;
        patch.apply(&mut property)?;
        self.write(&property).await?;
        Ok(property)
    }

    pub async fn delete(&self, id: &str) -> Result<(), RepoError> {
        let mut conn = self.conn.clone();
        let removed: i64 = cmd("DEL").arg(self.keys.property_key(id)).query_async(&mut conn).await?;
        if removed == 0 {
            return Err(RepoError::not_found(id));
        }
        Ok(())
    }

    async fn write(&self, property: &Property) -> Result<(), RepoError> {
        let document = serde_json::to_string(&StoredProperty::from(property.clone()))?;
        let mut conn = self.conn.clone();
        cmd("JSON.SET")
            .arg(self.keys.property_key(&property.id))
            .arg("$")
            .arg(document)
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }
}
