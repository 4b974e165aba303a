//! Listing endpoints.
//!
//! - GET /api/properties      - search listings (newest first)
//! - GET /api/properties/:id  - fetch one listing

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Serialize;

use super::{AppState, error::ApiError};
use crate::{
    filters::{SearchQuery, compile_filters},
    property::Property,
    search::query_string,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyListResponse {
    pub success: bool,
    pub message: String,
    pub properties: Vec<Property>,
    pub total_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyResponse {
    pub success: bool,
    pub message: String,
    pub property: Property,
}

pub async fn list_properties(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<PropertyListResponse>, ApiError> {
    log::debug!("filter parameters: {query:?}");
    let filters = query.into_filters()?;
    let predicate = compile_filters(&filters);
    log::debug!("compiled predicate: {}", query_string(&predicate));

    let result = state.store.search(&predicate).await?;

    Ok(Json(PropertyListResponse {
        success: true,
        message: "Properties fetched successfully".to_string(),
        total_count: result.items.len() as u64,
        properties: result.items,
    }))
}

pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PropertyResponse>, ApiError> {
    let property = state
        .store
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Property not found"))?;

    Ok(Json(PropertyResponse {
        success: true,
        message: "Property fetched successfully".to_string(),
        property,
    }))
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_properties))
        .route("/:id", get(get_property))
}
