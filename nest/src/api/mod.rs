//! HTTP surface of the listing service.

pub mod error;
pub mod properties;

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use tower_http::cors::CorsLayer;

use crate::store::PropertyStore;

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PropertyStore>,
}

impl AppState {
    pub fn new(store: PropertyStore) -> Self {
        Self { store: Arc::new(store) }
    }
}

/// GET /health/ping
pub async fn ping() -> impl IntoResponse {
    (StatusCode::OK, "pong")
}

/// Build the application router. `frontend_url` restricts browser access to one origin.
pub fn create_router(state: AppState, frontend_url: Option<&str>) -> Router {
    let router = Router::new()
        .route("/health/ping", get(ping))
        .nest("/api/properties", properties::create_router())
        .with_state(state);

    match frontend_url.and_then(|url| HeaderValue::from_str(url).ok()) {
        Some(origin) => router.layer(cors_layer(origin)),
        None => router,
    }
}

fn cors_layer(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ORIGIN,
            header::ACCEPT,
            HeaderName::from_static("x-requested-with"),
        ])
        .allow_credentials(true)
}
