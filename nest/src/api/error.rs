use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::errors::RepoError;

/// Failure envelope: `{ "success": false, "message": ... }` with a matching status.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub success: bool,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            success: false,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::InvalidRequest { message } => ApiError::bad_request(message),
            RepoError::Validation(validation) => ApiError::bad_request(validation.summary()),
            RepoError::NotFound { .. } => ApiError::not_found("Property not found"),
            other => {
                // Internal details stay in the log.
                log::error!("listing store error: {other}");
                ApiError::internal()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_repo_errors_to_statuses() {
        assert_eq!(ApiError::from(RepoError::invalid("bad")).status, StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(RepoError::not_found("x")).status, StatusCode::NOT_FOUND);
        let internal = ApiError::from(RepoError::Other {
            message: "boom".into(),
        });
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.message, "Internal server error");
    }

    #[test]
    fn envelope_omits_status() {
        let json = serde_json::to_value(ApiError::bad_request("nope")).unwrap();
        assert_eq!(json, serde_json::json!({ "success": false, "message": "nope" }));
    }
}
