use std::{borrow::Cow, fmt};

use thiserror::Error;

/// Errors surfaced by the query boundary and the listing stores.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("property {} not found", .entity_id.as_deref().unwrap_or("?"))]
    NotFound { entity_id: Option<String> },

    /// Malformed search parameters or an unusable request.
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{message}")]
    Other { message: Cow<'static, str> },
}

impl RepoError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn not_found(entity_id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_id: Some(entity_id.into()),
        }
    }
}

/// Every field that failed validation, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new(issues: impl IntoIterator<Item = ValidationIssue>) -> Self {
        Self {
            issues: issues.into_iter().collect(),
        }
    }

    pub fn single(field: impl Into<String>, code: &'static str, message: impl Into<String>) -> Self {
        Self::new([ValidationIssue::new(field, code, message)])
    }

    /// `field: message` pairs joined by `; `.
    pub fn summary(&self) -> String {
        let parts: Vec<String> = self.issues.iter().map(ToString::to_string).collect();
        parts.join("; ")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid listing: {}", self.summary())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: String,
    /// Machine-readable reason such as `required`, `range` or `uuid`.
    pub code: &'static str,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;
