use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use catalog_core::DomainError;
use catalog_infra::RepositoryError;

/// Every failure a handler can return.
///
/// The first three are client errors with a fixed wire shape. Anything else is
/// `Internal`: logged in full, answered with an opaque 500.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("already exists")]
    AlreadyExists,

    #[error("not found")]
    NotFound,

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(vec![msg.into()])
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(v) => ApiError::Validation(v.into_messages()),
            DomainError::AlreadyExists => ApiError::AlreadyExists,
            DomainError::NotFound => ApiError::NotFound,
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Duplicate(_) => DomainError::AlreadyExists.into(),
            RepositoryError::Rejected(e) => e.into(),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(format!("body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(format!("query: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                axum::Json(json!({
                    "error": "ValidationError",
                    "details": details,
                })),
            )
                .into_response(),
            ApiError::AlreadyExists => json_error(StatusCode::CONFLICT, "AlreadyExists"),
            ApiError::NotFound => json_error(StatusCode::NOT_FOUND, "NotFound"),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "InternalError")
            }
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str) -> Response {
    (status, axum::Json(json!({ "error": code }))).into_response()
}
