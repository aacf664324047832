use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use stockroom_core::DomainError;
use stockroom_infra::StoreError;

use crate::app::views::ViewError;

/// Every way a handler can fail. Converting to a response is the handler's
/// only exit on the error path.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing/uncastable field, empty name, or duplicate name on a write.
    #[error("{0}")]
    Validation(String),

    #[error("invalid product id")]
    InvalidId,

    #[error("{0}")]
    InvalidQuery(String),

    #[error("product not found")]
    NotFound,

    #[error("{0}")]
    Storage(String),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error("failed to encode response: {0}")]
    Encode(String),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::INTERNAL_SERVER_ERROR, "validation_error"),
            ApiError::InvalidId => (StatusCode::BAD_REQUEST, "invalid_id"),
            ApiError::InvalidQuery(_) => (StatusCode::BAD_REQUEST, "invalid_query"),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "store_error"),
            ApiError::View(_) => (StatusCode::INTERNAL_SERVER_ERROR, "render_error"),
            ApiError::Encode(_) => (StatusCode::INTERNAL_SERVER_ERROR, "encode_error"),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ApiError::Validation(msg),
            DomainError::InvalidId(_) => ApiError::InvalidId,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(_) => ApiError::Validation(err.to_string()),
            StoreError::Domain(e) => e.into(),
            StoreError::Backend(msg) => ApiError::Storage(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = self.status_and_code();
        if matches!(self, ApiError::Storage(_) | ApiError::View(_) | ApiError::Encode(_)) {
            tracing::warn!(error = %self, code, "request failed");
        } else {
            tracing::debug!(error = %self, code, "request rejected");
        }
        json_error(status, code, self.to_string())
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
