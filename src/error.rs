use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::db::StoreError;
use crate::routes::ErrorResponse;
use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Database error: {0}")]
    Unavailable(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn unauthorized() -> Self {
        AppError::Unauthorized("Unauthorized".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Storage(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => AppError::NotFound("Not found".to_string()),
            StoreError::Conflict(what) => AppError::Conflict(format!("{} already exists", what)),
            StoreError::Database(e) => AppError::Unavailable(e.to_string()),
            StoreError::Unavailable(msg) => AppError::Unavailable(msg),
        }
    }
}

/// Body and query rejections keep the `{error}` contract. An oversize body
/// stays a 413, everything else is a 400.
fn rejection_error(status: StatusCode, text: String) -> AppError {
    tracing::warn!(status = %status, "Rejected request input: {}", text);
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(text)
    } else {
        AppError::Validation(text)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        rejection_error(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        rejection_error(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        rejection_error(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::Unavailable(msg) => {
                tracing::error!("Database error: {}", msg);
                ErrorResponse::new("Database not available")
            }
            AppError::Storage(e) => {
                tracing::error!("Upload storage error: {}", e);
                ErrorResponse {
                    error: e.summary().to_string(),
                    details: Some(e.to_string()),
                    hint: e.hint(),
                }
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ErrorResponse::new("Internal server error")
            }
            other => ErrorResponse::new(other.to_string()),
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
