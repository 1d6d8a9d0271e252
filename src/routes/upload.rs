use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extractors::AdminSession;
use crate::state::AppState;
use crate::storage;

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

/// POST /api/upload
/// Single multipart field `file`; stored as `<unix-millis>_<sanitized name>`.
pub async fn upload_file(
    State(state): State<AppState>,
    AdminSession(session): AdminSession,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse>> {
    let mut multipart = multipart?;
    let mut file = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!("Multipart error: {}", e);
        AppError::Validation("Invalid multipart data".to_string())
    })? {
        if field.name() != Some("file") {
            continue;
        }
        let original_name = field.file_name().unwrap_or("upload").to_string();
        let bytes = field.bytes().await.map_err(|e| {
            tracing::warn!("Failed to read upload bytes: {}", e);
            AppError::PayloadTooLarge("File too large. Maximum size is 4.5MB.".to_string())
        })?;
        file = Some((original_name, bytes));
        break;
    }

    let Some((original_name, bytes)) = file else {
        return Err(AppError::Validation("No file uploaded".to_string()));
    };
    if bytes.is_empty() {
        return Err(AppError::Validation("Empty file".to_string()));
    }
    storage::check_upload_size(bytes.len()).map_err(AppError::PayloadTooLarge)?;

    let filename = storage::stored_name(&original_name, chrono::Utc::now());
    let content_type = storage::detect_content_type(&original_name, &bytes);
    let size = bytes.len();

    let url = state.uploads.store(&filename, &content_type, bytes).await?;
    tracing::info!(
        user_id = %session.id,
        backend = state.uploads.name(),
        "Uploaded {} ({} bytes, {})",
        filename,
        size,
        content_type
    );

    Ok(Json(UploadResponse { url }))
}
