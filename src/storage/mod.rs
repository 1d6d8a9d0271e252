/*!
 * Upload Storage
 * Cloud bucket when credentials are configured, local directory otherwise
 */
pub mod local;
pub mod supabase;

use async_trait::async_trait;
use bytes::Bytes;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;

use crate::config::StorageSettings;

pub use local::LocalStorage;
pub use supabase::SupabaseStorage;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to write file: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("storage access policy rejected the upload: {message}")]
    PolicyRejected { bucket: String, message: String },

    #[error("bucket '{bucket}' is unavailable: {message}")]
    Bucket { bucket: String, message: String },

    #[error("storage returned {status}: {message}")]
    Rejected { status: u16, message: String },
}

impl StorageError {
    /// Short message shown as the error title in the dashboard.
    pub fn summary(&self) -> &'static str {
        match self {
            StorageError::Io(_) => "Failed to save file",
            StorageError::Request(_) => "Storage service unreachable",
            StorageError::PolicyRejected { .. } => "Upload blocked by storage policy",
            StorageError::Bucket { .. } => "Storage bucket unavailable",
            StorageError::Rejected { .. } => "Upload failed",
        }
    }

    /// Remediation the operator can apply, when one is known.
    pub fn hint(&self) -> Option<String> {
        match self {
            StorageError::PolicyRejected { bucket, .. } => Some(supabase::policy_hint(bucket)),
            StorageError::Bucket { .. } => Some(
                "Create the bucket as public in the storage dashboard, or use the service role key so it can be created automatically."
                    .to_string(),
            ),
            StorageError::Io(_) => {
                Some("Check that UPLOAD_DIR exists and is writable by the server process.".to_string())
            }
            _ => None,
        }
    }
}

/// Largest accepted upload, matching the hosting platform's request body limit.
pub const MAX_UPLOAD_BYTES: usize = 4_718_592;

lazy_static! {
    static ref UNSAFE_CHARS: Regex = Regex::new(r"[^a-zA-Z0-9._-]").unwrap();
}

pub fn check_upload_size(len: usize) -> Result<(), String> {
    if len > MAX_UPLOAD_BYTES {
        return Err(format!(
            "File too large ({:.1}MB). Maximum size is 4.5MB.",
            len as f64 / (1024.0 * 1024.0)
        ));
    }
    Ok(())
}

/// Keeps letters, digits, dot, underscore and dash; everything else becomes `_`.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned = UNSAFE_CHARS.replace_all(base, "_").trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// `<unix-millis>_<sanitized-name>`
pub fn stored_name(original: &str, now: chrono::DateTime<chrono::Utc>) -> String {
    format!("{}_{}", now.timestamp_millis(), sanitize_filename(original))
}

fn sniff_magic_bytes(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, 0x50, 0x4E, 0x47, ..] => Some("image/png"),
        [0x47, 0x49, 0x46, 0x38, ..] => Some("image/gif"),
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some("image/webp"),
        [0x25, 0x50, 0x44, 0x46, ..] => Some("application/pdf"),
        _ => None,
    }
}

/// Content type from the file's leading bytes, then its extension, then a binary default.
pub fn detect_content_type(filename: &str, bytes: &[u8]) -> String {
    if let Some(mime) = sniff_magic_bytes(bytes) {
        return mime.to_string();
    }
    mime_guess::from_path(filename)
        .first_raw()
        .unwrap_or("application/octet-stream")
        .to_string()
}

/// Destination for uploaded files. Returns the URL the file is served from.
#[async_trait]
pub trait UploadStore: Send + Sync {
    fn name(&self) -> &'static str;

    async fn store(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<String, StorageError>;
}

/// Cloud bucket if credentials are present, local directory otherwise.
pub fn select_backend(settings: &StorageSettings, http: reqwest::Client) -> Arc<dyn UploadStore> {
    match &settings.supabase {
        Some(cloud) => {
            tracing::info!(bucket = %cloud.bucket, "uploads go to cloud object storage");
            Arc::new(SupabaseStorage::new(cloud.clone(), http))
        }
        None => {
            tracing::info!(dir = %settings.upload_dir.display(), "uploads go to the local filesystem");
            Arc::new(LocalStorage::new(
                settings.upload_dir.clone(),
                settings.public_prefix.clone(),
            ))
        }
    }
}
