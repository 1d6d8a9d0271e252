use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::OnceCell;

use super::{StorageError, UploadStore};
use crate::config::SupabaseSettings;

/// SQL the operator can run when row-level security blocks inserts.
pub fn policy_hint(bucket: &str) -> String {
    format!(
        "Storage policies are blocking the upload. Run in the SQL editor: \
CREATE POLICY \"Public uploads\" ON storage.objects FOR INSERT TO public WITH CHECK (bucket_id = '{bucket}'); \
CREATE POLICY \"Public reads\" ON storage.objects FOR SELECT TO public USING (bucket_id = '{bucket}'); \
or set SUPABASE_SERVICE_ROLE_KEY so the server bypasses policies."
    )
}

#[derive(Debug, Deserialize)]
struct StorageApiError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Supabase Storage over its REST API.
pub struct SupabaseStorage {
    settings: SupabaseSettings,
    http: reqwest::Client,
    bucket_ready: OnceCell<()>,
}

impl SupabaseStorage {
    pub fn new(settings: SupabaseSettings, http: reqwest::Client) -> Self {
        Self {
            settings,
            http,
            bucket_ready: OnceCell::new(),
        }
    }

    pub fn public_url(&self, filename: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.settings.url, self.settings.bucket, filename
        )
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.bearer_auth(&self.settings.key)
            .header("apikey", &self.settings.key)
    }

    /// Creates the bucket as public when it does not exist. A transport
    /// failure leaves the cell empty so the next upload checks again.
    async fn ensure_bucket(&self) {
        if let Err(e) = self
            .bucket_ready
            .get_or_try_init(|| self.provision_bucket())
            .await
        {
            tracing::warn!(
                "Could not check storage bucket '{}': {}",
                self.settings.bucket,
                e
            );
        }
    }

    /// Rejections from the create call are logged and count as done; the
    /// upload that follows reports the real problem.
    async fn provision_bucket(&self) -> Result<(), reqwest::Error> {
        let bucket = &self.settings.bucket;
        let url = format!("{}/storage/v1/bucket/{}", self.settings.url, bucket);

        let res = self.authorized(self.http.get(&url)).send().await?;
        if res.status().is_success() {
            return Ok(());
        }

        let res = self
            .authorized(self.http.post(format!("{}/storage/v1/bucket", self.settings.url)))
            .json(&json!({ "id": bucket, "name": bucket, "public": true }))
            .send()
            .await?;

        let status = res.status();
        if status.is_success() {
            tracing::info!("Created public storage bucket '{}'", bucket);
        } else {
            let body = res.text().await.unwrap_or_default();
            tracing::warn!(
                "Could not create storage bucket '{}' ({}): {}",
                bucket,
                status,
                body
            );
        }
        Ok(())
    }
}

/// Turns a failed upload response into the matching error.
fn classify_failure(bucket: &str, status: u16, body: &str) -> StorageError {
    let message = serde_json::from_str::<StorageApiError>(body)
        .ok()
        .and_then(|e| e.message.or(e.error))
        .unwrap_or_else(|| body.to_string());
    let lowered = message.to_lowercase();

    if lowered.contains("polic") || lowered.contains("row-level security") {
        StorageError::PolicyRejected {
            bucket: bucket.to_string(),
            message,
        }
    } else if lowered.contains("bucket not found") {
        StorageError::Bucket {
            bucket: bucket.to_string(),
            message,
        }
    } else {
        StorageError::Rejected { status, message }
    }
}

#[async_trait]
impl UploadStore for SupabaseStorage {
    fn name(&self) -> &'static str {
        "supabase"
    }

    async fn store(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<String, StorageError> {
        self.ensure_bucket().await;

        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.settings.url, self.settings.bucket, filename
        );
        let size = bytes.len();
        let res = self
            .authorized(self.http.post(&url))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(classify_failure(&self.settings.bucket, status.as_u16(), &body));
        }

        tracing::info!("File stored in bucket '{}': {} ({} bytes)", self.settings.bucket, filename, size);
        Ok(self.public_url(filename))
    }
}
