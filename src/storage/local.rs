use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;

use super::{StorageError, UploadStore};

/// Writes into a directory that is served as static assets.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    dir: PathBuf,
    public_prefix: String,
}

impl LocalStorage {
    pub fn new(dir: PathBuf, public_prefix: String) -> Self {
        Self { dir, public_prefix }
    }
}

#[async_trait]
impl UploadStore for LocalStorage {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn store(
        &self,
        filename: &str,
        _content_type: &str,
        bytes: Bytes,
    ) -> Result<String, StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(filename), &bytes).await?;

        tracing::info!("File stored locally: {} ({} bytes)", filename, bytes.len());
        Ok(format!(
            "{}/{}",
            self.public_prefix.trim_end_matches('/'),
            filename
        ))
    }
}
