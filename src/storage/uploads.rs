use std::path::{Path, PathBuf};

use axum::body::Bytes;
use chrono::Utc;
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::{
    config::StorageConfig,
    error::{AppError, Result},
};

/// A file part received with a form submission.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Uploaded images, stored flat in one public directory.
pub struct UploadStore {
    dir: PathBuf,
    url_prefix: String,
    max_bytes: usize,
}

impl UploadStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            dir: PathBuf::from(&config.uploads_dir),
            url_prefix: config.uploads_url_prefix.trim_end_matches('/').to_string(),
            max_bytes: config.max_upload_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Save an uploaded file to the uploads directory.
    /// Returns the public path to the file (e.g., "/uploads/1742640000000-afis.jpg")
    pub async fn save_binary(&self, file: &UploadedFile) -> Result<String> {
        if file.data.len() > self.max_bytes {
            return Err(AppError::BadRequest(format!(
                "File too large (max {} bytes)",
                self.max_bytes
            )));
        }

        fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::Storage(format!("Failed to create uploads directory: {}", e))
        })?;

        let name = sanitize_file_name(&file.file_name);
        let mut stamp = Utc::now().timestamp_millis();

        // Same name in the same millisecond: move to the next free stamp
        let (new_filename, out) = loop {
            let candidate = format!("{}-{}", stamp, name);
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.dir.join(&candidate))
                .await
            {
                Ok(out) => break (candidate, out),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => stamp += 1,
                Err(e) => {
                    return Err(AppError::Storage(format!("Failed to create file: {}", e)))
                }
            }
        };
        let file_path = self.dir.join(&new_filename);

        write_upload(&file_path, out, &file.data).await?;

        tracing::debug!("Saved upload {} ({} bytes)", file_path.display(), file.data.len());

        Ok(format!("{}/{}", self.url_prefix, new_filename))
    }

    /// Delete a previously saved upload by its public path. Paths outside the
    /// uploads prefix are ignored and failures are only logged.
    pub async fn delete_binary(&self, public_path: &str) {
        let Some(path) = self.local_path(public_path) else {
            return;
        };

        match fs::remove_file(&path).await {
            Ok(()) => tracing::debug!("Deleted upload {}", path.display()),
            Err(e) => tracing::warn!("Failed to delete upload {}: {}", path.display(), e),
        }
    }

    fn local_path(&self, public_path: &str) -> Option<PathBuf> {
        let name = public_path
            .strip_prefix(self.url_prefix.as_str())?
            .strip_prefix('/')?;

        if name.is_empty() || name.contains('/') || name.contains('\\') || name.starts_with('.') {
            return None;
        }

        Some(self.dir.join(name))
    }
}

/// Writes `data` through `out`. A failed write removes the partial file at `path`.
async fn write_upload<W: AsyncWrite + Unpin>(path: &Path, mut out: W, data: &[u8]) -> Result<()> {
    let written = async {
        out.write_all(data).await?;
        out.flush().await
    }
    .await;

    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(path).await {
            tracing::warn!("Failed to remove partial upload {}: {}", path.display(), cleanup);
        }
        return Err(AppError::Storage(format!("Failed to write file: {}", e)));
    }

    Ok(())
}

/// Keeps the last path component and replaces anything unusual with `-`.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or("");
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '-' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
