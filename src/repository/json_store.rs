use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use crate::{
    domain::Record,
    error::{AppError, Result},
    repository::RecordStore,
};

/// A pretty-printed JSON array at `<data_dir>/<collection>.json`.
pub struct JsonFileStore<T> {
    dir: PathBuf,
    path: PathBuf,
    _records: PhantomData<fn() -> T>,
}

impl<T: Record> JsonFileStore<T> {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let dir = data_dir.into();
        let path = dir.join(format!("{}.json", T::COLLECTION));
        Self {
            dir,
            path,
            _records: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for JsonFileStore<T> {
    async fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::Storage(format!("Failed to create data directory {}: {}", self.dir.display(), e))
        })?;

        if !fs::try_exists(&self.path).await? {
            fs::write(&self.path, "[]").await.map_err(|e| {
                AppError::Storage(format!("Failed to create {}: {}", self.path.display(), e))
            })?;
            tracing::info!("Created data file {}", self.path.display());
        }

        Ok(())
    }

    async fn load(&self) -> Result<Vec<T>> {
        let data = match fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        if data.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&data)
            .map_err(|e| AppError::Corrupt(format!("{}: {}", self.path.display(), e)))
    }

    async fn save(&self, records: &[T]) -> Result<()> {
        self.ensure().await?;

        let json = serde_json::to_string_pretty(records)
            .map_err(|e| AppError::Internal(format!("Failed to serialize {}: {}", T::COLLECTION, e)))?;

        // Write beside the target and rename so readers never see half a file
        let tmp = self.dir.join(format!(".{}.{}.tmp", T::COLLECTION, Uuid::new_v4()));
        fs::write(&tmp, json).await.map_err(|e| {
            AppError::Storage(format!("Failed to write {}: {}", tmp.display(), e))
        })?;

        if let Err(e) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(AppError::Storage(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e
            )));
        }

        tracing::debug!("Wrote {} {} to {}", records.len(), T::COLLECTION, self.path.display());
        Ok(())
    }
}
