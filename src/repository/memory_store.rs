use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    domain::Record,
    error::{AppError, Result},
    repository::RecordStore,
};

/// Keeps the collection in memory. Used by tests and as a scratch backend.
pub struct InMemoryStore<T> {
    records: RwLock<Vec<T>>,
    corrupt: bool,
}

impl<T: Record> InMemoryStore<T> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: RwLock::new(records),
            corrupt: false,
        }
    }

    /// A store whose every read fails the way an unparseable file does.
    pub fn corrupted() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            corrupt: true,
        }
    }
}

impl<T: Record> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for InMemoryStore<T> {
    async fn ensure(&self) -> Result<()> {
        Ok(())
    }

    async fn load(&self) -> Result<Vec<T>> {
        if self.corrupt {
            return Err(AppError::Corrupt(format!("in-memory {} marked corrupt", T::COLLECTION)));
        }
        Ok(self.records.read().await.clone())
    }

    async fn save(&self, records: &[T]) -> Result<()> {
        if self.corrupt {
            return Err(AppError::Storage(format!("in-memory {} is read-only", T::COLLECTION)));
        }
        *self.records.write().await = records.to_vec();
        Ok(())
    }
}
