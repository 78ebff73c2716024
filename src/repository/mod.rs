use async_trait::async_trait;
use crate::domain::Record;
use crate::error::Result;

pub mod json_store;
pub mod memory_store;

pub use json_store::JsonFileStore;
pub use memory_store::InMemoryStore;

/// Whole-collection persistence for one entity type.
///
/// Stores hold no locks of their own; the services serialize their
/// read-modify-write cycles.
#[async_trait]
pub trait RecordStore<T: Record>: Send + Sync {
    /// Creates the backing location if absent. Idempotent.
    async fn ensure(&self) -> Result<()>;

    /// Reads every record. A store that was never written is empty;
    /// unparseable content is `AppError::Corrupt`.
    async fn load(&self) -> Result<Vec<T>>;

    /// Replaces the stored collection.
    async fn save(&self, records: &[T]) -> Result<()>;
}
