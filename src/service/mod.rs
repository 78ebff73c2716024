pub mod announcement_service;
pub mod activity_service;
pub mod contact_service;

use std::sync::Arc;
use crate::config::{ReadFallback, Settings};
use crate::domain::*;
use crate::error::Result;
use crate::integrations::IntegrationManager;
use crate::repository::*;
use crate::storage::UploadStore;

pub use announcement_service::AnnouncementService;
pub use activity_service::ActivityService;
pub use contact_service::{ContactService, Submission};

pub struct ServiceContext {
    pub announcement_service: Arc<AnnouncementService>,
    pub activity_service: Arc<ActivityService>,
    pub contact_service: Arc<ContactService>,
    pub uploads: Arc<UploadStore>,
    pub integration_manager: Arc<IntegrationManager>,
}

impl ServiceContext {
    /// Services backed by JSON files under `settings.storage.data_dir`.
    pub fn new(settings: &Settings, integration_manager: Arc<IntegrationManager>) -> Self {
        let data_dir = settings.storage.data_dir.clone();

        Self::with_stores(
            settings,
            Arc::new(JsonFileStore::<Announcement>::new(&data_dir)),
            Arc::new(JsonFileStore::<Activity>::new(&data_dir)),
            Arc::new(JsonFileStore::<ContactMessage>::new(&data_dir)),
            integration_manager,
        )
    }

    pub fn with_stores(
        settings: &Settings,
        announcement_store: Arc<dyn RecordStore<Announcement>>,
        activity_store: Arc<dyn RecordStore<Activity>>,
        contact_store: Arc<dyn RecordStore<ContactMessage>>,
        integration_manager: Arc<IntegrationManager>,
    ) -> Self {
        let fallback = settings.storage.read_fallback;
        let uploads = Arc::new(UploadStore::new(&settings.storage));

        let announcement_service = Arc::new(AnnouncementService::new(
            announcement_store,
            uploads.clone(),
            fallback,
        ));
        let activity_service = Arc::new(ActivityService::new(
            activity_store,
            uploads.clone(),
            fallback,
        ));
        let contact_service = Arc::new(ContactService::new(
            contact_store,
            integration_manager.clone(),
            fallback,
        ));

        Self {
            announcement_service,
            activity_service,
            contact_service,
            uploads,
            integration_manager,
        }
    }

    /// Creates every data file that does not exist yet.
    pub async fn ensure_storage(&self) -> Result<()> {
        self.announcement_service.ensure().await?;
        self.activity_service.ensure().await?;
        self.contact_service.ensure().await
    }
}

/// Reads a collection for display, substituting per `fallback` when the
/// store is empty or cannot be read.
pub(crate) async fn read_with_fallback<T: Record>(
    store: &dyn RecordStore<T>,
    fallback: ReadFallback,
) -> Result<Vec<T>> {
    match store.load().await {
        Ok(records) if !records.is_empty() => Ok(records),
        Ok(records) => match fallback {
            ReadFallback::Samples => Ok(T::samples()),
            ReadFallback::Empty | ReadFallback::Error => Ok(records),
        },
        Err(e) => match fallback {
            ReadFallback::Samples => {
                tracing::warn!("Reading {} failed, serving samples: {}", T::COLLECTION, e);
                Ok(T::samples())
            }
            ReadFallback::Empty => {
                tracing::warn!("Reading {} failed, serving an empty list: {}", T::COLLECTION, e);
                Ok(Vec::new())
            }
            ReadFallback::Error => Err(e),
        },
    }
}
