use std::sync::Arc;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    config::ReadFallback,
    domain::{next_id, Announcement, AnnouncementChanges, NewAnnouncement},
    error::{AppError, Result},
    repository::RecordStore,
    service::read_with_fallback,
    storage::{UploadStore, UploadedFile},
};

pub struct AnnouncementService {
    store: Arc<dyn RecordStore<Announcement>>,
    uploads: Arc<UploadStore>,
    fallback: ReadFallback,
    write_lock: Mutex<()>,
}

impl AnnouncementService {
    pub fn new(
        store: Arc<dyn RecordStore<Announcement>>,
        uploads: Arc<UploadStore>,
        fallback: ReadFallback,
    ) -> Self {
        Self {
            store,
            uploads,
            fallback,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn ensure(&self) -> Result<()> {
        self.store.ensure().await
    }

    /// List announcements in stored order
    pub async fn list(&self, active_only: bool) -> Result<Vec<Announcement>> {
        let announcements = read_with_fallback(self.store.as_ref(), self.fallback).await?;

        Ok(if active_only {
            announcements.into_iter().filter(|a| a.is_active).collect()
        } else {
            announcements
        })
    }

    /// Get an announcement by ID
    pub async fn get(&self, id: i64) -> Result<Announcement> {
        self.list(false)
            .await?
            .into_iter()
            .find(|a| a.id == id)
            .ok_or_else(not_found)
    }

    /// Create an announcement, storing its image first if one was sent
    pub async fn create(
        &self,
        input: NewAnnouncement,
        image: Option<UploadedFile>,
    ) -> Result<Announcement> {
        let _guard = self.write_lock.lock().await;
        let mut announcements = self.store.load().await?;
        let id = next_id(&announcements)?;

        let image = match image {
            Some(file) => Some(self.uploads.save_binary(&file).await?),
            None => None,
        };

        let now = Utc::now();
        let announcement = Announcement {
            id,
            title: input.title,
            content: input.content,
            date: input.date,
            image,
            created_at: now,
            updated_at: now,
            is_active: input.is_active,
        };

        announcements.push(announcement.clone());
        if let Err(e) = self.store.save(&announcements).await {
            if let Some(path) = &announcement.image {
                self.uploads.delete_binary(path).await;
            }
            return Err(e);
        }

        tracing::info!("Created announcement {}", announcement.id);
        Ok(announcement)
    }

    /// Apply the supplied changes; a new image replaces the old one
    pub async fn update(
        &self,
        id: i64,
        changes: AnnouncementChanges,
        image: Option<UploadedFile>,
    ) -> Result<Announcement> {
        let _guard = self.write_lock.lock().await;
        let mut announcements = self.store.load().await?;

        let index = announcements
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(not_found)?;

        let mut announcement = announcements[index].clone();
        let old_image = announcement.image.clone();

        if let Some(title) = changes.title {
            announcement.title = title;
        }
        if let Some(content) = changes.content {
            announcement.content = content;
        }
        if let Some(date) = changes.date {
            announcement.date = date;
        }
        if let Some(is_active) = changes.is_active {
            announcement.is_active = is_active;
        }

        // Determine final image: new upload > remove > keep existing
        if let Some(file) = image {
            announcement.image = Some(self.uploads.save_binary(&file).await?);
        } else if changes.remove_image {
            announcement.image = None;
        }

        announcement.updated_at = Utc::now();
        announcements[index] = announcement.clone();

        if let Err(e) = self.store.save(&announcements).await {
            if announcement.image != old_image {
                if let Some(path) = &announcement.image {
                    self.uploads.delete_binary(path).await;
                }
            }
            return Err(e);
        }

        if announcement.image != old_image {
            if let Some(path) = &old_image {
                self.uploads.delete_binary(path).await;
            }
        }

        tracing::info!("Updated announcement {}", id);
        Ok(announcement)
    }

    /// Delete an announcement along with its image
    pub async fn delete(&self, id: i64) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut announcements = self.store.load().await?;

        let index = announcements
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(not_found)?;

        let removed = announcements.remove(index);
        self.store.save(&announcements).await?;

        if let Some(path) = &removed.image {
            self.uploads.delete_binary(path).await;
        }

        tracing::info!("Deleted announcement {}", id);
        Ok(())
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Announcement not found".to_string())
}
