use std::sync::Arc;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    config::ReadFallback,
    domain::{next_id, Activity, ActivityChanges, NewActivity},
    error::{AppError, Result},
    repository::RecordStore,
    service::read_with_fallback,
    storage::{UploadStore, UploadedFile},
};

pub struct ActivityService {
    store: Arc<dyn RecordStore<Activity>>,
    uploads: Arc<UploadStore>,
    fallback: ReadFallback,
    write_lock: Mutex<()>,
}

impl ActivityService {
    pub fn new(
        store: Arc<dyn RecordStore<Activity>>,
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

    pub async fn list(&self, active_only: bool) -> Result<Vec<Activity>> {
        let activities = read_with_fallback(self.store.as_ref(), self.fallback).await?;

        Ok(if active_only {
            activities.into_iter().filter(|a| a.is_active).collect()
        } else {
            activities
        })
    }

    pub async fn get(&self, id: i64) -> Result<Activity> {
        self.list(false)
            .await?
            .into_iter()
            .find(|a| a.id == id)
            .ok_or_else(not_found)
    }

    pub async fn create(&self, input: NewActivity, images: Vec<UploadedFile>) -> Result<Activity> {
        let _guard = self.write_lock.lock().await;
        let mut activities = self.store.load().await?;
        let id = next_id(&activities)?;

        let images = self.save_images(&images).await?;

        let now = Utc::now();
        let activity = Activity {
            id,
            title: input.title,
            description: input.description,
            date: input.date,
            location: input.location,
            images,
            videos: input.videos,
            created_at: now,
            updated_at: now,
            is_active: input.is_active,
        };

        activities.push(activity.clone());
        if let Err(e) = self.store.save(&activities).await {
            self.delete_images(&activity.images).await;
            return Err(e);
        }

        tracing::info!("Created activity {} with {} image(s)", activity.id, activity.images.len());
        Ok(activity)
    }

    /// Uploaded images replace the whole image list.
    pub async fn update(
        &self,
        id: i64,
        changes: ActivityChanges,
        images: Vec<UploadedFile>,
    ) -> Result<Activity> {
        let _guard = self.write_lock.lock().await;
        let mut activities = self.store.load().await?;

        let index = activities
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(not_found)?;

        let mut activity = activities[index].clone();

        if let Some(title) = changes.title {
            activity.title = title;
        }
        if let Some(description) = changes.description {
            activity.description = description;
        }
        if let Some(date) = changes.date {
            activity.date = date;
        }
        if let Some(location) = changes.location {
            activity.location = Some(location).filter(|l| !l.is_empty());
        }
        if let Some(videos) = changes.videos {
            activity.videos = videos;
        }
        if let Some(is_active) = changes.is_active {
            activity.is_active = is_active;
        }

        let replaced = if images.is_empty() {
            Vec::new()
        } else {
            let new_images = self.save_images(&images).await?;
            std::mem::replace(&mut activity.images, new_images)
        };

        activity.updated_at = Utc::now();
        activities[index] = activity.clone();

        if let Err(e) = self.store.save(&activities).await {
            if !images.is_empty() {
                self.delete_images(&activity.images).await;
            }
            return Err(e);
        }

        self.delete_images(&replaced).await;

        tracing::info!("Updated activity {}", id);
        Ok(activity)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut activities = self.store.load().await?;

        let index = activities
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(not_found)?;

        let removed = activities.remove(index);
        self.store.save(&activities).await?;
        self.delete_images(&removed.images).await;

        tracing::info!("Deleted activity {}", id);
        Ok(())
    }

    /// Saves every file or none of them.
    async fn save_images(&self, files: &[UploadedFile]) -> Result<Vec<String>> {
        let mut saved = Vec::with_capacity(files.len());
        for file in files {
            match self.uploads.save_binary(file).await {
                Ok(path) => saved.push(path),
                Err(e) => {
                    self.delete_images(&saved).await;
                    return Err(e);
                }
            }
        }
        Ok(saved)
    }

    async fn delete_images(&self, paths: &[String]) {
        for path in paths {
            self.uploads.delete_binary(path).await;
        }
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Activity not found".to_string())
}
