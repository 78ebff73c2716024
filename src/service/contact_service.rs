use std::sync::Arc;
use chrono::Utc;
use tokio::sync::Mutex;
use validator::Validate;

use crate::{
    config::ReadFallback,
    domain::{next_id, ContactMessage, MessageId, NewContactMessage},
    error::{AppError, Result},
    integrations::{DispatchReport, IntegrationEvent, IntegrationManager},
    repository::RecordStore,
    service::read_with_fallback,
};

/// A stored contact message and what happened to its notifications.
#[derive(Debug, Clone)]
pub struct Submission {
    pub message: ContactMessage,
    pub notifications: DispatchReport,
}

pub struct ContactService {
    store: Arc<dyn RecordStore<ContactMessage>>,
    integration_manager: Arc<IntegrationManager>,
    fallback: ReadFallback,
    write_lock: Mutex<()>,
}

impl ContactService {
    pub fn new(
        store: Arc<dyn RecordStore<ContactMessage>>,
        integration_manager: Arc<IntegrationManager>,
        fallback: ReadFallback,
    ) -> Self {
        Self {
            store,
            integration_manager,
            fallback,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn ensure(&self) -> Result<()> {
        self.store.ensure().await
    }

    pub async fn list(&self) -> Result<Vec<ContactMessage>> {
        read_with_fallback(self.store.as_ref(), self.fallback).await
    }

    pub async fn get(&self, id: &str) -> Result<ContactMessage> {
        self.list()
            .await?
            .into_iter()
            .find(|m| m.id.matches(id))
            .ok_or_else(not_found)
    }

    /// Validate and store a message, then notify integrations. Notification
    /// failures are reported, never returned as errors.
    pub async fn submit(&self, request: NewContactMessage) -> Result<Submission> {
        let request = request.normalized();
        request.validate()?;

        let message = {
            let _guard = self.write_lock.lock().await;
            let mut messages = self.store.load().await?;

            let message = ContactMessage {
                id: MessageId::Number(next_id(&messages)?),
                name: request.name,
                email: request.email,
                subject: request.subject,
                message: request.message,
                created_at: Utc::now(),
                is_read: false,
            };

            messages.push(message.clone());
            self.store.save(&messages).await?;
            message
        };

        tracing::info!("Stored contact message {} from {}", message.id, message.email);

        let notifications = self
            .integration_manager
            .handle_event(IntegrationEvent::ContactMessageReceived(message.clone()))
            .await;

        Ok(Submission {
            message,
            notifications,
        })
    }

    pub async fn mark_read(&self, id: &str) -> Result<ContactMessage> {
        let _guard = self.write_lock.lock().await;
        let mut messages = self.store.load().await?;

        let message = messages
            .iter_mut()
            .find(|m| m.id.matches(id))
            .ok_or_else(not_found)?;
        message.is_read = true;
        let message = message.clone();

        self.store.save(&messages).await?;

        tracing::debug!("Marked contact message {} as read", message.id);
        Ok(message)
    }

    pub async fn delete(&self, id: &str) -> Result<ContactMessage> {
        let _guard = self.write_lock.lock().await;
        let mut messages = self.store.load().await?;

        let index = messages
            .iter()
            .position(|m| m.id.matches(id))
            .ok_or_else(not_found)?;

        let removed = messages.remove(index);
        self.store.save(&messages).await?;

        tracing::info!("Deleted contact message {} ({} remaining)", removed.id, messages.len());
        Ok(removed)
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Message not found".to_string())
}
