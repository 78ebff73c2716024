use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::state::AppState,
    domain::{ContactMessage, MessageId, NewContactMessage},
    error::{AppError, Result},
    service::Submission,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub message: String,
    pub data: ContactMessage,
    pub email_sent: bool,
}

#[derive(Debug, Deserialize)]
pub struct MarkReadRequest {
    pub id: Option<MessageId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedMessageResponse {
    pub message: String,
    pub deleted_message_id: MessageId,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ContactMessage>>> {
    let messages = state.service_context.contact_service.list().await?;
    Ok(Json(messages))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ContactMessage>> {
    let message = state.service_context.contact_service.get(&id).await?;
    Ok(Json(message))
}

/// Saves the message first; email delivery only changes the wording of the reply.
pub async fn submit(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewContactMessage>, JsonRejection>,
) -> Result<Json<SubmitResponse>> {
    let Json(request) = payload?;
    let Submission { message, notifications } =
        state.service_context.contact_service.submit(request).await?;

    let email_sent = notifications.attempted() > 0 && notifications.failed == 0;
    let text = if email_sent {
        "Your message has been sent."
    } else if notifications.attempted() == 0 {
        "Your message has been saved. Email notification is not configured."
    } else {
        "Your message has been saved, but the email notification could not be sent."
    };

    Ok(Json(SubmitResponse {
        message: text.to_string(),
        data: message,
        email_sent,
    }))
}

pub async fn mark_read(
    State(state): State<AppState>,
    payload: std::result::Result<Json<MarkReadRequest>, JsonRejection>,
) -> Result<Json<ContactMessage>> {
    let Json(request) = payload?;
    let id = request
        .id
        .filter(|id| !id.to_string().trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Message id is required".to_string()))?;

    let message = state.service_context.contact_service
        .mark_read(&id.to_string())
        .await?;

    Ok(Json(message))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedMessageResponse>> {
    let removed = state.service_context.contact_service.delete(&id).await?;

    Ok(Json(DeletedMessageResponse {
        message: "Message deleted".to_string(),
        deleted_message_id: removed.id,
    }))
}
