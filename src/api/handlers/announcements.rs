use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::{form::FormInput, handlers::parse_id, state::AppState},
    domain::{Announcement, AnnouncementChanges, NewAnnouncement},
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct ListAnnouncementsQuery {
    pub active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: String,
    pub id: i64,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListAnnouncementsQuery>,
) -> Result<Json<Vec<Announcement>>> {
    let announcements = state.service_context.announcement_service
        .list(params.active.unwrap_or(false))
        .await?;

    Ok(Json(announcements))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Announcement>> {
    let id = parse_id(&id, "announcement")?;
    let announcement = state.service_context.announcement_service.get(id).await?;

    Ok(Json(announcement))
}

pub async fn create(
    State(state): State<AppState>,
    mut form: FormInput,
) -> Result<(StatusCode, Json<Announcement>)> {
    let [title, content, date] = form.require_all(["title", "content", "date"])?;
    let input = NewAnnouncement {
        title,
        content,
        date,
        is_active: form.flag("isActive")?.unwrap_or(true),
    };
    let image = form.take_file("image");

    let created = state.service_context.announcement_service
        .create(input, image)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut form: FormInput,
) -> Result<Json<Announcement>> {
    let id = parse_id(&id, "announcement")?;
    let changes = AnnouncementChanges {
        title: form.non_blank("title")?,
        content: form.non_blank("content")?,
        date: form.non_blank("date")?,
        is_active: form.flag("isActive")?,
        remove_image: form.flag("removeImage")?.unwrap_or(false),
    };
    let image = form.take_file("image");

    let updated = state.service_context.announcement_service
        .update(id, changes, image)
        .await?;

    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>> {
    let id = parse_id(&id, "announcement")?;
    state.service_context.announcement_service.delete(id).await?;

    Ok(Json(DeletedResponse {
        message: "Announcement deleted".to_string(),
        id,
    }))
}
