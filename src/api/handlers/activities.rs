use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    api::{form::FormInput, handlers::parse_id, state::AppState},
    domain::{Activity, ActivityChanges, NewActivity},
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct ListActivitiesQuery {
    pub active: Option<bool>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListActivitiesQuery>,
) -> Result<Json<Vec<Activity>>> {
    let activities = state.service_context.activity_service
        .list(params.active.unwrap_or(false))
        .await?;

    Ok(Json(activities))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Activity>> {
    let id = parse_id(&id, "activity")?;
    let activity = state.service_context.activity_service.get(id).await?;

    Ok(Json(activity))
}

pub async fn create(
    State(state): State<AppState>,
    mut form: FormInput,
) -> Result<(StatusCode, Json<Activity>)> {
    let [title, description, date] = form.require_all(["title", "description", "date"])?;
    let input = NewActivity {
        title,
        description,
        date,
        location: form.optional("location").filter(|l| !l.is_empty()),
        videos: form.texts("videos").unwrap_or_default(),
        is_active: form.flag("isActive")?.unwrap_or(true),
    };
    let mut images = form.take_files("images");
    images.extend(form.take_files("image"));

    let created = state.service_context.activity_service
        .create(input, images)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut form: FormInput,
) -> Result<Json<Activity>> {
    let id = parse_id(&id, "activity")?;
    let changes = ActivityChanges {
        title: form.non_blank("title")?,
        description: form.non_blank("description")?,
        date: form.non_blank("date")?,
        location: form.optional("location"),
        videos: form.texts("videos"),
        is_active: form.flag("isActive")?,
    };
    let mut images = form.take_files("images");
    images.extend(form.take_files("image"));

    let updated = state.service_context.activity_service
        .update(id, changes, images)
        .await?;

    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_id(&id, "activity")?;
    state.service_context.activity_service.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
