use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::{
    api::state::AppState,
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
}

/// Checks the single configured admin credential pair. No session is
/// issued; the admin panel keeps its own flag after a successful check.
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let Json(req) = payload?;
    let admin = &state.settings.admin;

    if admin.username.is_empty() || admin.password.is_empty() {
        tracing::warn!("Admin login attempted but no admin credentials are configured");
        return Err(AppError::Unauthorized);
    }

    let username_ok = req.username.as_bytes().ct_eq(admin.username.as_bytes());
    let password_ok = req.password.as_bytes().ct_eq(admin.password.as_bytes());

    if bool::from(username_ok & password_ok) {
        tracing::info!("Admin login succeeded");
        Ok(Json(LoginResponse { success: true }))
    } else {
        tracing::warn!("Admin login failed");
        Err(AppError::Unauthorized)
    }
}
