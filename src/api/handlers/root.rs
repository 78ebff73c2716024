use axum::{http::StatusCode, Json, response::IntoResponse};
use serde_json::json;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Meveddet API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Announcements, activities and contact messages for the association website",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "announcements": "/api/duyurular",
            "activities": "/api/faaliyetler",
            "contact": "/api/iletisim",
            "admin": "/api/admin/login"
        }
    }))
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
