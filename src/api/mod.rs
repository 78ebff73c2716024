pub mod form;
pub mod handlers;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    Router,
    routing::{get, post},
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::ServeDir,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::{
    config::Settings,
    service::ServiceContext,
};
use state::AppState;

/// Upper bound on file parts accepted in one admin form.
const MAX_FILES_PER_REQUEST: usize = 8;

pub fn create_app(
    service_context: Arc<ServiceContext>,
    settings: Arc<Settings>,
) -> Router {
    let body_limit = settings
        .storage
        .max_upload_bytes
        .saturating_mul(MAX_FILES_PER_REQUEST);
    let uploads_prefix = service_context.uploads.url_prefix().to_string();
    let uploads_dir = service_context.uploads.dir().to_path_buf();
    let app_state = AppState::new(service_context, settings);

    let mut router = Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))

        // API routes
        .nest("/api", api_routes());

    // Uploaded images are served back under the same prefix stored in records
    if uploads_prefix.starts_with('/') && uploads_prefix.len() > 1 {
        router = router.nest_service(&uploads_prefix, ServeDir::new(uploads_dir));
    }

    router
        // Add state to the router
        .with_state(app_state)

        // Middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/duyurular", announcement_routes())
        .nest("/faaliyetler", activity_routes())
        .nest("/iletisim", contact_routes())
        .nest("/contact", contact_routes())
        .route("/admin/login", post(handlers::admin::login))
}

fn announcement_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::announcements::list).post(handlers::announcements::create),
        )
        .route(
            "/:id",
            get(handlers::announcements::get)
                .put(handlers::announcements::update)
                .delete(handlers::announcements::delete),
        )
}

fn activity_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::activities::list).post(handlers::activities::create),
        )
        .route(
            "/:id",
            get(handlers::activities::get)
                .put(handlers::activities::update)
                .delete(handlers::activities::delete),
        )
}

fn contact_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::contact::list)
                .post(handlers::contact::submit)
                .put(handlers::contact::mark_read),
        )
        .route(
            "/:id",
            get(handlers::contact::get).delete(handlers::contact::delete),
        )
}
