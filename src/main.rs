use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use meveddet::{
    api,
    config::Settings,
    integrations::{IntegrationManager, email::EmailIntegration},
    service::ServiceContext,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let (settings, settings_error) = match Settings::new() {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.logging.level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Some(e) = settings_error {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
    }

    tracing::info!("Starting Meveddet server on {}:{}", settings.server.host, settings.server.port);

    // Initialize integration manager
    let integration_manager = Arc::new(IntegrationManager::new());

    // Register integrations
    if let Some(email) = EmailIntegration::new(settings.mail.clone()) {
        integration_manager.register(Arc::new(email)).await;
    }

    // Check integration health
    let health_results = integration_manager.health_check_all().await;
    for (name, result) in health_results {
        match result {
            Ok(_) => tracing::info!("Integration {} is healthy", name),
            Err(e) => tracing::warn!("Integration {} health check failed: {:?}", name, e),
        }
    }

    // Create service context
    let service_context = Arc::new(ServiceContext::new(&settings, integration_manager));

    // Data files are created lazily too, so a failure here is not fatal
    if let Err(e) = service_context.ensure_storage().await {
        tracing::warn!("Could not prepare data directory {}: {}", settings.storage.data_dir, e);
    }

    let app = api::create_app(service_context, Arc::new(settings.clone()));

    let listener = tokio::net::TcpListener::bind(
        format!("{}:{}", settings.server.host, settings.server.port)
    ).await?;

    tracing::info!("Server listening on {}", settings.server.base_url);

    axum::serve(listener, app).await?;

    Ok(())
}
