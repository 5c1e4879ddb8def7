//! services/api/src/bin/api.rs

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use axum::Router;
use moodify_api::{
    adapters::{DbAdapter, SpotifyCatalogAdapter, SpotifySettings, SubprocessClassifier, SubprocessRanker},
    config::Config,
    error::ApiError,
    web::{build_router, rest::ApiDoc, AppState},
};
use moodify_core::{
    ports::{StorageBackend, TrackRanker},
    InMemoryBackend, ProfileRanker,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Choose the Storage Backend ---
    let backend: Arc<dyn StorageBackend> = match &config.database_url {
        Some(database_url) => {
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;
            let db_adapter = DbAdapter::new(db_pool);
            info!("Running database migrations...");
            db_adapter.run_migrations().await?;
            info!("Database migrations complete.");
            Arc::new(db_adapter)
        }
        None => {
            warn!("DATABASE_URL is not set; mood sessions are kept in memory only");
            Arc::new(InMemoryBackend::new())
        }
    };

    // --- 3. Initialize Service Adapters ---
    let classifier = Arc::new(SubprocessClassifier::from_script(
        &config.classifier,
        config.classifier_timeout,
    ));

    let ranker: Arc<dyn TrackRanker> = match &config.ranker {
        Some(script) => {
            info!(script = %script.script.display(), "Ranking tracks with an external script");
            Arc::new(SubprocessRanker::from_script(script, config.ranker_timeout))
        }
        None => Arc::new(ProfileRanker::new()),
    };

    if config.spotify_client_id.is_none() || config.spotify_client_secret.is_none() {
        warn!("Spotify credentials are not set; playlists come from the fallback table");
    }
    let catalog = Arc::new(
        SpotifyCatalogAdapter::new(SpotifySettings::from_config(&config))
            .map_err(|e| ApiError::Internal(format!("Failed to build HTTP client: {}", e)))?,
    );

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(backend, classifier, catalog, ranker));

    let origin = config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!("Invalid CORS origin '{}': {}", config.cors_origin, e))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    let app = Router::new()
        .merge(build_router(app_state).layer(cors))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
