pub mod music;
pub mod protocol;
pub mod rest;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use music::{playlists_handler, tracks_handler};
pub use rest::{
    detect_mood_handler, health_handler, mood_history_handler, mood_history_range_handler,
};
pub use state::AppState;

/// Builds the API router. CORS and the Swagger UI are layered on by the binary.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/mood/detect", post(detect_mood_handler))
        .route("/api/mood/history", get(mood_history_handler))
        .route("/api/mood/history/range", get(mood_history_range_handler))
        .route("/api/playlists/{mood}", get(playlists_handler))
        .route("/api/tracks/{mood}", get(tracks_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
