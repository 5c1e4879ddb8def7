//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the mood endpoints, the health probe and the
//! master definition for the OpenAPI specification.

use crate::web::{
    music,
    protocol::{
        bad_request, internal_error, parse_limit, parse_range, validate_text, DetectRequest,
        DetectResponse, ErrorResponse, HandlerError, HealthResponse, HistoryQuery,
        HistoryResponse, PlaylistResponse, PlaylistsResponse, PredictionResponse, RangeQuery,
        SessionSummary, TrackResponse, TracksResponse,
    },
    state::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    response::Json,
};
use moodify_core::store::{DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::OpenApi;

pub const SERVICE_NAME: &str = "moodify-api";

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        detect_mood_handler,
        mood_history_handler,
        mood_history_range_handler,
        music::playlists_handler,
        music::tracks_handler,
    ),
    components(
        schemas(
            DetectRequest,
            DetectResponse,
            PredictionResponse,
            HistoryResponse,
            SessionSummary,
            PlaylistsResponse,
            PlaylistResponse,
            TracksResponse,
            TrackResponse,
            HealthResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "mood", description = "Mood detection and history."),
        (name = "music", description = "Playlists and tracks that match a mood.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Health
//=========================================================================================

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

//=========================================================================================
// Mood Handlers
//=========================================================================================

/// Detect the mood of a piece of text and record it as a session.
#[utoipa::path(
    post,
    path = "/api/mood/detect",
    tag = "mood",
    request_body = DetectRequest,
    responses(
        (status = 200, description = "Mood detected and session stored", body = DetectResponse),
        (status = 400, description = "Text missing or outside 1-1000 characters", body = ErrorResponse),
        (status = 500, description = "Classifier or storage failure", body = ErrorResponse)
    )
)]
pub async fn detect_mood_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<DetectRequest>, JsonRejection>,
) -> Result<Json<DetectResponse>, HandlerError> {
    let Json(request) =
        payload.map_err(|e| bad_request(format!("Invalid request body: {}", e.body_text())))?;
    validate_text(&request.text).map_err(bad_request)?;

    match app_state.detector.detect(&request.text).await {
        Ok(detection) => Ok(Json(DetectResponse::from(detection))),
        Err(e) => {
            error!("Failed to detect mood: {:?}", e);
            Err(internal_error("Failed to detect mood"))
        }
    }
}

/// The most recent mood sessions, newest first.
#[utoipa::path(
    get,
    path = "/api/mood/history",
    tag = "mood",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Recent sessions", body = HistoryResponse),
        (status = 400, description = "limit is not an integer in 1-200", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn mood_history_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, HandlerError> {
    let limit = parse_limit(query.limit.as_deref(), DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT)
        .map_err(bad_request)?;

    let sessions = app_state.store.list_recent(limit).await.map_err(|e| {
        error!("Failed to load mood history: {:?}", e);
        internal_error("Failed to fetch mood history")
    })?;
    Ok(Json(HistoryResponse::from_sessions(sessions)))
}

/// Every mood session created within an inclusive date range, newest first.
#[utoipa::path(
    get,
    path = "/api/mood/history/range",
    tag = "mood",
    params(RangeQuery),
    responses(
        (status = 200, description = "Sessions in range", body = HistoryResponse),
        (status = 400, description = "Missing, malformed or reversed dates", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn mood_history_range_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<HistoryResponse>, HandlerError> {
    let (start, end) = parse_range(&query).map_err(bad_request)?;

    let sessions = app_state
        .store
        .list_by_date_range(start, end)
        .await
        .map_err(|e| {
            error!("Failed to load mood history range: {:?}", e);
            internal_error("Failed to fetch mood history")
        })?;
    info!(%start, %end, count = sessions.len(), "Served mood history range");
    Ok(Json(HistoryResponse::from_sessions(sessions)))
}
