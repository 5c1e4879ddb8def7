//! services/api/src/web/music.rs
//!
//! Handlers for mood-matched playlists and tracks. Catalog outages degrade
//! inside the recommender, so these only fail on bad input.

use crate::web::{
    protocol::{
        bad_request, parse_limit, parse_mood, ErrorResponse, HandlerError, PlaylistResponse,
        PlaylistsResponse, TrackResponse, TracksQuery, TracksResponse,
    },
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use moodify_core::catalog::{DEFAULT_TRACK_LIMIT, MAX_TRACK_LIMIT};
use std::sync::Arc;
use tracing::info;

/// Playlists matching a mood.
#[utoipa::path(
    get,
    path = "/api/playlists/{mood}",
    tag = "music",
    params(("mood" = String, Path, description = "One of happy, sad, energetic, calm, angry, anxious.")),
    responses(
        (status = 200, description = "Between one and eight playlists", body = PlaylistsResponse),
        (status = 400, description = "Unknown mood", body = ErrorResponse)
    )
)]
pub async fn playlists_handler(
    State(app_state): State<Arc<AppState>>,
    Path(mood): Path<String>,
) -> Result<Json<PlaylistsResponse>, HandlerError> {
    let mood = parse_mood(&mood).map_err(bad_request)?;

    let playlists = app_state.recommender.playlists_for_mood(mood).await;
    info!(%mood, count = playlists.len(), "Served playlists");
    Ok(Json(PlaylistsResponse {
        playlists: playlists.into_iter().map(PlaylistResponse::from).collect(),
    }))
}

/// Tracks matching a mood, best match first.
#[utoipa::path(
    get,
    path = "/api/tracks/{mood}",
    tag = "music",
    params(
        ("mood" = String, Path, description = "One of happy, sad, energetic, calm, angry, anxious."),
        TracksQuery
    ),
    responses(
        (status = 200, description = "Up to `limit` tracks, possibly none", body = TracksResponse),
        (status = 400, description = "Unknown mood or invalid limit", body = ErrorResponse)
    )
)]
pub async fn tracks_handler(
    State(app_state): State<Arc<AppState>>,
    Path(mood): Path<String>,
    Query(query): Query<TracksQuery>,
) -> Result<Json<TracksResponse>, HandlerError> {
    let mood = parse_mood(&mood).map_err(bad_request)?;
    let limit = parse_limit(query.limit.as_deref(), DEFAULT_TRACK_LIMIT, MAX_TRACK_LIMIT)
        .map_err(bad_request)?;

    let tracks = app_state.recommender.tracks_for_mood(mood, limit).await;
    info!(%mood, count = tracks.len(), "Served tracks");
    Ok(Json(TracksResponse {
        tracks: tracks.into_iter().map(TrackResponse::from).collect(),
    }))
}
