//! services/api/src/web/protocol.rs
//!
//! Request and response schemas for the JSON API, plus the boundary
//! validation that runs before any request reaches the core.

use axum::{http::StatusCode, Json};
use chrono::{DateTime, SecondsFormat, Utc};
use moodify_core::domain::{Detection, Mood, MoodSession, Playlist, ScoredMood, Track, MAX_TEXT_CHARS};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

//=========================================================================================
// Errors
//=========================================================================================

/// The body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// What handlers return on failure.
pub type HandlerError = (StatusCode, Json<ErrorResponse>);

pub fn bad_request(message: impl Into<String>) -> HandlerError {
    let error = message.into();
    debug!(%error, "Rejected request");
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error }))
}

pub fn internal_error(message: impl Into<String>) -> HandlerError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

//=========================================================================================
// Mood Detection
//=========================================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct DetectRequest {
    /// Free text describing how the user feels (1-1000 characters).
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PredictionResponse {
    pub mood: String,
    pub confidence: u8,
}

impl From<&ScoredMood> for PredictionResponse {
    fn from(scored: &ScoredMood) -> Self {
        Self {
            mood: scored.mood.to_string(),
            confidence: scored.confidence,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DetectResponse {
    pub mood: String,
    pub confidence: u8,
    pub predictions: Vec<PredictionResponse>,
    #[serde(rename = "sessionId")]
    pub session_id: Uuid,
}

impl From<Detection> for DetectResponse {
    fn from(detection: Detection) -> Self {
        Self {
            mood: detection.mood.to_string(),
            confidence: detection.confidence,
            predictions: detection.predictions.iter().map(PredictionResponse::from).collect(),
            session_id: detection.session_id,
        }
    }
}

pub fn validate_text(text: &str) -> Result<(), String> {
    let chars = text.chars().count();
    if chars == 0 {
        return Err("Text must contain at least 1 character".to_string());
    }
    if chars > MAX_TEXT_CHARS {
        return Err(format!(
            "Text must contain at most {} characters",
            MAX_TEXT_CHARS
        ));
    }
    Ok(())
}

//=========================================================================================
// History
//=========================================================================================

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Number of sessions to return (1-200, default 50).
    #[param(value_type = Option<u32>)]
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RangeQuery {
    /// Inclusive lower bound, RFC 3339.
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    /// Inclusive upper bound, RFC 3339.
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionSummary {
    pub id: Uuid,
    pub mood: String,
    pub confidence: u8,
    /// Creation time, RFC 3339 with millisecond precision.
    pub date: String,
}

impl From<MoodSession> for SessionSummary {
    fn from(session: MoodSession) -> Self {
        Self {
            id: session.id,
            mood: session.mood.to_string(),
            confidence: session.confidence,
            date: session.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HistoryResponse {
    pub sessions: Vec<SessionSummary>,
}

impl HistoryResponse {
    pub fn from_sessions(sessions: Vec<MoodSession>) -> Self {
        Self {
            sessions: sessions.into_iter().map(SessionSummary::from).collect(),
        }
    }
}

/// Parses an optional integer `limit` within `1..=max`.
pub fn parse_limit(raw: Option<&str>, default: usize, max: usize) -> Result<usize, String> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| "limit must be an integer".to_string())?;
    if value < 1 || value > max as i64 {
        return Err(format!("limit must be between 1 and {}", max));
    }
    Ok(value as usize)
}

fn parse_datetime(raw: Option<&str>, name: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.ok_or_else(|| format!("{} is required", name))?;
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| format!("{} must be an ISO 8601 date-time", name))
}

/// Parses and orders the bounds of a history range query.
pub fn parse_range(query: &RangeQuery) -> Result<(DateTime<Utc>, DateTime<Utc>), String> {
    let start = parse_datetime(query.start_date.as_deref(), "startDate")?;
    let end = parse_datetime(query.end_date.as_deref(), "endDate")?;
    if start > end {
        return Err("Start date must be before or equal to end date".to_string());
    }
    Ok((start, end))
}

//=========================================================================================
// Playlists and Tracks
//=========================================================================================

/// Accepts only the six lowercase labels, exactly as written.
pub fn parse_mood(raw: &str) -> Result<Mood, String> {
    Mood::ALL
        .into_iter()
        .find(|mood| mood.as_str() == raw)
        .ok_or_else(|| {
            "Invalid mood. Must be: happy, sad, energetic, calm, angry, or anxious".to_string()
        })
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistResponse {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub track_count: u32,
    pub image_url: Option<String>,
    pub spotify_url: Option<String>,
    pub owner: Option<String>,
    pub mood: String,
}

impl From<Playlist> for PlaylistResponse {
    fn from(playlist: Playlist) -> Self {
        Self {
            id: playlist.id,
            name: playlist.name,
            description: playlist.description,
            track_count: playlist.track_count,
            image_url: playlist.image_url,
            spotify_url: playlist.spotify_url,
            owner: playlist.owner,
            mood: playlist.mood.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlaylistsResponse {
    pub playlists: Vec<PlaylistResponse>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TracksQuery {
    /// Number of tracks to return (1-100, default 30).
    #[param(value_type = Option<u32>)]
    pub limit: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TrackResponse {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub album: String,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(rename = "spotifyUrl")]
    pub spotify_url: Option<String>,
    #[serde(rename = "previewUrl")]
    pub preview_url: Option<String>,
    pub duration_ms: u64,
    pub valence: f64,
    pub energy: f64,
    pub danceability: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub tempo: f64,
    pub loudness: f64,
    pub mood_match_percentage: Option<f64>,
}

impl From<Track> for TrackResponse {
    fn from(track: Track) -> Self {
        Self {
            id: track.id,
            name: track.name,
            artist: track.artist,
            album: track.album,
            image_url: track.image_url,
            spotify_url: track.spotify_url,
            preview_url: track.preview_url,
            duration_ms: track.duration_ms,
            valence: track.features.valence,
            energy: track.features.energy,
            danceability: track.features.danceability,
            acousticness: track.features.acousticness,
            instrumentalness: track.features.instrumentalness,
            tempo: track.features.tempo,
            loudness: track.features.loudness,
            mood_match_percentage: track.mood_match_percentage,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TracksResponse {
    pub tracks: Vec<TrackResponse>,
}

//=========================================================================================
// Health
//=========================================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}
