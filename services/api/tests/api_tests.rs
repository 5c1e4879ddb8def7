//! Router-level tests for the Moodify API.
//!
//! Every test builds the real router over the in-memory store with stubbed
//! classifier and catalog ports, then drives it with `oneshot`.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use moodify_api::web::{build_router, AppState};
use moodify_core::{
    ports::{CatalogService, MoodClassifier, PortError, PortResult},
    CatalogTrack, InMemoryBackend, Mood, Playlist, Prediction, ProfileRanker,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

//=========================================================================================
// Stub Ports
//=========================================================================================

/// Returns the same ranking for any text, or fails when `predictions` is empty.
struct StubClassifier {
    predictions: Vec<Prediction>,
}

#[async_trait]
impl MoodClassifier for StubClassifier {
    async fn classify(&self, _text: &str) -> PortResult<Vec<Prediction>> {
        if self.predictions.is_empty() {
            return Err(PortError::Unexpected("model not loaded".to_string()));
        }
        Ok(self.predictions.clone())
    }
}

/// A catalog that either serves fixed results or is unreachable.
struct StubCatalog {
    available: bool,
}

#[async_trait]
impl CatalogService for StubCatalog {
    async fn search_playlists(
        &self,
        query: &str,
        mood: Mood,
        _limit: usize,
    ) -> PortResult<Vec<Playlist>> {
        if !self.available {
            return Err(PortError::Unavailable("catalog offline".to_string()));
        }
        // Every query returns the same two playlists, so results must be de-duplicated.
        Ok(["p1", "p2"]
            .iter()
            .map(|id| Playlist {
                id: Some(id.to_string()),
                name: format!("{query} {id}"),
                description: String::new(),
                track_count: 25,
                image_url: None,
                spotify_url: Some(format!("https://open.spotify.com/playlist/{id}")),
                owner: Some("moodify".to_string()),
                mood,
            })
            .collect())
    }

    async fn search_tracks(&self, _query: &str, limit: usize) -> PortResult<Vec<CatalogTrack>> {
        if !self.available {
            return Err(PortError::Unavailable("catalog offline".to_string()));
        }
        Ok((0..limit)
            .map(|i| CatalogTrack {
                id: format!("t{i}"),
                name: format!("Track {i}"),
                artist: "Artist".to_string(),
                album: "Album".to_string(),
                image_url: None,
                spotify_url: None,
                preview_url: None,
                duration_ms: 180_000,
            })
            .collect())
    }
}

//=========================================================================================
// Helpers
//=========================================================================================

fn anxious_predictions() -> Vec<Prediction> {
    vec![
        Prediction::new(Mood::Anxious, 70.0),
        Prediction::new(Mood::Sad, 20.0),
        Prediction::new(Mood::Calm, 10.0),
    ]
}

fn setup_app_with(predictions: Vec<Prediction>, catalog_available: bool) -> Router {
    let state = AppState::new(
        Arc::new(InMemoryBackend::new()),
        Arc::new(StubClassifier { predictions }),
        Arc::new(StubCatalog {
            available: catalog_available,
        }),
        Arc::new(ProfileRanker::new()),
    );
    build_router(Arc::new(state))
}

fn setup_app() -> Router {
    setup_app_with(anxious_predictions(), true)
}

fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let body = serde_json::from_slice(&bytes).expect("Should parse JSON");
    (status, body)
}

async fn detect(app: &Router, text: &str) -> Value {
    let (status, body) = send(app, json_request("/api/mood/detect", json!({ "text": text }))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body
}

//=========================================================================================
// Health
//=========================================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (status, body) = send(&setup_app(), test_request("GET", "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "moodify-api");
    assert!(body["version"].is_string());
}

//=========================================================================================
// Mood Detection
//=========================================================================================

#[tokio::test]
async fn test_detect_returns_primary_mood_and_ranking() {
    let app = setup_app();
    let body = detect(&app, "I feel stressed and overwhelmed").await;

    assert_eq!(body["mood"], "anxious");
    assert_eq!(body["confidence"], 70);
    assert_eq!(
        body["predictions"],
        json!([
            { "mood": "anxious", "confidence": 70 },
            { "mood": "sad", "confidence": 20 },
            { "mood": "calm", "confidence": 10 }
        ])
    );
    assert!(body["sessionId"].is_string());
}

#[tokio::test]
async fn test_detected_session_appears_first_in_history() {
    let app = setup_app();
    detect(&app, "first").await;
    let latest = detect(&app, "second").await;

    let (status, body) = send(&app, test_request("GET", "/api/mood/history")).await;
    assert_eq!(status, StatusCode::OK);
    let sessions = body["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0]["id"], latest["sessionId"]);
    assert_eq!(sessions[0]["mood"], "anxious");
    assert_eq!(sessions[0]["confidence"], 70);
    assert!(sessions[0]["date"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_detect_rejects_invalid_text() {
    let app = setup_app();

    let (status, body) = send(&app, json_request("/api/mood/detect", json!({ "text": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let too_long = "a".repeat(1001);
    let (status, _) = send(&app, json_request("/api/mood/detect", json!({ "text": too_long }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, json_request("/api/mood/detect", json!({ "message": "hi" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, json_request("/api/mood/detect", json!({ "text": 42 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was stored by the rejected requests.
    let (_, body) = send(&app, test_request("GET", "/api/mood/history")).await;
    assert_eq!(body["sessions"], json!([]));
}

#[tokio::test]
async fn test_detect_accepts_exactly_1000_characters() {
    let app = setup_app();
    let (status, _) = send(
        &app,
        json_request("/api/mood/detect", json!({ "text": "a".repeat(1000) })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_classifier_failure_is_a_500_and_stores_nothing() {
    let app = setup_app_with(Vec::new(), true);

    let (status, body) =
        send(&app, json_request("/api/mood/detect", json!({ "text": "hello" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to detect mood");

    let (_, body) = send(&app, test_request("GET", "/api/mood/history")).await;
    assert_eq!(body["sessions"], json!([]));
}

//=========================================================================================
// History
//=========================================================================================

#[tokio::test]
async fn test_history_limit_is_applied_and_validated() {
    let app = setup_app();
    for i in 0..3 {
        detect(&app, &format!("entry {i}")).await;
    }

    let (status, body) = send(&app, test_request("GET", "/api/mood/history?limit=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sessions"].as_array().unwrap().len(), 2);

    for bad in ["0", "201", "abc", "1.5"] {
        let uri = format!("/api/mood/history?limit={bad}");
        let (status, body) = send(&app, test_request("GET", &uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "limit={bad}");
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_history_range_is_inclusive() {
    let app = setup_app();
    let detected = detect(&app, "checking in").await;

    let (_, history) = send(&app, test_request("GET", "/api/mood/history")).await;
    let date = history["sessions"][0]["date"].as_str().unwrap().to_string();

    let uri = format!("/api/mood/history/range?startDate={date}&endDate={date}");
    let (status, body) = send(&app, test_request("GET", &uri)).await;
    assert_eq!(status, StatusCode::OK);
    let sessions = body["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["id"], detected["sessionId"]);

    let (status, body) = send(
        &app,
        test_request(
            "GET",
            "/api/mood/history/range?startDate=2000-01-01T00:00:00Z&endDate=2000-01-02T00:00:00Z",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sessions"], json!([]));
}

#[tokio::test]
async fn test_history_range_accepts_offset_bounds() {
    let app = setup_app();
    let detected = detect(&app, "checking in").await;

    let (_, history) = send(&app, test_request("GET", "/api/mood/history")).await;
    let date = history["sessions"][0]["date"].as_str().unwrap().to_string();
    let created = chrono::DateTime::parse_from_rfc3339(&date).unwrap();

    // The same instants expressed at +02:00 and -05:00; `+` must be percent-encoded.
    let start = created
        .with_timezone(&chrono::FixedOffset::east_opt(2 * 3600).unwrap())
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, false)
        .replace('+', "%2B");
    let end = created
        .with_timezone(&chrono::FixedOffset::west_opt(5 * 3600).unwrap())
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, false);

    let uri = format!("/api/mood/history/range?startDate={start}&endDate={end}");
    let (status, body) = send(&app, test_request("GET", &uri)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let sessions = body["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["id"], detected["sessionId"]);

    // One millisecond past the session, written with an offset, excludes it.
    let after = (created + chrono::Duration::milliseconds(1))
        .with_timezone(&chrono::FixedOffset::west_opt(5 * 3600).unwrap())
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, false);
    let uri = format!("/api/mood/history/range?startDate={after}&endDate={after}");
    let (status, body) = send(&app, test_request("GET", &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sessions"], json!([]));
}

#[tokio::test]
async fn test_history_range_rejects_bad_dates() {
    let app = setup_app();

    let (status, body) = send(
        &app,
        test_request(
            "GET",
            "/api/mood/history/range?startDate=2025-02-01T00:00:00Z&endDate=2025-01-01T00:00:00Z",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Start date must be before or equal to end date");

    let (status, _) = send(
        &app,
        test_request("GET", "/api/mood/history/range?startDate=2025-01-01T00:00:00Z"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        test_request(
            "GET",
            "/api/mood/history/range?startDate=last-week&endDate=2025-01-01T00:00:00Z",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

//=========================================================================================
// Playlists and Tracks
//=========================================================================================

#[tokio::test]
async fn test_playlists_are_deduplicated_and_tagged_with_the_mood() {
    let (status, body) = send(&setup_app(), test_request("GET", "/api/playlists/happy")).await;

    assert_eq!(status, StatusCode::OK);
    let playlists = body["playlists"].as_array().unwrap();
    assert_eq!(playlists.len(), 2);
    assert_eq!(playlists[0]["id"], "p1");
    assert_eq!(playlists[0]["trackCount"], 25);
    assert_eq!(playlists[0]["mood"], "happy");
    assert!(playlists[0].get("spotifyUrl").is_some());
}

#[tokio::test]
async fn test_playlists_fall_back_when_the_catalog_is_down() {
    let app = setup_app_with(anxious_predictions(), false);

    for mood in ["happy", "sad", "energetic", "calm", "angry", "anxious"] {
        let (status, body) = send(&app, test_request("GET", &format!("/api/playlists/{mood}"))).await;
        assert_eq!(status, StatusCode::OK);
        let playlists = body["playlists"].as_array().unwrap();
        assert!(!playlists.is_empty() && playlists.len() <= 8, "{mood}");
        assert!(playlists.iter().all(|p| p["mood"] == mood));
    }
}

#[tokio::test]
async fn test_unknown_mood_is_rejected() {
    let app = setup_app();
    for uri in ["/api/playlists/bored", "/api/tracks/bored"] {
        let (status, body) = send(&app, test_request("GET", uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Invalid mood. Must be: happy, sad, energetic, calm, angry, or anxious"
        );
    }
}

#[tokio::test]
async fn test_mood_labels_must_match_exactly() {
    let app = setup_app();
    for uri in [
        "/api/playlists/HAPPY",
        "/api/playlists/%20calm%20",
        "/api/tracks/Sad",
        "/api/tracks/ANXIOUS?limit=5",
    ] {
        let (status, body) = send(&app, test_request("GET", uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_tracks_are_ranked_and_limited() {
    let app = setup_app();

    let (status, body) = send(&app, test_request("GET", "/api/tracks/calm?limit=5")).await;
    assert_eq!(status, StatusCode::OK);
    let tracks = body["tracks"].as_array().unwrap();
    assert_eq!(tracks.len(), 5);
    for track in tracks {
        let score = track["mood_match_percentage"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&score));
        assert!(track["duration_ms"].is_u64());
        assert!(track.get("previewUrl").is_some());
    }

    let (_, body) = send(&app, test_request("GET", "/api/tracks/calm")).await;
    // Three queries of twenty share ids, so twenty unique tracks remain.
    assert_eq!(body["tracks"].as_array().unwrap().len(), 20);

    let (status, _) = send(&app, test_request("GET", "/api/tracks/calm?limit=101")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tracks_are_empty_when_the_catalog_is_down() {
    let app = setup_app_with(anxious_predictions(), false);
    let (status, body) = send(&app, test_request("GET", "/api/tracks/sad")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tracks"], json!([]));
}
