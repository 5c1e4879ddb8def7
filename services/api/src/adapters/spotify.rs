//! services/api/src/adapters/spotify.rs
//!
//! This module contains the adapter for the Spotify Web API.
//! It implements the `CatalogService` port using the client-credentials flow,
//! which only grants access to search.

use async_trait::async_trait;
use moodify_core::{
    domain::{CatalogTrack, Mood, Playlist},
    ports::{CatalogService, PortError, PortResult},
};
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::Config;

/// Tokens are refreshed this long before Spotify says they expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

#[derive(Clone, Debug)]
pub struct SpotifySettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub api_url: String,
    pub auth_url: String,
    pub timeout: Duration,
}

impl SpotifySettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            client_id: config.spotify_client_id.clone(),
            client_secret: config.spotify_client_secret.clone(),
            api_url: config.spotify_api_url.clone(),
            auth_url: config.spotify_auth_url.clone(),
            timeout: config.catalog_timeout,
        }
    }
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// An adapter that implements `CatalogService` against the Spotify search API.
pub struct SpotifyCatalogAdapter {
    client: Client,
    settings: SpotifySettings,
    token: Mutex<Option<CachedToken>>,
}

impl SpotifyCatalogAdapter {
    /// Creates a new `SpotifyCatalogAdapter`.
    ///
    /// Missing credentials are not an error here; every search fails with
    /// `PortError::Unavailable` instead.
    pub fn new(settings: SpotifySettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            client,
            settings,
            token: Mutex::new(None),
        })
    }

    async fn access_token(&self) -> PortResult<String> {
        let (Some(client_id), Some(client_secret)) =
            (&self.settings.client_id, &self.settings.client_secret)
        else {
            return Err(PortError::Unavailable(
                "Spotify credentials are not configured".to_string(),
            ));
        };

        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.access_token.clone());
            }
        }

        debug!("Requesting a new Spotify access token");
        let response = self
            .client
            .post(&self.settings.auth_url)
            .basic_auth(client_id, Some(client_secret))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await
            .map_err(http_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PortError::Unavailable(format!(
                "Failed to get Spotify token: {}",
                status
            )));
        }

        let token: TokenResponse = response.json().await.map_err(http_error)?;
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }

    async fn search(&self, query: &str, kind: &str, limit: usize) -> PortResult<SearchResponse> {
        let token = self.access_token().await?;
        let limit = limit.to_string();

        let response = self
            .client
            .get(format!("{}/search", self.settings.api_url.trim_end_matches('/')))
            .bearer_auth(token)
            .query(&[("q", query), ("type", kind), ("limit", limit.as_str())])
            .send()
            .await
            .map_err(http_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            // Force a fresh token on the next call.
            self.token.lock().await.take();
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PortError::Unavailable(format!(
                "Spotify search for '{}' failed with {}: {}",
                query, status, body
            )));
        }

        response.json().await.map_err(http_error)
    }
}

fn http_error(e: reqwest::Error) -> PortError {
    if e.is_timeout() {
        PortError::Timeout(format!("Spotify request timed out: {}", e))
    } else {
        PortError::Unavailable(format!("Spotify request failed: {}", e))
    }
}

//=========================================================================================
// Wire Records
//=========================================================================================

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Deserialize)]
struct SearchResponse {
    playlists: Option<Page<PlaylistItem>>,
    tracks: Option<Page<TrackItem>>,
}

/// Spotify pads search pages with `null` entries.
#[derive(Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    items: Vec<Option<T>>,
}

#[derive(Deserialize)]
struct Image {
    url: Option<String>,
}

#[derive(Deserialize)]
struct ExternalUrls {
    spotify: Option<String>,
}

#[derive(Deserialize)]
struct Owner {
    display_name: Option<String>,
}

#[derive(Deserialize)]
struct TrackTotal {
    total: Option<u32>,
}

#[derive(Deserialize)]
struct PlaylistItem {
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    tracks: Option<TrackTotal>,
    images: Option<Vec<Image>>,
    external_urls: Option<ExternalUrls>,
    owner: Option<Owner>,
}

impl PlaylistItem {
    fn to_domain(self, mood: Mood) -> Option<Playlist> {
        let id = self.id.filter(|id| !id.is_empty())?;
        Some(Playlist {
            id: Some(id),
            name: self
                .name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "Unnamed Playlist".to_string()),
            description: self.description.unwrap_or_default(),
            track_count: self.tracks.and_then(|t| t.total).unwrap_or(0),
            image_url: first_image(self.images),
            spotify_url: self.external_urls.and_then(|u| u.spotify),
            owner: self.owner.and_then(|o| o.display_name),
            mood,
        })
    }
}

#[derive(Deserialize)]
struct Artist {
    name: Option<String>,
}

#[derive(Deserialize)]
struct Album {
    name: Option<String>,
    images: Option<Vec<Image>>,
}

#[derive(Deserialize)]
struct TrackItem {
    id: Option<String>,
    name: Option<String>,
    artists: Option<Vec<Artist>>,
    album: Option<Album>,
    external_urls: Option<ExternalUrls>,
    preview_url: Option<String>,
    duration_ms: Option<u64>,
}

impl TrackItem {
    fn to_domain(self) -> Option<CatalogTrack> {
        let id = self.id.filter(|id| !id.is_empty())?;
        let artist = self
            .artists
            .and_then(|artists| artists.into_iter().next())
            .and_then(|a| a.name)
            .unwrap_or_else(|| "Unknown Artist".to_string());
        let (album, image_url) = match self.album {
            Some(album) => (album.name, first_image(album.images)),
            None => (None, None),
        };
        Some(CatalogTrack {
            id,
            name: self.name.unwrap_or_else(|| "Unknown Track".to_string()),
            artist,
            album: album.unwrap_or_else(|| "Unknown Album".to_string()),
            image_url,
            spotify_url: self.external_urls.and_then(|u| u.spotify),
            preview_url: self.preview_url,
            duration_ms: self.duration_ms.unwrap_or(0),
        })
    }
}

fn first_image(images: Option<Vec<Image>>) -> Option<String> {
    images?
        .into_iter()
        .filter_map(|image| image.url.filter(|url| !url.is_empty()))
        .next()
}

//=========================================================================================
// `CatalogService` Trait Implementation
//=========================================================================================

#[async_trait]
impl CatalogService for SpotifyCatalogAdapter {
    async fn search_playlists(
        &self,
        query: &str,
        mood: Mood,
        limit: usize,
    ) -> PortResult<Vec<Playlist>> {
        let response = self.search(query, "playlist", limit).await?;
        Ok(response
            .playlists
            .map(|page| page.items)
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .filter_map(|item| item.to_domain(mood))
            .collect())
    }

    async fn search_tracks(&self, query: &str, limit: usize) -> PortResult<Vec<CatalogTrack>> {
        let response = self.search(query, "track", limit).await?;
        Ok(response
            .tracks
            .map(|page| page.items)
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .filter_map(TrackItem::to_domain)
            .collect())
    }
}
