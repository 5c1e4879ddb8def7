//! crates/moodify_core/src/catalog.rs
//!
//! Mood-matched playlist and track recommendations.
//!
//! Catalog and ranker failures never reach the caller: playlists degrade to
//! the static fallback table and tracks degrade to the unranked search
//! results (or an empty list).

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::{AudioFeatures, Mood, Playlist, Track};
use crate::fallback::fallback_playlists;
use crate::ports::{CatalogService, TrackRanker};

/// Most playlists returned for a mood.
pub const MAX_PLAYLISTS: usize = 8;
/// Number of genre queries issued when looking for playlists.
const PLAYLIST_QUERIES: usize = 4;
const PLAYLISTS_PER_QUERY: usize = 5;

/// Default number of tracks returned for a mood.
pub const DEFAULT_TRACK_LIMIT: usize = 30;
/// Largest track limit callers may request.
pub const MAX_TRACK_LIMIT: usize = 100;
const TRACK_QUERIES: usize = 3;
const TRACKS_PER_QUERY: usize = 20;

//=========================================================================================
// Mood Profiles
//=========================================================================================

/// Search vocabulary and target audio features for one mood.
#[derive(Debug, Clone, Copy)]
pub struct MoodProfile {
    pub genres: [&'static str; 6],
    pub valence: Option<f64>,
    pub energy: Option<f64>,
    pub danceability: Option<f64>,
    pub acousticness: Option<f64>,
    pub instrumentalness: Option<f64>,
    pub tempo: Option<f64>,
    pub loudness: Option<f64>,
    /// Ideal normalized feature vector, in `AudioFeatures` field order.
    pub ideal: [f64; 7],
}

const NO_TARGETS: MoodProfile = MoodProfile {
    genres: [""; 6],
    valence: None,
    energy: None,
    danceability: None,
    acousticness: None,
    instrumentalness: None,
    tempo: None,
    loudness: None,
    ideal: [0.5; 7],
};

impl MoodProfile {
    pub fn for_mood(mood: Mood) -> Self {
        match mood {
            Mood::Happy => MoodProfile {
                genres: ["happy hits", "feel good", "good vibes", "upbeat pop", "positive energy", "sunshine"],
                valence: Some(0.8),
                energy: Some(0.7),
                danceability: Some(0.7),
                ideal: [0.8, 0.7, 0.7, 0.3, 0.1, 0.65, 0.5],
                ..NO_TARGETS
            },
            Mood::Sad => MoodProfile {
                genres: ["sad songs", "crying", "heartbreak", "emotional", "melancholy", "depressing"],
                valence: Some(0.3),
                energy: Some(0.4),
                acousticness: Some(0.7),
                ideal: [0.2, 0.3, 0.3, 0.7, 0.2, 0.4, 0.3],
                ..NO_TARGETS
            },
            Mood::Energetic => MoodProfile {
                genres: ["workout", "gym motivation", "beast mode", "high energy", "cardio", "pump up"],
                valence: Some(0.8),
                energy: Some(0.95),
                danceability: Some(0.9),
                tempo: Some(140.0),
                ideal: [0.7, 0.9, 0.8, 0.2, 0.1, 0.8, 0.7],
                ..NO_TARGETS
            },
            Mood::Calm => MoodProfile {
                genres: ["peaceful piano", "calming", "study focus", "relaxing", "meditation", "chill"],
                valence: Some(0.6),
                energy: Some(0.4),
                acousticness: Some(0.8),
                instrumentalness: Some(0.6),
                ideal: [0.5, 0.3, 0.4, 0.7, 0.5, 0.4, 0.3],
                ..NO_TARGETS
            },
            Mood::Angry => MoodProfile {
                genres: ["metal", "rage", "angry workout", "hard rock", "aggressive", "intense"],
                valence: Some(0.3),
                energy: Some(0.95),
                loudness: Some(-2.0),
                ideal: [0.3, 0.9, 0.6, 0.2, 0.1, 0.7, 0.8],
                ..NO_TARGETS
            },
            Mood::Anxious => MoodProfile {
                genres: ["anxiety relief", "calming indie", "stress relief", "peaceful", "soothing", "comfort"],
                valence: Some(0.5),
                energy: Some(0.7),
                tempo: Some(130.0),
                ideal: [0.4, 0.6, 0.5, 0.4, 0.3, 0.6, 0.5],
                ..NO_TARGETS
            },
        }
    }

    /// Catalog queries of the form `"<mood> <genre>"`.
    pub fn search_queries(&self, mood: Mood) -> impl Iterator<Item = String> + '_ {
        self.genres.iter().map(move |genre| format!("{mood} {genre}"))
    }

    /// Features assumed for every track found for this mood.
    pub fn estimated_features(&self) -> AudioFeatures {
        let defaults = AudioFeatures::default();
        AudioFeatures {
            valence: self.valence.unwrap_or(defaults.valence),
            energy: self.energy.unwrap_or(defaults.energy),
            danceability: self.danceability.unwrap_or(defaults.danceability),
            acousticness: self.acousticness.unwrap_or(defaults.acousticness),
            instrumentalness: self.instrumentalness.unwrap_or(defaults.instrumentalness),
            tempo: self.tempo.unwrap_or(defaults.tempo),
            loudness: self.loudness.unwrap_or(defaults.loudness),
        }
    }
}

//=========================================================================================
// Recommender
//=========================================================================================

#[derive(Clone)]
pub struct Recommender {
    catalog: Arc<dyn CatalogService>,
    ranker: Arc<dyn TrackRanker>,
}

impl Recommender {
    pub fn new(catalog: Arc<dyn CatalogService>, ranker: Arc<dyn TrackRanker>) -> Self {
        Self { catalog, ranker }
    }

    /// Between one and `MAX_PLAYLISTS` playlists for `mood`.
    pub async fn playlists_for_mood(&self, mood: Mood) -> Vec<Playlist> {
        let profile = MoodProfile::for_mood(mood);
        let mut seen = HashSet::new();
        let mut playlists = Vec::new();

        for query in profile.search_queries(mood).take(PLAYLIST_QUERIES) {
            match self
                .catalog
                .search_playlists(&query, mood, PLAYLISTS_PER_QUERY)
                .await
            {
                Ok(found) => {
                    for playlist in found {
                        let Some(id) = playlist.id.clone() else {
                            continue;
                        };
                        if seen.insert(id) {
                            playlists.push(playlist);
                        }
                    }
                }
                Err(e) => warn!(query = %query, error = %e, "Playlist search failed"),
            }

            if playlists.len() >= MAX_PLAYLISTS {
                break;
            }
        }

        if playlists.is_empty() {
            debug!(mood = %mood, "Catalog returned no playlists, serving fallback table");
            playlists = fallback_playlists(mood);
        }

        playlists.truncate(MAX_PLAYLISTS);
        playlists
    }

    /// Up to `limit` tracks for `mood`, ranked when the ranker succeeds.
    pub async fn tracks_for_mood(&self, mood: Mood, limit: usize) -> Vec<Track> {
        let profile = MoodProfile::for_mood(mood);
        let features = profile.estimated_features();
        let mut seen = HashSet::new();
        let mut tracks = Vec::new();

        for query in profile.search_queries(mood).take(TRACK_QUERIES) {
            match self.catalog.search_tracks(&query, TRACKS_PER_QUERY).await {
                Ok(found) => {
                    for track in found {
                        if !track.id.is_empty() && seen.insert(track.id.clone()) {
                            tracks.push(Track::from_catalog(track, features));
                        }
                    }
                }
                Err(e) => warn!(query = %query, error = %e, "Track search failed"),
            }
        }

        if tracks.is_empty() {
            return tracks;
        }

        let mut ranked = match self.ranker.rank(mood, tracks.clone()).await {
            Ok(ranked) => ranked,
            Err(e) => {
                warn!(mood = %mood, error = %e, "Track ranking failed, returning unranked tracks");
                tracks
            }
        };
        ranked.truncate(limit);
        ranked
    }
}
