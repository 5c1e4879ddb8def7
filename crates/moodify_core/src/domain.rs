//! crates/moodify_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Maximum number of characters accepted for a mood detection text.
pub const MAX_TEXT_CHARS: usize = 1000;

/// Maximum number of runner-up moods kept on a session.
pub const MAX_ALTERNATIVE_MOODS: usize = 3;

/// The closed set of moods a text can be classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mood {
    Happy,
    Sad,
    Energetic,
    Calm,
    Angry,
    Anxious,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Energetic,
        Mood::Calm,
        Mood::Angry,
        Mood::Anxious,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Energetic => "energetic",
            Mood::Calm => "calm",
            Mood::Angry => "angry",
            Mood::Anxious => "anxious",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known mood labels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mood label: {0}")]
pub struct UnknownMood(pub String);

impl FromStr for Mood {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "happy" => Ok(Mood::Happy),
            "sad" => Ok(Mood::Sad),
            "energetic" => Ok(Mood::Energetic),
            "calm" => Ok(Mood::Calm),
            "angry" => Ok(Mood::Angry),
            "anxious" => Ok(Mood::Anxious),
            _ => Err(UnknownMood(s.to_string())),
        }
    }
}

/// One immutable record of a single mood detection.
#[derive(Debug, Clone, PartialEq)]
pub struct MoodSession {
    pub id: Uuid,
    pub text: String,
    pub mood: Mood,
    pub confidence: u8,
    /// Runner-up classifications formatted as `"<mood>:<confidence>"`.
    pub alternative_moods: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// A generic account record. Usernames are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password: String,
}

/// A single raw classifier output.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub mood: Mood,
    pub confidence: f64,
}

impl Prediction {
    pub fn new(mood: Mood, confidence: f64) -> Self {
        Self { mood, confidence }
    }

    /// The confidence as an integer percentage.
    pub fn rounded(&self) -> ScoredMood {
        ScoredMood {
            mood: self.mood,
            confidence: round_confidence(self.confidence),
        }
    }
}

/// A prediction whose confidence has been rounded to a whole percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMood {
    pub mood: Mood,
    pub confidence: u8,
}

impl fmt::Display for ScoredMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.mood, self.confidence)
    }
}

/// Rounds half away from zero and clamps into `0..=100`.
pub fn round_confidence(confidence: f64) -> u8 {
    if confidence.is_nan() {
        return 0;
    }
    confidence.round().clamp(0.0, 100.0) as u8
}

/// The outcome of a successful detection, shaped for the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub mood: Mood,
    pub confidence: u8,
    pub predictions: Vec<ScoredMood>,
    pub session_id: Uuid,
}

/// A playlist from the music catalog (or the static fallback table).
#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub track_count: u32,
    pub image_url: Option<String>,
    pub spotify_url: Option<String>,
    pub owner: Option<String>,
    pub mood: Mood,
}

/// Audio attributes used to score how well a track fits a mood.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioFeatures {
    pub valence: f64,
    pub energy: f64,
    pub danceability: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub tempo: f64,
    pub loudness: f64,
}

impl Default for AudioFeatures {
    fn default() -> Self {
        Self {
            valence: 0.5,
            energy: 0.5,
            danceability: 0.5,
            acousticness: 0.5,
            instrumentalness: 0.0,
            tempo: 120.0,
            loudness: -10.0,
        }
    }
}

/// A track as returned by a catalog search, before mood features are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogTrack {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub album: String,
    pub image_url: Option<String>,
    pub spotify_url: Option<String>,
    pub preview_url: Option<String>,
    pub duration_ms: u64,
}

/// A recommended track with its audio features and optional match score.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub album: String,
    pub image_url: Option<String>,
    pub spotify_url: Option<String>,
    pub preview_url: Option<String>,
    pub duration_ms: u64,
    pub features: AudioFeatures,
    pub mood_match_percentage: Option<f64>,
}

impl Track {
    pub fn from_catalog(track: CatalogTrack, features: AudioFeatures) -> Self {
        Self {
            id: track.id,
            name: track.name,
            artist: track.artist,
            album: track.album,
            image_url: track.image_url,
            spotify_url: track.spotify_url,
            preview_url: track.preview_url,
            duration_ms: track.duration_ms,
            features,
            mood_match_percentage: None,
        }
    }
}
