//! services/api/src/adapters/ranker.rs
//!
//! This module contains the adapter for the external track ranking script.
//! It implements the `TrackRanker` port. The script receives the mood label
//! and the tracks as a JSON array and prints `{tracks: [...]}`.

use async_trait::async_trait;
use moodify_core::{
    domain::{AudioFeatures, Mood, Track},
    ports::{PortError, PortResult, TrackRanker},
};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::time::Duration;
use tracing::warn;

use super::process::BoundedCommand;
use crate::config::{ScriptCommand, MAX_PROCESS_OUTPUT_BYTES};

/// An adapter that implements `TrackRanker` by shelling out to a script.
#[derive(Clone, Debug)]
pub struct SubprocessRanker {
    program: String,
    args: Vec<OsString>,
    timeout: Duration,
}

impl SubprocessRanker {
    /// Creates a new `SubprocessRanker`.
    pub fn new(program: impl Into<String>, args: Vec<OsString>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn from_script(command: &ScriptCommand, timeout: Duration) -> Self {
        Self::new(
            command.program.clone(),
            vec![command.script.clone().into_os_string()],
            timeout,
        )
    }
}

//=========================================================================================
// Wire Records
//=========================================================================================

#[derive(Serialize, Deserialize)]
struct TrackRecord {
    id: String,
    name: String,
    artist: String,
    album: String,
    #[serde(rename = "imageUrl")]
    image_url: Option<String>,
    #[serde(rename = "spotifyUrl")]
    spotify_url: Option<String>,
    #[serde(rename = "previewUrl")]
    preview_url: Option<String>,
    duration_ms: u64,
    valence: f64,
    energy: f64,
    danceability: f64,
    acousticness: f64,
    instrumentalness: f64,
    tempo: f64,
    loudness: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mood_match_percentage: Option<f64>,
}

impl TrackRecord {
    fn from_domain(track: &Track) -> Self {
        Self {
            id: track.id.clone(),
            name: track.name.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            image_url: track.image_url.clone(),
            spotify_url: track.spotify_url.clone(),
            preview_url: track.preview_url.clone(),
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

    fn to_domain(self) -> Track {
        Track {
            id: self.id,
            name: self.name,
            artist: self.artist,
            album: self.album,
            image_url: self.image_url,
            spotify_url: self.spotify_url,
            preview_url: self.preview_url,
            duration_ms: self.duration_ms,
            features: AudioFeatures {
                valence: self.valence,
                energy: self.energy,
                danceability: self.danceability,
                acousticness: self.acousticness,
                instrumentalness: self.instrumentalness,
                tempo: self.tempo,
                loudness: self.loudness,
            },
            mood_match_percentage: self.mood_match_percentage,
        }
    }
}

#[derive(Deserialize)]
struct RankerOutput {
    tracks: Option<Vec<TrackRecord>>,
    error: Option<String>,
}

//=========================================================================================
// `TrackRanker` Trait Implementation
//=========================================================================================

#[async_trait]
impl TrackRanker for SubprocessRanker {
    async fn rank(&self, mood: Mood, tracks: Vec<Track>) -> PortResult<Vec<Track>> {
        let records: Vec<TrackRecord> = tracks.iter().map(TrackRecord::from_domain).collect();
        let payload = serde_json::to_string(&records)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let output = self
            .args
            .iter()
            .fold(BoundedCommand::new(self.program.clone()), |cmd, arg| cmd.arg(arg))
            .arg(mood.as_str())
            .arg(payload)
            .with_timeout(self.timeout)
            .with_max_output(MAX_PROCESS_OUTPUT_BYTES)
            .run()
            .await?;

        if !output.status.success() {
            return Err(PortError::Unexpected(format!(
                "Ranker exited with {}: {}",
                output.status,
                output.stderr.trim()
            )));
        }
        if !output.stderr.trim().is_empty() {
            warn!(stderr = %output.stderr.trim(), "Ranker wrote to stderr");
        }

        let parsed: RankerOutput = serde_json::from_slice(&output.stdout)
            .map_err(|e| PortError::Unexpected(format!("Ranker output is not valid JSON: {}", e)))?;
        if let Some(error) = parsed.error {
            return Err(PortError::Unexpected(format!("Ranker reported an error: {}", error)));
        }

        match parsed.tracks {
            Some(ranked) => Ok(ranked.into_iter().map(TrackRecord::to_domain).collect()),
            None => Ok(tracks),
        }
    }
}
