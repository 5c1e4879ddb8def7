//! crates/moodify_core/src/ranking.rs
//!
//! An in-process `TrackRanker` that scores tracks by cosine similarity
//! between their audio features and the mood's ideal profile.

use async_trait::async_trait;

use crate::catalog::MoodProfile;
use crate::domain::{AudioFeatures, Mood, Track};
use crate::ports::{PortResult, TrackRanker};

#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileRanker;

impl ProfileRanker {
    pub fn new() -> Self {
        Self
    }

    /// Ranks synchronously; ties keep their input order.
    pub fn rank_tracks(&self, mood: Mood, tracks: Vec<Track>) -> Vec<Track> {
        let ideal = MoodProfile::for_mood(mood).ideal;
        let mut scored: Vec<(f64, Track)> = tracks
            .into_iter()
            .map(|mut track| {
                let similarity = cosine_similarity(&feature_vector(&track.features), &ideal);
                track.mood_match_percentage = Some((similarity * 100.0).clamp(0.0, 100.0));
                (similarity, track)
            })
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.into_iter().map(|(_, track)| track).collect()
    }
}

#[async_trait]
impl TrackRanker for ProfileRanker {
    async fn rank(&self, mood: Mood, tracks: Vec<Track>) -> PortResult<Vec<Track>> {
        Ok(self.rank_tracks(mood, tracks))
    }
}

/// Features scaled to roughly 0..1: tempo over 40–200 BPM, loudness over -60–0 dB.
fn feature_vector(features: &AudioFeatures) -> [f64; 7] {
    [
        features.valence,
        features.energy,
        features.danceability,
        features.acousticness,
        features.instrumentalness,
        (features.tempo - 40.0) / 160.0,
        (features.loudness + 60.0) / 60.0,
    ]
}

fn cosine_similarity(a: &[f64; 7], b: &[f64; 7]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str, features: AudioFeatures) -> Track {
        Track {
            id: id.to_string(),
            name: id.to_string(),
            artist: "Artist".to_string(),
            album: "Album".to_string(),
            image_url: None,
            spotify_url: None,
            preview_url: None,
            duration_ms: 200_000,
            features,
            mood_match_percentage: None,
        }
    }

    #[test]
    fn closer_profile_ranks_first() {
        let mellow = AudioFeatures {
            valence: 0.2,
            energy: 0.2,
            danceability: 0.2,
            acousticness: 0.9,
            instrumentalness: 0.6,
            tempo: 70.0,
            loudness: -30.0,
        };
        let banger = AudioFeatures {
            valence: 0.9,
            energy: 1.0,
            danceability: 0.9,
            acousticness: 0.0,
            instrumentalness: 0.0,
            tempo: 170.0,
            loudness: -3.0,
        };

        let ranked = ProfileRanker::new().rank_tracks(
            Mood::Energetic,
            vec![track("mellow", mellow), track("banger", banger)],
        );
        assert_eq!(ranked[0].id, "banger");
        assert_eq!(ranked[1].id, "mellow");

        let calm = ProfileRanker::new().rank_tracks(
            Mood::Calm,
            vec![track("banger", banger), track("mellow", mellow)],
        );
        assert_eq!(calm[0].id, "mellow");
    }

    #[test]
    fn identical_features_keep_input_order_and_get_scores() {
        let features = MoodProfile::for_mood(Mood::Happy).estimated_features();
        let ranked = ProfileRanker::new().rank_tracks(
            Mood::Happy,
            vec![track("a", features), track("b", features), track("c", features)],
        );
        let ids: Vec<&str> = ranked.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        for t in &ranked {
            let score = t.mood_match_percentage.unwrap();
            assert!((0.0..=100.0).contains(&score));
        }
    }

    #[test]
    fn zero_vectors_score_zero() {
        assert_eq!(cosine_similarity(&[0.0; 7], &[0.5; 7]), 0.0);
    }
}
