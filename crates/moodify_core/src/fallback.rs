//! crates/moodify_core/src/fallback.rs
//!
//! Hand-curated playlists served when the catalog is unreachable or finds nothing.

use crate::domain::{Mood, Playlist};

struct Entry {
    id: Option<&'static str>,
    name: &'static str,
    description: &'static str,
    track_count: u32,
    image_url: Option<&'static str>,
    owner: Option<&'static str>,
}

const fn listed(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    track_count: u32,
    image_url: &'static str,
    owner: &'static str,
) -> Entry {
    Entry {
        id: Some(id),
        name,
        description,
        track_count,
        image_url: Some(image_url),
        owner: Some(owner),
    }
}

const fn unlisted(name: &'static str, description: &'static str, track_count: u32) -> Entry {
    Entry {
        id: None,
        name,
        description,
        track_count,
        image_url: None,
        owner: None,
    }
}

const HAPPY: [Entry; 8] = [
    listed("37i9dQZF1DXdPec7aLTmlC", "Happy Hits!", "Hits to boost your mood and fill you with happiness!", 100, "https://i.scdn.co/image/ab67706f00000002d073e656e546e43bc387ad79", "Spotify"),
    listed("0okKcRyYEwq8guFxzAPtlB", "Mood Booster 2025", "Positive Vibes, Happy Music to boost your mood", 227, "https://i.scdn.co/image/ab67706c0000da84c8be8e7f4b785e7fb5e1a6ed", "Various"),
    listed("7jgspZkQqGrrfd2Q7lP3BR", "Good Vibes 2025", "Happy mood playlist for positive energy", 75, "https://i.scdn.co/image/ab67706c0000da84aa5d22dccf238f19c1c8e1e4", "Bloomy Vibes"),
    listed("3wjXa8HLzk1l1WXBLhiwHJ", "Happy Songs 2024", "Sweet Pop Hits to brighten your day", 150, "https://i.scdn.co/image/ab67706c0000da84a6c24e8ad0e7ae6dd2c1c91f", "Various"),
    listed("2XLDEbpTJQYWY4jfLMAnli", "Happy Music That Makes You Smile", "Upbeat songs to lift your spirits", 125, "https://i.scdn.co/image/ab67706c0000da8454be76a45c0e30bd7ec8c5ed", "Various"),
    listed("7s09coXLGbofhNrwSusr4G", "Happy Songs 2025", "Good Vibes and Upbeat Music", 180, "https://i.scdn.co/image/ab67706c0000da845a87c6f5c1cfe0e1e9f6f6e1", "Various"),
    listed("61TLS6gJKXeNzTG0N6e0qT", "Good Mood", "Summer vibes and feel-good tracks", 148, "https://i.scdn.co/image/ab67706c0000da84b8c5e7f4b6f5e7fb5e1a6ed3", "PLAYLISTS MUSIQUE"),
    unlisted("Sunshine Pop", "Sunny melodies to lift your spirits", 38),
];

const SAD: [Entry; 8] = [
    listed("37i9dQZF1DX7qK8ma5wgG1", "Sad Songs", "Beautiful songs for when you need a good cry", 200, "https://i.scdn.co/image/ab67706f00000002c57e96bc2f01d923188c62d1", "Spotify"),
    listed("7ABD15iASBIpPP5uJ5awvq", "sad songs / crying mood", "For when you're in your feelings", 120, "https://i.scdn.co/image/ab67706c0000da84c5e7f4b6f5e7fb5e1a6ed378", "indiemono"),
    listed("3c0Nv5CY6TIaRszlTZbUFk", "sad songs 2025", "crying and depressing music", 95, "https://i.scdn.co/image/ab67706c0000da84d8be8e7f4b785e7fb5e1a6ec", "Various"),
    listed("3Ar6l24242VBGny7S9VxcD", "Sad Songs", "Break up bops from Mimi Webb, Lewis Capaldi, Gracie Abrams", 40, "https://i.scdn.co/image/ab67706c0000da84a8c6f5c1cfe0e1e9f6f6e145", "Double J Music"),
    listed("6yYA6aUGp8qUTgQWWYkPkP", "crying myself to sleep", "sad songs for late night feels", 88, "https://i.scdn.co/image/ab67706c0000da84e7f4b6f5e7fb5e1a6ed37890", "Various"),
    listed("5cgJVFFgOrWxQzHYKwZM4Z", "50 Beautifully Sad Songs", "Curated by NME", 50, "https://i.scdn.co/image/ab67706c0000da84f4b6f5e7fb5e1a6ed37891a2", "NME"),
    listed("3gbChjZHVhGtGlPrn3CLoo", "Sad, Melancholic Classical Music", "Beautiful classical pieces", 65, "https://i.scdn.co/image/ab67706c0000da84b6f5e7fb5e1a6ed37891a2c3", "HalidonMusic"),
    listed("4WloBZWLuV80F07SCPxs09", "Sad songs that will make you cry", "Depressing Music", 75, "https://i.scdn.co/image/ab67706c0000da84c5e7fb5e1a6ed37891a2c3d4", "Various"),
];

const ENERGETIC: [Entry; 8] = [
    listed("37i9dQZF1EIeLflS1D0w73", "High Energy Workout Mix", "Intense beats to power your workout", 80, "https://i.scdn.co/image/ab67706f00000002e7fb5e1a6ed37891a2c3d4e5", "Spotify"),
    listed("71z6BdHlnfNj4DKRhuu1Fk", "RAGE EDM WORKOUT MOTIVATION", "High energy EDM for intense workouts", 120, "https://i.scdn.co/image/ab67706c0000da84fb5e1a6ed37891a2c3d4e5f6", "Various"),
    listed("37i9dQZF1EIcpc1Z28flXB", "Angry Workout Mix", "Aggressive beats for maximum intensity", 50, "https://i.scdn.co/image/ab67706c0000da841a6ed37891a2c3d4e5f6g7h8", "Spotify"),
    listed("6qyddMIaCG8LTLce04fcR3", "Energy Music", "GYM & Workout Energy, High BPM EDM", 95, "https://i.scdn.co/image/ab67706c0000da84ed37891a2c3d4e5f6g7h8i9j", "Various"),
    unlisted("Beast Mode", "Intense beats to push your limits", 55),
    unlisted("Rock Your Run", "Hard-hitting rock for maximum power", 52),
    unlisted("Hip-Hop Hustle", "Motivational rap to keep you moving", 45),
    unlisted("Cardio Beats", "Perfect tempo for running and cardio", 58),
];

const CALM: [Entry; 8] = [
    listed("37i9dQZF1DWZqd5JICZI0u", "Peaceful Piano", "Relax and indulge with beautiful piano pieces", 200, "https://i.scdn.co/image/ab67706f00000002c8be8e7f4b785e7fb5e1a6ed", "Spotify"),
    listed("37i9dQZF1DX4sWSpwq3LiO", "Peaceful Guitar", "Beautiful guitar pieces for relaxation", 150, "https://i.scdn.co/image/ab67706f00000002d8be8e7f4b785e7fb5e1a6ee", "Spotify"),
    listed("37i9dQZF1DWXe9gFZP0gtP", "Deep Focus", "Keep calm and focus with ambient music", 250, "https://i.scdn.co/image/ab67706f00000002e8be8e7f4b785e7fb5e1a6ef", "Spotify"),
    unlisted("Ambient Soundscapes", "Atmospheric music for deep calm", 35),
    unlisted("Meditation Music", "Tranquil sounds for mindfulness practice", 40),
    unlisted("Chill Instrumental", "Relaxing instrumentals without distraction", 44),
    unlisted("Study Focus", "Calming background music for concentration", 48),
    unlisted("Sleep Sounds", "Ultra-calm tracks for winding down", 36),
];

const ANGRY: [Entry; 8] = [
    listed("37i9dQZF1DX1tyCD9QhIWF", "Metal Essentials", "The heaviest tracks in metal", 100, "https://i.scdn.co/image/ab67706f00000002f8be8e7f4b785e7fb5e1a6f0", "Spotify"),
    listed("37i9dQZF1DX6bnKNtzGZtP", "Rage Beats", "Angry anthems and aggressive sounds", 85, "https://i.scdn.co/image/ab67706f00000002g8be8e7f4b785e7fb5e1a6f1", "Spotify"),
    unlisted("Punk Fury", "Raw punk energy for venting frustration", 38),
    unlisted("Hard Rock Rage", "Heavy riffs and powerful vocals", 42),
    unlisted("Angry Rap", "Aggressive hip-hop with fierce lyrics", 37),
    unlisted("Scream Therapy", "Screamo and hardcore for maximum release", 41),
    unlisted("Thrash & Burn", "Fast and furious thrash metal", 39),
    unlisted("Industrial Aggression", "Dark industrial sounds for raw emotion", 36),
];

const ANXIOUS: [Entry; 8] = [
    listed("7kpASFjxLZhooMB726kkk1", "Anti-Anxiety Playlist", "Music to ease anxious feelings", 45, "https://i.scdn.co/image/ab67706c0000da84h8be8e7f4b785e7fb5e1a6f2", "Relax & Relax"),
    listed("37i9dQZF1DX3Ogo9pFvBkY", "Calming Acoustic", "Peaceful acoustic songs to ease your mind", 90, "https://i.scdn.co/image/ab67706f00000002i8be8e7f4b785e7fb5e1a6f3", "Spotify"),
    unlisted("Grounding Indie", "Indie tracks to help you feel present", 38),
    unlisted("Calming Alternative", "Alternative music for nervous energy", 40),
    unlisted("Breathing Room", "Electronic ambience to quiet your mind", 36),
    unlisted("Soothing Vocals", "Comforting voices to ease worry", 42),
    unlisted("Mindful Moments", "Music for anxiety management", 37),
    unlisted("Stress Release", "Gentle rhythms to lower tension", 39),
];

/// The static playlist table for `mood`.
pub fn fallback_playlists(mood: Mood) -> Vec<Playlist> {
    let entries: &[Entry] = match mood {
        Mood::Happy => &HAPPY,
        Mood::Sad => &SAD,
        Mood::Energetic => &ENERGETIC,
        Mood::Calm => &CALM,
        Mood::Angry => &ANGRY,
        Mood::Anxious => &ANXIOUS,
    };

    entries
        .iter()
        .map(|entry| Playlist {
            id: entry.id.map(str::to_string),
            name: entry.name.to_string(),
            description: entry.description.to_string(),
            track_count: entry.track_count,
            image_url: entry.image_url.map(str::to_string),
            spotify_url: entry
                .id
                .map(|id| format!("https://open.spotify.com/playlist/{id}")),
            owner: entry.owner.map(str::to_string),
            mood,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mood_has_eight_fallback_playlists() {
        for mood in Mood::ALL {
            let playlists = fallback_playlists(mood);
            assert_eq!(playlists.len(), 8, "{mood}");
            assert!(playlists.iter().all(|p| p.mood == mood));
        }
    }

    #[test]
    fn listed_entries_link_to_their_catalog_page() {
        let calm = fallback_playlists(Mood::Calm);
        assert_eq!(
            calm[0].spotify_url.as_deref(),
            Some("https://open.spotify.com/playlist/37i9dQZF1DWZqd5JICZI0u")
        );
        assert!(calm[7].id.is_none());
        assert!(calm[7].spotify_url.is_none());
    }
}
