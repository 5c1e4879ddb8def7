pub mod catalog;
pub mod detection;
pub mod domain;
pub mod fallback;
pub mod memory;
pub mod ports;
pub mod ranking;
pub mod store;

pub use catalog::{MoodProfile, Recommender};
pub use detection::MoodDetector;
pub use domain::{
    AudioFeatures, CatalogTrack, Detection, Mood, MoodSession, Playlist, Prediction, ScoredMood,
    Track, User,
};
pub use memory::InMemoryBackend;
pub use ports::{
    CatalogService, MoodClassifier, PortError, PortResult, StorageBackend, TrackRanker,
};
pub use ranking::ProfileRanker;
pub use store::SessionStore;
