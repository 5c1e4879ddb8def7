//! crates/moodify_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases,
//! subprocesses or HTTP APIs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{CatalogTrack, Mood, MoodSession, Playlist, Prediction, Track, User};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Operation timed out: {0}")]
    Timeout(String),
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Storage primitive behind the session store.
///
/// Implementations only need to make each single insert or scan atomic; ids
/// and timestamps are assigned by the caller.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    // --- Mood Sessions ---
    async fn insert_session(&self, session: MoodSession) -> PortResult<()>;

    /// Returns at most `limit` sessions ordered by `created_at` descending.
    async fn scan_recent(&self, limit: usize) -> PortResult<Vec<MoodSession>>;

    /// Returns every session with `start <= created_at <= end`, newest first.
    async fn scan_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> PortResult<Vec<MoodSession>>;

    // --- Users ---
    /// Fails with `PortError::Conflict` if the username is taken.
    async fn insert_user(&self, user: User) -> PortResult<()>;

    async fn find_user(&self, id: Uuid) -> PortResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> PortResult<Option<User>>;
}

#[async_trait]
pub trait MoodClassifier: Send + Sync {
    /// Classifies free text into predictions ranked by confidence, highest first.
    async fn classify(&self, text: &str) -> PortResult<Vec<Prediction>>;
}

#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Searches the catalog for playlists matching a free-text query.
    async fn search_playlists(
        &self,
        query: &str,
        mood: Mood,
        limit: usize,
    ) -> PortResult<Vec<Playlist>>;

    /// Searches the catalog for tracks matching a free-text query.
    async fn search_tracks(&self, query: &str, limit: usize) -> PortResult<Vec<CatalogTrack>>;
}

#[async_trait]
pub trait TrackRanker: Send + Sync {
    /// Reorders and scores tracks by how well they fit `mood`.
    async fn rank(&self, mood: Mood, tracks: Vec<Track>) -> PortResult<Vec<Track>>;
}
