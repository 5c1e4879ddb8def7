//! crates/moodify_core/src/store.rs
//!
//! The session store: the single shared record of every mood detection.
//! It owns id and timestamp assignment and delegates persistence to an
//! injected `StorageBackend`.

use chrono::{DateTime, SubsecRound, Utc};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{Mood, MoodSession, User};
use crate::ports::{PortResult, StorageBackend};

/// Default number of sessions returned by `list_recent` callers.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Largest `limit` callers may request from `list_recent`.
pub const MAX_HISTORY_LIMIT: usize = 200;

/// A cheap, cloneable handle over the storage backend.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn StorageBackend>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Records a new detection with a fresh id and the current time.
    pub async fn create_session(
        &self,
        text: &str,
        mood: Mood,
        confidence: u8,
        alternative_moods: Vec<String>,
    ) -> PortResult<MoodSession> {
        let session = MoodSession {
            id: Uuid::new_v4(),
            text: text.to_string(),
            mood,
            confidence,
            alternative_moods,
            // Millisecond precision so dates echoed back by clients hit range bounds exactly.
            created_at: Utc::now().trunc_subsecs(3),
        };
        self.backend.insert_session(session.clone()).await?;
        debug!(session_id = %session.id, mood = %session.mood, "Stored mood session");
        Ok(session)
    }

    /// Returns at most `limit` sessions, newest first.
    pub async fn list_recent(&self, limit: usize) -> PortResult<Vec<MoodSession>> {
        self.backend.scan_recent(limit).await
    }

    /// Returns every session created within `[start, end]`, newest first.
    pub async fn list_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> PortResult<Vec<MoodSession>> {
        self.backend.scan_range(start, end).await
    }

    // --- Users ---

    pub async fn create_user(&self, username: &str, password: &str) -> PortResult<User> {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password: password.to_string(),
        };
        self.backend.insert_user(user.clone()).await?;
        Ok(user)
    }

    pub async fn get_user(&self, id: Uuid) -> PortResult<Option<User>> {
        self.backend.find_user(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> PortResult<Option<User>> {
        self.backend.find_user_by_username(username).await
    }
}
