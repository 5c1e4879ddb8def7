//! crates/moodify_core/src/memory.rs
//!
//! A process-local implementation of the `StorageBackend` port. This is the
//! default backend when no database is configured.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::domain::{MoodSession, User};
use crate::ports::{PortError, PortResult, StorageBackend};

#[derive(Default)]
struct Tables {
    /// Kept in insertion order.
    sessions: Vec<MoodSession>,
    users: HashMap<Uuid, User>,
}

/// An in-memory table of sessions and users guarded by a single lock.
#[derive(Default)]
pub struct InMemoryBackend {
    tables: RwLock<Tables>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    pub fn session_count(&self) -> usize {
        self.tables
            .read()
            .map(|tables| tables.sessions.len())
            .unwrap_or_default()
    }

    fn read(&self) -> PortResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| PortError::Unexpected("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> PortResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| PortError::Unexpected("in-memory store lock poisoned".to_string()))
    }
}

/// Newest first; among equal timestamps the later insert comes first.
fn newest_first<'a>(sessions: impl DoubleEndedIterator<Item = &'a MoodSession>) -> Vec<MoodSession> {
    let mut ordered: Vec<MoodSession> = sessions.rev().cloned().collect();
    ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    ordered
}

#[async_trait]
impl StorageBackend for InMemoryBackend {
    async fn insert_session(&self, session: MoodSession) -> PortResult<()> {
        let mut tables = self.write()?;
        if tables.sessions.iter().any(|s| s.id == session.id) {
            return Err(PortError::Conflict(format!(
                "Session {} already exists",
                session.id
            )));
        }
        tables.sessions.push(session);
        Ok(())
    }

    async fn scan_recent(&self, limit: usize) -> PortResult<Vec<MoodSession>> {
        let tables = self.read()?;
        let mut sessions = newest_first(tables.sessions.iter());
        sessions.truncate(limit);
        Ok(sessions)
    }

    async fn scan_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> PortResult<Vec<MoodSession>> {
        let tables = self.read()?;
        let in_range: Vec<&MoodSession> = tables
            .sessions
            .iter()
            .filter(|s| s.created_at >= start && s.created_at <= end)
            .collect();
        Ok(newest_first(in_range.into_iter()))
    }

    async fn insert_user(&self, user: User) -> PortResult<()> {
        let mut tables = self.write()?;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(PortError::Conflict(format!(
                "Username {} is already taken",
                user.username
            )));
        }
        tables.users.insert(user.id, user);
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> PortResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> PortResult<Option<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}
