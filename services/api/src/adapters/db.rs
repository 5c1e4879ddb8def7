//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `StorageBackend` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moodify_core::domain::{Mood, MoodSession, User};
use moodify_core::ports::{PortError, PortResult, StorageBackend};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `StorageBackend` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct MoodSessionRecord {
    id: Uuid,
    text: String,
    mood: String,
    confidence: i32,
    alternative_moods: Vec<String>,
    created_at: DateTime<Utc>,
}
impl MoodSessionRecord {
    fn to_domain(self) -> PortResult<MoodSession> {
        let mood = self
            .mood
            .parse::<Mood>()
            .map_err(|e| PortError::Unexpected(format!("Session {}: {}", self.id, e)))?;
        Ok(MoodSession {
            id: self.id,
            text: self.text,
            mood,
            confidence: self.confidence.clamp(0, 100) as u8,
            alternative_moods: self.alternative_moods,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    username: String,
    password: String,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            username: self.username,
            password: self.password,
        }
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

const SESSION_COLUMNS: &str = "id, text, mood, confidence, alternative_moods, created_at";

//=========================================================================================
// `StorageBackend` Trait Implementation
//=========================================================================================

#[async_trait]
impl StorageBackend for DbAdapter {
    async fn insert_session(&self, session: MoodSession) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO mood_sessions (id, text, mood, confidence, alternative_moods, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(session.id)
        .bind(&session.text)
        .bind(session.mood.as_str())
        .bind(i32::from(session.confidence))
        .bind(&session.alternative_moods)
        .bind(session.created_at)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    async fn scan_recent(&self, limit: usize) -> PortResult<Vec<MoodSession>> {
        let records: Vec<MoodSessionRecord> = sqlx::query_as(&format!(
            "SELECT {SESSION_COLUMNS} FROM mood_sessions ORDER BY created_at DESC, seq DESC LIMIT $1"
        ))
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        records.into_iter().map(MoodSessionRecord::to_domain).collect()
    }

    async fn scan_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> PortResult<Vec<MoodSession>> {
        let records: Vec<MoodSessionRecord> = sqlx::query_as(&format!(
            "SELECT {SESSION_COLUMNS} FROM mood_sessions \
             WHERE created_at >= $1 AND created_at <= $2 \
             ORDER BY created_at DESC, seq DESC"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        records.into_iter().map(MoodSessionRecord::to_domain).collect()
    }

    async fn insert_user(&self, user: User) -> PortResult<()> {
        sqlx::query("INSERT INTO users (id, username, password) VALUES ($1, $2, $3)")
            .bind(user.id)
            .bind(&user.username)
            .bind(&user.password)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    PortError::Conflict(format!("Username {} is already taken", user.username))
                }
                _ => unexpected(e),
            })?;
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> PortResult<Option<User>> {
        let record: Option<UserRecord> =
            sqlx::query_as("SELECT id, username, password FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(unexpected)?;
        Ok(record.map(UserRecord::to_domain))
    }

    async fn find_user_by_username(&self, username: &str) -> PortResult<Option<User>> {
        let record: Option<UserRecord> =
            sqlx::query_as("SELECT id, username, password FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await
                .map_err(unexpected)?;
        Ok(record.map(UserRecord::to_domain))
    }
}
