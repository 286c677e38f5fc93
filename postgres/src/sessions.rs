//! PostgreSQL session store.
//!
//! Sessions back opaque bearer tokens. The token itself is handed to
//! the client at login and never persisted; the store is keyed by its
//! SHA-256 digest, so a leaked database dump yields no usable tokens.

use crate::storage;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use staybook_core::types::{Session, SessionId, UserId};
use staybook_core::{Error, Result};
use uuid::Uuid;

/// PostgreSQL-backed session storage.
#[derive(Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    /// Creates a store over the shared pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persists a new session under the token digest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] on query fault.
    pub async fn create_session(&self, token_hash: &str, session: &Session) -> Result<()> {
        sqlx::query(
            "INSERT INTO sessions (id, token_hash, user_id, created_at, expires_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(session.id.as_uuid())
        .bind(token_hash)
        .bind(session.user_id.as_uuid())
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| storage("Failed to create session", e))?;

        Ok(())
    }

    /// Resolves a bearer token digest to its session.
    ///
    /// Expired sessions are deleted on sight rather than waiting for the
    /// periodic purge.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionNotFound`] if the digest matches nothing,
    /// [`Error::SessionExpired`] if the session's expiry has passed,
    /// [`Error::Storage`] on query fault.
    pub async fn find_by_token_hash(&self, token_hash: &str) -> Result<Session> {
        let row = sqlx::query(
            "SELECT id, user_id, created_at, expires_at
             FROM sessions
             WHERE token_hash = $1",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage("Failed to look up session", e))?
        .ok_or(Error::SessionNotFound)?;

        let session = session_from_row(&row)?;
        if session.is_expired(Utc::now()) {
            self.delete_session(session.id).await?;
            return Err(Error::SessionExpired);
        }

        Ok(session)
    }

    /// Deletes one session (logout).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] on query fault.
    pub async fn delete_session(&self, session_id: SessionId) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(session_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| storage("Failed to delete session", e))?;

        Ok(())
    }

    /// Deletes every expired session, returning the number removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] on query fault.
    pub async fn purge_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
            .execute(&self.pool)
            .await
            .map_err(|e| storage("Failed to purge sessions", e))?;

        Ok(result.rows_affected())
    }
}

fn session_from_row(row: &PgRow) -> Result<Session> {
    let id: Uuid = row.try_get("id").map_err(|e| storage("Bad session row", e))?;
    let user_id: Uuid = row
        .try_get("user_id")
        .map_err(|e| storage("Bad session row", e))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| storage("Bad session row", e))?;
    let expires_at: DateTime<Utc> = row
        .try_get("expires_at")
        .map_err(|e| storage("Bad session row", e))?;

    Ok(Session {
        id: SessionId::from_uuid(id),
        user_id: UserId::from_uuid(user_id),
        created_at,
        expires_at,
    })
}
