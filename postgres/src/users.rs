//! PostgreSQL user repository.

use crate::storage;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use staybook_core::types::{Role, User, UserId};
use staybook_core::{Error, Result};
use uuid::Uuid;

/// PostgreSQL-backed user accounts.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Creates a repository over the shared pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new account with role `user` and a zero point balance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmailTaken`] if the email is already registered,
    /// [`Error::Storage`] on any other query fault.
    pub async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> Result<User> {
        let id = UserId::new();
        let row = sqlx::query(
            "INSERT INTO users (id, name, email, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, email, password_hash, role, points, created_at",
        )
        .bind(id.as_uuid())
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return Error::EmailTaken;
                }
            }
            storage("Failed to create user", e)
        })?;

        user_from_row(&row)
    }

    /// Gets an account by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no such account exists,
    /// [`Error::Storage`] on query fault.
    pub async fn get_user(&self, user_id: UserId) -> Result<User> {
        let row = sqlx::query(
            "SELECT id, name, email, password_hash, role, points, created_at
             FROM users
             WHERE id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage("Failed to get user", e))?
        .ok_or(Error::NotFound("user"))?;

        user_from_row(&row)
    }

    /// Looks an account up by login email.
    ///
    /// Returns `None` for unknown emails so the login handler can report
    /// a uniform [`Error::InvalidCredentials`] either way.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] on query fault.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, name, email, password_hash, role, points, created_at
             FROM users
             WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage("Failed to look up email", e))?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Current loyalty-point balance. A snapshot read outside any
    /// transaction; the ledgers re-read under lock before mutating.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no such account exists,
    /// [`Error::Storage`] on query fault.
    pub async fn point_balance(&self, user_id: UserId) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT points FROM users WHERE id = $1")
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage("Failed to read point balance", e))?
            .ok_or(Error::NotFound("user"))
    }
}

pub(crate) fn user_from_row(row: &PgRow) -> Result<User> {
    let id: Uuid = row.try_get("id").map_err(|e| storage("Bad user row", e))?;
    let role: String = row.try_get("role").map_err(|e| storage("Bad user row", e))?;
    let role = Role::parse(&role)
        .ok_or_else(|| Error::Storage(format!("Unknown role in users table: {role}")))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| storage("Bad user row", e))?;

    Ok(User {
        id: UserId::from_uuid(id),
        name: row.try_get("name").map_err(|e| storage("Bad user row", e))?,
        email: row
            .try_get("email")
            .map_err(|e| storage("Bad user row", e))?,
        password_hash: row
            .try_get("password_hash")
            .map_err(|e| storage("Bad user row", e))?,
        role,
        points: row
            .try_get("points")
            .map_err(|e| storage("Bad user row", e))?,
        created_at,
    })
}
