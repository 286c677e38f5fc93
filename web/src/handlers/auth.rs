//! Registration, login, logout, and profile handlers.
//!
//! Login failures are uniform: an unknown email and a wrong password
//! both produce `InvalidCredentials`, so the endpoint does not reveal
//! which accounts exist.

use crate::auth::{SessionUser, mint_token};
use crate::error::AppError;
use crate::state::AppState;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, http::StatusCode};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use staybook_core::types::{Session, SessionId, User};
use staybook_core::{Error, validate};

/// Request to register a new account.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plaintext password, hashed before storage.
    pub password: String,
}

/// Request to log in.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Response carrying a freshly minted bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Opaque bearer token; shown exactly once.
    pub token: String,
    /// The authenticated profile.
    pub user: User,
}

/// Generic confirmation message.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: String,
}

/// Register a new account.
///
/// Every account registers with the `user` role; admin accounts are
/// provisioned out of band.
///
/// # Endpoint
///
/// `POST /api/auth/register` with `{name, email, password}`.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    validate::check_registration(&request.name, &request.email, &request.password)
        .map_err(AppError::from)?;

    let hash = hash_password(request.password).await?;
    let user = state
        .users
        .create_user(&request.name, &request.email, &hash)
        .await?;

    tracing::info!(user_id = %user.id, "Account registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Log in with email and password.
///
/// On success, mints a random 32-byte bearer token, stores its SHA-256
/// digest with the configured TTL, and returns the token with the
/// profile.
///
/// # Endpoint
///
/// `POST /api/auth/login` with `{email, password}`.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = state
        .users
        .find_by_email(&request.email)
        .await?
        .ok_or(Error::InvalidCredentials)?;

    verify_password(request.password, user.password_hash.clone()).await?;

    let (token, digest) = mint_token();
    let now = Utc::now();
    let ttl = i64::try_from(state.auth.session_ttl).unwrap_or(i64::MAX);
    let session = Session {
        id: SessionId::new(),
        user_id: user.id,
        created_at: now,
        expires_at: now + Duration::seconds(ttl),
    };
    state.sessions.create_session(&digest, &session).await?;

    tracing::info!(user_id = %user.id, session_id = %session.id, "Login");
    Ok(Json(LoginResponse { token, user }))
}

/// Destroy the caller's session.
///
/// # Endpoint
///
/// `POST /api/auth/logout` with a bearer token.
pub async fn logout(
    State(state): State<AppState>,
    caller: SessionUser,
) -> Result<Json<MessageResponse>, AppError> {
    state.sessions.delete_session(caller.session.id).await?;

    tracing::info!(user_id = %caller.user.id, "Logout");
    Ok(Json(MessageResponse {
        message: "Logged out successfully".to_string(),
    }))
}

/// Current profile with the live point balance.
///
/// # Endpoint
///
/// `GET /api/auth/me` with a bearer token.
pub async fn me(caller: SessionUser) -> Json<User> {
    Json(caller.user)
}

/// Hash a password on the blocking pool; argon2 is deliberately slow.
async fn hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
    })
    .await
    .map_err(|e| AppError::internal("Password hashing failed").with_source(e.into()))?
    .map_err(|e| AppError::internal("Password hashing failed").with_source(anyhow::anyhow!(e)))
}

/// Verify a password against its stored hash on the blocking pool.
///
/// A malformed stored hash is treated the same as a mismatch.
async fn verify_password(password: String, stored_hash: String) -> Result<(), AppError> {
    let verified = tokio::task::spawn_blocking(move || {
        PasswordHash::new(&stored_hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    })
    .await
    .map_err(|e| AppError::internal("Password verification failed").with_source(e.into()))?;

    if verified {
        Ok(())
    } else {
        Err(Error::InvalidCredentials.into())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[tokio::test]
    async fn hash_and_verify_round_trip() {
        let hash = hash_password("correct horse battery".to_string())
            .await
            .unwrap();
        assert!(hash.starts_with("$argon2"));

        verify_password("correct horse battery".to_string(), hash.clone())
            .await
            .unwrap();
        let err = verify_password("wrong password".to_string(), hash)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "[UNAUTHORIZED] Invalid credentials");
    }

    #[tokio::test]
    async fn malformed_stored_hash_is_a_mismatch() {
        let err = verify_password("anything".to_string(), "not-a-phc-string".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "[UNAUTHORIZED] Invalid credentials");
    }
}
