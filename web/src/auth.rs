//! Bearer-token authentication extractors.
//!
//! Sessions are opaque 32-byte random tokens. Only the SHA-256 digest of
//! a token is stored, so a database leak does not leak usable tokens.
//!
//! Handlers never branch on roles: [`SessionUser`] authenticates the
//! caller and [`RequireAdmin`] performs the single capability check at
//! the extraction boundary. The acting user always comes from the
//! session, never from a request payload.

use crate::error::AppError;
use crate::state::AppState;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore as _;
use sha2::{Digest as _, Sha256};
use staybook_core::types::{Role, Session, User};

/// An authenticated caller: the session plus its user row.
#[derive(Debug, Clone)]
pub struct SessionUser {
    /// The account making the request.
    pub user: User,
    /// The session that authenticated it.
    pub session: Session,
}

/// An authenticated admin. Extraction fails with 403 for regular users.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub SessionUser);

/// Generates a fresh session token.
///
/// Returns `(token, digest)`: the token goes to the client, the digest
/// to the database.
#[must_use]
pub fn mint_token() -> (String, String) {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    let token = URL_SAFE_NO_PAD.encode(bytes);
    let digest = token_digest(&token);
    (token, digest)
}

/// SHA-256 digest of a bearer token, base64url-encoded.
#[must_use]
pub fn token_digest(token: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(token.as_bytes()))
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    parts
        .headers
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::unauthorized("Missing bearer token"))
}

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let digest = token_digest(token);

        let session = state.sessions.find_by_token_hash(&digest).await?;
        let user = state.users.get_user(session.user_id).await?;

        Ok(Self { user, session })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let caller = SessionUser::from_request_parts(parts, state).await?;
        if caller.user.role != Role::Admin {
            return Err(AppError::forbidden("Admin access required"));
        }
        Ok(Self(caller))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn minted_tokens_are_unique_and_url_safe() {
        let (a, _) = mint_token();
        let (b, _) = mint_token();
        assert_ne!(a, b);
        assert!(!a.contains('+') && !a.contains('/') && !a.contains('='));
        // 32 bytes base64url without padding.
        assert_eq!(a.len(), 43);
    }

    #[test]
    fn digest_is_stable_and_distinct_from_token() {
        let (token, digest) = mint_token();
        assert_eq!(digest, token_digest(&token));
        assert_ne!(digest, token);
    }

    #[test]
    fn bearer_token_requires_prefix() {
        let req = axum::http::Request::builder()
            .header(http::header::AUTHORIZATION, "Basic abc")
            .body(())
            .unwrap();
        let (parts, ()) = req.into_parts();
        assert!(bearer_token(&parts).is_err());
    }

    #[test]
    fn bearer_token_strips_prefix() {
        let req = axum::http::Request::builder()
            .header(http::header::AUTHORIZATION, "Bearer sometoken")
            .body(())
            .unwrap();
        let (parts, ()) = req.into_parts();
        assert_eq!(bearer_token(&parts).unwrap(), "sometoken");
    }
}
