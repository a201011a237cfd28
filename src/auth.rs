// src/auth.rs
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

/// Tokens live for a fixed 72 hours; there is no revocation or refresh,
/// a compromised token stays valid until it expires.
pub const TOKEN_TTL_HOURS: i64 = 72;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id, stringified per the `sub` convention.
    pub sub: String,
    pub email: String,
    /// Expiry, seconds since epoch.
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<i32, AppError> {
        self.sub.parse().map_err(|_| AppError::Unauthorized)
    }
}

pub fn issue_token(secret: &str, user_id: i32, email: &str) -> Result<String, AppError> {
    let expiry = Utc::now() + Duration::hours(TOKEN_TTL_HOURS);
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp: expiry.timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.to_string()))
}

/// Verify signature, algorithm and expiry. Malformed, expired and
/// wrong-signature tokens all collapse into the same `Unauthorized`;
/// callers never learn which case it was.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized)
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Mandatory identity: rejects the request when no valid credential is
/// presented. Use for write endpoints.
pub struct AuthUser(pub Claims);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::Unauthorized)?;
        let claims = verify_token(&state.config.jwt_secret, token)?;
        Ok(AuthUser(claims))
    }
}

/// Optional identity: guests and holders of invalid tokens both come
/// through as `None`. Use for endpoints that serve both.
pub struct MaybeUser(pub Option<Claims>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims =
            bearer_token(parts).and_then(|token| verify_token(&state.config.jwt_secret, token).ok());
        Ok(MaybeUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn issued_token_round_trips() {
        let token = issue_token(SECRET, 42, "student@example.edu").unwrap();
        let claims = verify_token(SECRET, &token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "student@example.edu");
        assert_eq!(claims.user_id().unwrap(), 42);
    }

    #[test]
    fn expired_token_is_rejected() {
        // well past the validator's clock leeway
        let expiry = (Utc::now() - Duration::hours(2)).timestamp() as usize;
        let claims = Claims {
            sub: "1".into(),
            email: "student@example.edu".into(),
            exp: expiry,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(verify_token(SECRET, &token).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = issue_token(SECRET, 7, "student@example.edu").unwrap();
        let mut bytes = token.into_bytes();
        let mid = bytes.len() / 2;
        bytes[mid] = if bytes[mid] == b'a' { b'b' } else { b'a' };
        let tampered = String::from_utf8(bytes).unwrap();
        assert!(verify_token(SECRET, &tampered).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token(SECRET, 7, "student@example.edu").unwrap();
        assert!(verify_token("some-other-secret", &token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(verify_token(SECRET, "not-a-token").is_err());
        assert!(verify_token(SECRET, "").is_err());
    }

    #[test]
    fn non_numeric_subject_is_rejected() {
        let claims = Claims {
            sub: "not-a-number".into(),
            email: "student@example.edu".into(),
            exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
        };
        assert!(claims.user_id().is_err());
    }
}
