// src/error.rs
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Every failure a handler can surface. Translation into a status code
/// and JSON body happens once, at the HTTP boundary; nothing below it
/// retries.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("failed to verify identity with the provider")]
    UpstreamAuth(String),

    #[error("only @{0} accounts are allowed")]
    DomainNotAllowed(String),

    #[error("login required")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("poll is closed")]
    PollClosed,

    #[error("option does not belong to this poll")]
    InvalidOption,

    #[error("login is not configured on this server")]
    OauthNotConfigured,

    #[error("internal error: {0}")]
    Internal(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::UpstreamAuth(_) => StatusCode::BAD_REQUEST,
            AppError::DomainNotAllowed(_) => StatusCode::FORBIDDEN,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::PollClosed | AppError::InvalidOption => {
                StatusCode::BAD_REQUEST
            }
            AppError::OauthNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Detail for upstream/storage failures goes to the log, not the client.
        let message = match &self {
            AppError::UpstreamAuth(detail) => {
                error!("identity exchange failed: {detail}");
                self.to_string()
            }
            AppError::Internal(_) | AppError::Database(_) => {
                error!("{self}");
                "internal error".to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_taxonomy() {
        assert_eq!(AppError::UpstreamAuth("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::DomainNotAllowed("example.edu".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::NotFound("poll").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Validation("bad".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::PollClosed.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidOption.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::OauthNotConfigured.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn not_found_names_the_entity() {
        assert_eq!(AppError::NotFound("poll").to_string(), "poll not found");
    }
}
