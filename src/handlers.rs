// handlers.rs
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::{self, AuthUser, MaybeUser};
use crate::error::{AppError, AppResult};
use crate::google;
use crate::messages;
use crate::models::{CreateMessage, CreatePoll, MessageOut, PollOut, User, VoteRequest};
use crate::polls;
use crate::state::AppState;
use crate::users;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
pub struct LoginParams {
    /// Where to send the browser after a successful login.
    #[serde(default)]
    pub redirect: String,
}

/// Send the browser to the provider's consent screen.
pub async fn login(
    State(state): State<AppState>,
    Query(params): Query<LoginParams>,
) -> AppResult<Redirect> {
    if state.config.google_client_id.is_empty() {
        return Err(AppError::OauthNotConfigured);
    }
    let url = google::consent_url(&state.config, &params.redirect);
    Ok(Redirect::temporary(&url))
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: String,
    #[serde(default)]
    pub state: String,
}

/// Provider redirect target: exchange the code, enforce the domain
/// policy, upsert the user and hand the browser back to the frontend
/// with a freshly minted token.
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> AppResult<Redirect> {
    let identity = google::exchange_code(&state.config, &params.code).await?;

    if !google::email_matches_domain(&identity.email, &state.config.allowed_domain) {
        return Err(AppError::DomainNotAllowed(state.config.allowed_domain.clone()));
    }

    let user_id =
        users::upsert_user(&state.pool, &identity.email, &identity.name, &identity.picture).await?;
    let token = auth::issue_token(&state.config.jwt_secret, user_id, &identity.email)?;
    info!(user_id, "login completed");

    let target = if params.state.is_empty() {
        state.config.frontend_url.as_str()
    } else {
        params.state.as_str()
    };
    Ok(Redirect::temporary(&format!("{target}?token={token}")))
}

pub async fn me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> AppResult<Json<User>> {
    let user = users::fetch_user(&state.pool, claims.user_id()?).await?;
    Ok(Json(user))
}

pub async fn list_messages(State(state): State<AppState>) -> AppResult<Json<Vec<MessageOut>>> {
    Ok(Json(messages::list_messages(&state.pool).await?))
}

pub async fn create_message(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<CreateMessage>,
) -> AppResult<(StatusCode, Json<MessageOut>)> {
    let message = messages::create_message(&state.pool, claims.user_id()?, &payload.body).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn list_polls(
    State(state): State<AppState>,
    MaybeUser(claims): MaybeUser,
) -> AppResult<Json<Vec<PollOut>>> {
    let viewer = claims.and_then(|c| c.sub.parse::<i32>().ok());
    Ok(Json(polls::list_polls(&state.pool, viewer).await?))
}

pub async fn create_poll(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Json(payload): Json<CreatePoll>,
) -> AppResult<(StatusCode, Json<PollOut>)> {
    let poll = polls::create_poll(&state.pool, &payload.question, &payload.options).await?;
    Ok((StatusCode::CREATED, Json(poll)))
}

pub async fn vote(
    State(state): State<AppState>,
    Path(poll_id): Path<i32>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<VoteRequest>,
) -> AppResult<Json<Value>> {
    let voted =
        polls::cast_vote(&state.pool, poll_id, payload.option_id, claims.user_id()?).await?;
    Ok(Json(json!({ "status": "ok", "voted": voted })))
}
