// models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub picture: String,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct MessageOut {
    pub id: i32,
    pub body: String,
    pub author_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMessage {
    pub body: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct PollRow {
    pub id: i32,
    pub question: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePoll {
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub option_id: i32,
}

/// An option together with its aggregated vote count.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct OptionTally {
    pub id: i32,
    pub text: String,
    pub votes: i64,
}

#[derive(Debug, Serialize)]
pub struct PollOut {
    pub id: i32,
    pub question: String,
    pub is_active: bool,
    pub options: Vec<OptionTally>,
    pub user_voted_option: Option<i32>,
    pub created_at: DateTime<Utc>,
}
