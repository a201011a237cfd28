// src/polls.rs
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::{OptionTally, PollOut, PollRow};

pub fn validate_new_poll(question: &str, options: &[String]) -> Result<(), AppError> {
    if question.trim().is_empty() {
        return Err(AppError::Validation("question must not be empty".into()));
    }
    if options.len() < 2 {
        return Err(AppError::Validation("poll needs at least 2 options".into()));
    }
    if options.iter().any(|option| option.trim().is_empty()) {
        return Err(AppError::Validation("options must not be empty".into()));
    }
    Ok(())
}

/// Create a poll and its options in one transaction; a failure
/// mid-sequence leaves nothing behind.
pub async fn create_poll(
    pool: &PgPool,
    question: &str,
    options: &[String],
) -> Result<PollOut, AppError> {
    validate_new_poll(question, options)?;

    let mut tx = pool.begin().await?;

    let poll = sqlx::query_as::<_, PollRow>(
        "INSERT INTO polls (question) VALUES ($1) RETURNING id, question, is_active, created_at",
    )
    .bind(question)
    .fetch_one(&mut *tx)
    .await?;

    let mut tallies = Vec::with_capacity(options.len());
    for text in options {
        let (id, text) = sqlx::query_as::<_, (i32, String)>(
            "INSERT INTO poll_options (poll_id, text) VALUES ($1, $2) RETURNING id, text",
        )
        .bind(poll.id)
        .bind(text)
        .fetch_one(&mut *tx)
        .await?;
        tallies.push(OptionTally { id, text, votes: 0 });
    }

    tx.commit().await?;

    Ok(PollOut {
        id: poll.id,
        question: poll.question,
        is_active: poll.is_active,
        options: tallies,
        user_voted_option: None,
        created_at: poll.created_at,
    })
}

/// Active polls, newest first. Tallies are aggregated at read time,
/// never kept as counters. When a viewer identity is supplied, their
/// chosen option rides along.
pub async fn list_polls(pool: &PgPool, viewer: Option<i32>) -> Result<Vec<PollOut>, AppError> {
    let polls = sqlx::query_as::<_, PollRow>(
        "SELECT id, question, is_active, created_at FROM polls WHERE is_active ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;

    let mut out = Vec::with_capacity(polls.len());
    for poll in polls {
        let options = sqlx::query_as::<_, OptionTally>(
            r#"
            SELECT po.id, po.text, COUNT(pv.id) AS votes
            FROM poll_options po
            LEFT JOIN poll_votes pv ON pv.option_id = po.id
            WHERE po.poll_id = $1
            GROUP BY po.id, po.text
            ORDER BY po.id
            "#,
        )
        .bind(poll.id)
        .fetch_all(pool)
        .await?;

        let user_voted_option = match viewer {
            Some(user_id) => {
                sqlx::query_scalar::<_, i32>(
                    "SELECT option_id FROM poll_votes WHERE poll_id = $1 AND user_id = $2",
                )
                .bind(poll.id)
                .bind(user_id)
                .fetch_optional(pool)
                .await?
            }
            None => None,
        };

        out.push(PollOut {
            id: poll.id,
            question: poll.question,
            is_active: poll.is_active,
            options,
            user_voted_option,
            created_at: poll.created_at,
        });
    }
    Ok(out)
}

/// Record or change a vote. Checks and write commit as one unit; if two
/// votes from the same user race past the checks, the UNIQUE
/// (poll_id, user_id) index turns the loser's insert into an update.
pub async fn cast_vote(
    pool: &PgPool,
    poll_id: i32,
    option_id: i32,
    user_id: i32,
) -> Result<i32, AppError> {
    let mut tx = pool.begin().await?;

    let is_active = sqlx::query_scalar::<_, bool>("SELECT is_active FROM polls WHERE id = $1")
        .bind(poll_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::NotFound("poll"))?;
    if !is_active {
        return Err(AppError::PollClosed);
    }

    let owned = sqlx::query_scalar::<_, i32>(
        "SELECT id FROM poll_options WHERE id = $1 AND poll_id = $2",
    )
    .bind(option_id)
    .bind(poll_id)
    .fetch_optional(&mut *tx)
    .await?;
    if owned.is_none() {
        return Err(AppError::InvalidOption);
    }

    // Re-voting overwrites the choice; the row keeps its original
    // created_at.
    sqlx::query(
        r#"
        INSERT INTO poll_votes (poll_id, option_id, user_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (poll_id, user_id) DO UPDATE
        SET option_id = EXCLUDED.option_id
        "#,
    )
    .bind(poll_id)
    .bind(option_id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(option_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn poll_needs_two_options() {
        assert!(validate_new_poll("Lunch?", &options(&[])).is_err());
        assert!(validate_new_poll("Lunch?", &options(&["Pizza"])).is_err());
        assert!(validate_new_poll("Lunch?", &options(&["Pizza", "Salad"])).is_ok());
        assert!(validate_new_poll("Lunch?", &options(&["Pizza", "Salad", "Soup"])).is_ok());
    }

    #[test]
    fn blank_question_is_rejected() {
        assert!(validate_new_poll("  ", &options(&["Pizza", "Salad"])).is_err());
    }

    #[test]
    fn blank_option_text_is_rejected() {
        assert!(validate_new_poll("Lunch?", &options(&["Pizza", " "])).is_err());
    }
}
