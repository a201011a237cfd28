// src/messages.rs
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::MessageOut;

const MAX_MESSAGE_CHARS: usize = 500;

/// Trim and bound the body to 1..=500 characters.
pub fn normalize_body(raw: &str) -> Result<String, AppError> {
    let body = raw.trim();
    if body.is_empty() || body.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AppError::Validation("message must be 1-500 characters".into()));
    }
    Ok(body.to_string())
}

pub async fn list_messages(pool: &PgPool) -> Result<Vec<MessageOut>, AppError> {
    let rows = sqlx::query_as::<_, MessageOut>(
        r#"
        SELECT m.id, m.body, u.name AS author_name, m.created_at
        FROM messages m
        LEFT JOIN users u ON u.id = m.user_id
        ORDER BY m.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create_message(
    pool: &PgPool,
    user_id: i32,
    raw_body: &str,
) -> Result<MessageOut, AppError> {
    let body = normalize_body(raw_body)?;

    let message = sqlx::query_as::<_, MessageOut>(
        r#"
        WITH inserted AS (
            INSERT INTO messages (body, user_id)
            VALUES ($1, $2)
            RETURNING id, body, user_id, created_at
        )
        SELECT i.id, i.body, u.name AS author_name, i.created_at
        FROM inserted i
        LEFT JOIN users u ON u.id = i.user_id
        "#,
    )
    .bind(&body)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_is_trimmed() {
        assert_eq!(normalize_body("  hello wall  ").unwrap(), "hello wall");
    }

    #[test]
    fn empty_and_whitespace_bodies_are_rejected() {
        assert!(normalize_body("").is_err());
        assert!(normalize_body("   \n\t").is_err());
    }

    #[test]
    fn length_is_counted_in_characters() {
        let at_limit = "x".repeat(MAX_MESSAGE_CHARS);
        assert!(normalize_body(&at_limit).is_ok());

        let over_limit = "x".repeat(MAX_MESSAGE_CHARS + 1);
        assert!(normalize_body(&over_limit).is_err());
    }

    #[test]
    fn trailing_whitespace_does_not_count_toward_the_limit() {
        let padded = format!("{}   ", "x".repeat(MAX_MESSAGE_CHARS));
        assert!(normalize_body(&padded).is_ok());
    }
}
