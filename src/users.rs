// src/users.rs
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::User;

/// Insert-or-update keyed by email. A single statement, so two
/// concurrent first logins for the same address collapse onto one row
/// instead of racing a check against an insert. The id never changes
/// once assigned; name and picture follow the provider's profile.
pub async fn upsert_user(
    pool: &PgPool,
    email: &str,
    name: &str,
    picture: &str,
) -> Result<i32, AppError> {
    let id = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO users (email, name, picture)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO UPDATE
        SET name = EXCLUDED.name, picture = EXCLUDED.picture
        RETURNING id
        "#,
    )
    .bind(email)
    .bind(name)
    .bind(picture)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

pub async fn fetch_user(pool: &PgPool, id: i32) -> Result<User, AppError> {
    sqlx::query_as::<_, User>("SELECT id, email, name, picture FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("user"))
}
