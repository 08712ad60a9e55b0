//! User record queries

use common::models::UserProfile;
use sqlx::{PgPool, Row};

/// Get a user's profile by username
pub async fn get_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<UserProfile>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT username, avatar_url, score, last_updated
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| UserProfile {
        username: row.get("username"),
        avatar_url: row.get("avatar_url"),
        score: row.get("score"),
        last_updated: row.get("last_updated"),
    }))
}

/// Upsert a user record with the latest computed score
pub async fn upsert(
    pool: &PgPool,
    username: &str,
    avatar_url: Option<&str>,
    score: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO users (username, avatar_url, score, last_updated)
        VALUES ($1, $2, $3, NOW())
        ON CONFLICT (username) DO UPDATE
        SET avatar_url = EXCLUDED.avatar_url,
            score = EXCLUDED.score,
            last_updated = NOW()
        "#,
    )
    .bind(username)
    .bind(avatar_url)
    .bind(score)
    .execute(pool)
    .await?;

    Ok(())
}
