//! Review queries

use chrono::{DateTime, Utc};
use common::models::{Review, ReviewState};
use sqlx::{PgPool, Row};

/// Reviews given by an author within a window, scoped to the repository
/// via the parent PR, in submission order
pub async fn list_by_author(
    pool: &PgPool,
    repository: &str,
    author: &str,
    since: DateTime<Utc>,
    until: DateTime<Utc>,
) -> Result<Vec<Review>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT r.id, r.pr_id, r.author, r.state, r.body, r.submitted_at
        FROM pr_reviews r
        INNER JOIN raw_pull_requests pr ON pr.id = r.pr_id
        WHERE pr.repository = $1 AND r.author = $2
          AND r.submitted_at >= $3 AND r.submitted_at < $4
        ORDER BY r.submitted_at ASC, r.id ASC
        "#,
    )
    .bind(repository)
    .bind(author)
    .bind(since)
    .bind(until)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let state: String = row.get("state");
            Review {
                id: row.get("id"),
                pr_id: row.get("pr_id"),
                author: row.get("author"),
                state: ReviewState::from_raw(&state),
                body: row.get("body"),
                submitted_at: row.get("submitted_at"),
            }
        })
        .collect())
}
