//! Issue queries

use chrono::{DateTime, Utc};
use common::models::{Issue, IssueState};
use sqlx::{PgPool, Row};

/// Issues created by an author within a window
pub async fn list_by_author(
    pool: &PgPool,
    repository: &str,
    author: &str,
    since: DateTime<Utc>,
    until: DateTime<Utc>,
) -> Result<Vec<Issue>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, repository, number, title, author, state,
               created_at, closed_at, labels
        FROM raw_issues
        WHERE repository = $1 AND author = $2
          AND created_at >= $3 AND created_at < $4
        ORDER BY created_at ASC, id ASC
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
            Issue {
                id: row.get("id"),
                repository: row.get("repository"),
                number: row.get("number"),
                title: row.get("title"),
                author: row.get("author"),
                state: IssueState::from_raw(&state),
                created_at: row.get("created_at"),
                closed_at: row.get("closed_at"),
                labels: row.get("labels"),
            }
        })
        .collect())
}
