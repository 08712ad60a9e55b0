//! PR and issue comment queries

use chrono::{DateTime, Utc};
use common::models::Comment;
use sqlx::{PgPool, Row};

/// PR comments made by an author within a window, scoped to the repository
/// via the parent PR
pub async fn pr_comments_by_author(
    pool: &PgPool,
    repository: &str,
    author: &str,
    since: DateTime<Utc>,
    until: DateTime<Utc>,
) -> Result<Vec<Comment>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT c.id, c.pr_id, c.author, c.body, c.created_at
        FROM pr_comments c
        INNER JOIN raw_pull_requests pr ON pr.id = c.pr_id
        WHERE pr.repository = $1 AND c.author = $2
          AND c.created_at >= $3 AND c.created_at < $4
        ORDER BY c.created_at ASC, c.id ASC
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
        .map(|row| Comment {
            id: row.get("id"),
            parent_id: row.get("pr_id"),
            author: row.get("author"),
            body: row.get("body"),
            created_at: row.get("created_at"),
        })
        .collect())
}

/// All comments on one issue, regardless of author or window
pub async fn issue_comments_for_issue(
    pool: &PgPool,
    issue_id: &str,
) -> Result<Vec<Comment>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, issue_id, author, body, created_at
        FROM issue_comments
        WHERE issue_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(issue_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| Comment {
            id: row.get("id"),
            parent_id: row.get("issue_id"),
            author: row.get("author"),
            body: row.get("body"),
            created_at: row.get("created_at"),
        })
        .collect())
}
