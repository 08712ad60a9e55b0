//! Pull request queries

use chrono::{DateTime, Utc};
use common::models::{PrFile, PrState, PullRequest};
use sqlx::{PgPool, Row};

/// Pull requests created by an author within a window, in creation order
pub async fn list_by_author(
    pool: &PgPool,
    repository: &str,
    author: &str,
    since: DateTime<Utc>,
    until: DateTime<Utc>,
) -> Result<Vec<PullRequest>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, repository, number, title, author, state, merged,
               created_at, merged_at, closed_at, additions, deletions,
               changed_files, body
        FROM raw_pull_requests
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

    Ok(rows.into_iter().map(map_pr).collect())
}

/// File diffs for one PR
pub async fn list_files(pool: &PgPool, pr_id: &str) -> Result<Vec<PrFile>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT pr_id, path, additions, deletions
        FROM raw_pull_request_files
        WHERE pr_id = $1
        ORDER BY path ASC
        "#,
    )
    .bind(pr_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| PrFile {
            pr_id: row.get("pr_id"),
            path: row.get("path"),
            additions: row.get("additions"),
            deletions: row.get("deletions"),
        })
        .collect())
}

fn map_pr(row: sqlx::postgres::PgRow) -> PullRequest {
    let state: String = row.get("state");
    PullRequest {
        id: row.get("id"),
        repository: row.get("repository"),
        number: row.get("number"),
        title: row.get("title"),
        author: row.get("author"),
        state: PrState::from_raw(&state),
        merged: row.get("merged"),
        created_at: row.get("created_at"),
        merged_at: row.get("merged_at"),
        closed_at: row.get("closed_at"),
        additions: row.get("additions"),
        deletions: row.get("deletions"),
        changed_files: row.get("changed_files"),
        body: row.get("body"),
    }
}
