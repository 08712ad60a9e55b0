//! Per-signal activity counts for contributor discovery

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

/// PR authors with counts within a window
pub async fn pr_author_counts(
    pool: &PgPool,
    repository: &str,
    since: DateTime<Utc>,
    until: DateTime<Utc>,
) -> Result<Vec<(String, i64)>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT author, COUNT(*) AS count
        FROM raw_pull_requests
        WHERE repository = $1
          AND created_at >= $2 AND created_at < $3
          AND author IS NOT NULL
        GROUP BY author
        "#,
    )
    .bind(repository)
    .bind(since)
    .bind(until)
    .fetch_all(pool)
    .await?;

    Ok(collect_counts(rows))
}

/// Issue authors with counts within a window
pub async fn issue_author_counts(
    pool: &PgPool,
    repository: &str,
    since: DateTime<Utc>,
    until: DateTime<Utc>,
) -> Result<Vec<(String, i64)>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT author, COUNT(*) AS count
        FROM raw_issues
        WHERE repository = $1
          AND created_at >= $2 AND created_at < $3
          AND author IS NOT NULL
        GROUP BY author
        "#,
    )
    .bind(repository)
    .bind(since)
    .bind(until)
    .fetch_all(pool)
    .await?;

    Ok(collect_counts(rows))
}

/// Review authors with counts; reviews are scoped to the repository via
/// their parent PR
pub async fn review_author_counts(
    pool: &PgPool,
    repository: &str,
    since: DateTime<Utc>,
    until: DateTime<Utc>,
) -> Result<Vec<(String, i64)>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT r.author, COUNT(*) AS count
        FROM pr_reviews r
        INNER JOIN raw_pull_requests pr ON pr.id = r.pr_id
        WHERE pr.repository = $1
          AND r.submitted_at >= $2 AND r.submitted_at < $3
          AND r.author IS NOT NULL
        GROUP BY r.author
        "#,
    )
    .bind(repository)
    .bind(since)
    .bind(until)
    .fetch_all(pool)
    .await?;

    Ok(collect_counts(rows))
}

/// PR comment authors with counts
pub async fn pr_comment_author_counts(
    pool: &PgPool,
    repository: &str,
    since: DateTime<Utc>,
    until: DateTime<Utc>,
) -> Result<Vec<(String, i64)>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT c.author, COUNT(*) AS count
        FROM pr_comments c
        INNER JOIN raw_pull_requests pr ON pr.id = c.pr_id
        WHERE pr.repository = $1
          AND c.created_at >= $2 AND c.created_at < $3
          AND c.author IS NOT NULL
        GROUP BY c.author
        "#,
    )
    .bind(repository)
    .bind(since)
    .bind(until)
    .fetch_all(pool)
    .await?;

    Ok(collect_counts(rows))
}

/// Issue comment authors with counts
pub async fn issue_comment_author_counts(
    pool: &PgPool,
    repository: &str,
    since: DateTime<Utc>,
    until: DateTime<Utc>,
) -> Result<Vec<(String, i64)>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT c.author, COUNT(*) AS count
        FROM issue_comments c
        INNER JOIN raw_issues i ON i.id = c.issue_id
        WHERE i.repository = $1
          AND c.created_at >= $2 AND c.created_at < $3
          AND c.author IS NOT NULL
        GROUP BY c.author
        "#,
    )
    .bind(repository)
    .bind(since)
    .bind(until)
    .fetch_all(pool)
    .await?;

    Ok(collect_counts(rows))
}

fn collect_counts(rows: Vec<sqlx::postgres::PgRow>) -> Vec<(String, i64)> {
    rows.into_iter()
        .map(|row| (row.get("author"), row.get("count")))
        .collect()
}
