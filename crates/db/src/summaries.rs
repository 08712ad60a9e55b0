//! Per-(user, date, interval) summary records

use sqlx::{PgPool, Row};

/// A stored summary row
#[derive(Debug, Clone)]
pub struct SummaryRecord {
    pub id: String,
    pub username: String,
    pub date: String,
    pub interval_type: String,
    pub score: i64,
    pub summary: String,
    pub total_prs: i64,
    pub additions: i64,
    pub deletions: i64,
    pub changed_files: i64,
    /// Serialized PR item list
    pub pull_requests: String,
    /// Serialized issue item list
    pub issues: String,
}

impl SummaryRecord {
    /// Idempotent key for a (username, date, interval) triple
    pub fn make_id(username: &str, date: &str, interval_type: &str) -> String {
        format!("{username}_{date}_{interval_type}")
    }
}

/// Whether a non-empty summary text already exists for this key
pub async fn has_nonempty_summary(
    pool: &PgPool,
    username: &str,
    date: &str,
    interval_type: &str,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT summary
        FROM user_summaries
        WHERE username = $1 AND date = $2 AND interval_type = $3
        "#,
    )
    .bind(username)
    .bind(date)
    .bind(interval_type)
    .fetch_optional(pool)
    .await?;

    Ok(row
        .map(|row| !row.get::<String, _>("summary").is_empty())
        .unwrap_or(false))
}

/// Upsert a summary record. The summary text is only overwritten when the
/// incoming record carries a freshly generated one; numeric totals and
/// item lists always reflect the latest run.
pub async fn upsert(pool: &PgPool, record: &SummaryRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO user_summaries
            (id, username, date, interval_type, score, summary,
             total_prs, additions, deletions, changed_files,
             pull_requests, issues)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        ON CONFLICT (id) DO UPDATE
        SET score = EXCLUDED.score,
            summary = CASE
                WHEN EXCLUDED.summary <> '' THEN EXCLUDED.summary
                ELSE user_summaries.summary
            END,
            total_prs = EXCLUDED.total_prs,
            additions = EXCLUDED.additions,
            deletions = EXCLUDED.deletions,
            changed_files = EXCLUDED.changed_files,
            pull_requests = EXCLUDED.pull_requests,
            issues = EXCLUDED.issues
        "#,
    )
    .bind(&record.id)
    .bind(&record.username)
    .bind(&record.date)
    .bind(&record.interval_type)
    .bind(record.score)
    .bind(&record.summary)
    .bind(record.total_prs)
    .bind(record.additions)
    .bind(record.deletions)
    .bind(record.changed_files)
    .bind(&record.pull_requests)
    .bind(&record.issues)
    .execute(pool)
    .await?;

    Ok(())
}

/// All summaries for a date and interval, highest score first
pub async fn list_for_date(
    pool: &PgPool,
    date: &str,
    interval_type: &str,
) -> Result<Vec<SummaryRecord>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, username, date, interval_type, score, summary,
               total_prs, additions, deletions, changed_files,
               pull_requests, issues
        FROM user_summaries
        WHERE date = $1 AND interval_type = $2
        ORDER BY score DESC
        "#,
    )
    .bind(date)
    .bind(interval_type)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| SummaryRecord {
            id: row.get("id"),
            username: row.get("username"),
            date: row.get("date"),
            interval_type: row.get("interval_type"),
            score: row.get("score"),
            summary: row.get("summary"),
            total_prs: row.get("total_prs"),
            additions: row.get("additions"),
            deletions: row.get("deletions"),
            changed_files: row.get("changed_files"),
            pull_requests: row.get("pull_requests"),
            issues: row.get("issues"),
        })
        .collect())
}
