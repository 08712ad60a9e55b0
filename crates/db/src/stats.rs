//! Rolling per-user stats
//!
//! Counters accumulate across runs (`current + delta`); the file-type and
//! focus-area snapshots are replaced wholesale each run. This asymmetry
//! mirrors the tag-score model: snapshots describe recent activity,
//! counters describe lifetime totals.

use sqlx::{PgPool, Row};

/// One run's contribution to a user's rolling stats
#[derive(Debug, Clone, Default)]
pub struct StatsDelta {
    pub total_prs: i64,
    pub merged_prs: i64,
    pub closed_prs: i64,
    pub total_files: i64,
    pub total_additions: i64,
    pub total_deletions: i64,
    /// Serialized extension -> count map snapshot
    pub files_by_type: String,
    /// Serialized [area, count] pair list snapshot
    pub focus_areas: String,
}

/// A stored stats row
#[derive(Debug, Clone)]
pub struct UserStatsRecord {
    pub username: String,
    pub total_prs: i64,
    pub merged_prs: i64,
    pub closed_prs: i64,
    pub total_files: i64,
    pub total_additions: i64,
    pub total_deletions: i64,
    pub files_by_type: String,
    pub focus_areas: String,
}

/// Add a run's delta to the cumulative counters and replace the snapshots
pub async fn upsert_additive(
    pool: &PgPool,
    username: &str,
    delta: &StatsDelta,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO user_stats
            (username, total_prs, merged_prs, closed_prs,
             total_files, total_additions, total_deletions,
             files_by_type, focus_areas, last_updated)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
        ON CONFLICT (username) DO UPDATE
        SET total_prs = user_stats.total_prs + EXCLUDED.total_prs,
            merged_prs = user_stats.merged_prs + EXCLUDED.merged_prs,
            closed_prs = user_stats.closed_prs + EXCLUDED.closed_prs,
            total_files = user_stats.total_files + EXCLUDED.total_files,
            total_additions = user_stats.total_additions + EXCLUDED.total_additions,
            total_deletions = user_stats.total_deletions + EXCLUDED.total_deletions,
            files_by_type = EXCLUDED.files_by_type,
            focus_areas = EXCLUDED.focus_areas,
            last_updated = NOW()
        "#,
    )
    .bind(username)
    .bind(delta.total_prs)
    .bind(delta.merged_prs)
    .bind(delta.closed_prs)
    .bind(delta.total_files)
    .bind(delta.total_additions)
    .bind(delta.total_deletions)
    .bind(&delta.files_by_type)
    .bind(&delta.focus_areas)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a user's stats row
pub async fn get(pool: &PgPool, username: &str) -> Result<Option<UserStatsRecord>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT username, total_prs, merged_prs, closed_prs,
               total_files, total_additions, total_deletions,
               files_by_type, focus_areas
        FROM user_stats
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| UserStatsRecord {
        username: row.get("username"),
        total_prs: row.get("total_prs"),
        merged_prs: row.get("merged_prs"),
        closed_prs: row.get("closed_prs"),
        total_files: row.get("total_files"),
        total_additions: row.get("total_additions"),
        total_deletions: row.get("total_deletions"),
        files_by_type: row.get("files_by_type"),
        focus_areas: row.get("focus_areas"),
    }))
}
