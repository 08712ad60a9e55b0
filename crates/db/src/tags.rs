//! Tag catalog and per-user tag score queries

use sqlx::PgPool;

/// Ensure a tag exists in the catalog
pub async fn upsert_tag(pool: &PgPool, name: &str, category: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO tags (name, category, description, created_at, last_updated)
        VALUES ($1, $2, '', NOW(), NOW())
        ON CONFLICT (name) DO UPDATE
        SET last_updated = NOW()
        "#,
    )
    .bind(name)
    .bind(category)
    .execute(pool)
    .await?;

    Ok(())
}

/// Upsert a per-(username, tag) score. The stored values reflect only the
/// current window's activity; each run replaces the previous row rather
/// than accumulating into it.
pub async fn upsert_user_tag_score(
    pool: &PgPool,
    username: &str,
    tag: &str,
    score: f64,
    level: i32,
    progress: f64,
    points_to_next: f64,
) -> Result<(), sqlx::Error> {
    let id = format!("{username}_{tag}");
    sqlx::query(
        r#"
        INSERT INTO user_tag_scores
            (id, username, tag, score, level, progress, points_to_next, last_updated)
        VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
        ON CONFLICT (id) DO UPDATE
        SET score = EXCLUDED.score,
            level = EXCLUDED.level,
            progress = EXCLUDED.progress,
            points_to_next = EXCLUDED.points_to_next,
            last_updated = NOW()
        "#,
    )
    .bind(id)
    .bind(username)
    .bind(tag)
    .bind(score)
    .bind(level)
    .bind(progress)
    .bind(points_to_next)
    .execute(pool)
    .await?;

    Ok(())
}
