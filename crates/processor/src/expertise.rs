//! Tag-based expertise classification
//!
//! Free-text signals (file paths, PR titles) accumulate into per-tag
//! scores, which bucket into levels on a logarithmic scale: level L spans
//! scores [2^L - 1, 2^(L+1) - 1).

use std::cmp::Ordering;

use common::models::TagAssessment;
use common::tags::TagRuleSet;
use sqlx::PgPool;

use crate::db_err;

/// Classify a contributor's expertise from their window of activity.
///
/// Every pattern hit accumulates the rule's weight: a path matching two
/// patterns of the same rule contributes twice. TECH rules match both
/// file paths and PR titles. Tags that scored nothing are dropped; the
/// result is sorted by raw score, highest first.
pub fn classify(
    file_paths: &[String],
    pr_titles: &[String],
    rules: &TagRuleSet,
) -> Vec<TagAssessment> {
    let mut assessments = Vec::new();

    for rule in rules.iter_all() {
        let mut score = 0.0;

        if rule.category.matches_paths() {
            for path in file_paths {
                score += rule.path_hits(path) as f64 * rule.weight;
            }
        }

        if rule.category.matches_titles() {
            for title in pr_titles {
                score += rule.title_hits(title) as f64 * rule.weight;
            }
        }

        if score > 0.0 {
            let level = level_for(score);
            assessments.push(TagAssessment {
                tag: rule.name.clone(),
                category: rule.category,
                score,
                level,
                progress: progress_at(score, level),
            });
        }
    }

    assessments.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.tag.cmp(&b.tag))
    });

    assessments
}

/// level = floor(log2(score + 1))
pub fn level_for(score: f64) -> i32 {
    (score + 1.0).log2().floor() as i32
}

/// Fractional progress from the current level threshold (2^level - 1)
/// toward the next (2^(level+1) - 1), capped at 1
pub fn progress_at(score: f64, level: i32) -> f64 {
    let current = 2.0_f64.powi(level) - 1.0;
    let next = 2.0_f64.powi(level + 1) - 1.0;
    ((score - current) / (next - current)).min(1.0)
}

/// Score needed to reach the next level
pub fn points_to_next(level: i32) -> f64 {
    2.0_f64.powi(level + 1) - 1.0
}

/// Upsert the tag catalog entries and per-(username, tag) scores for a
/// run. Stored tag scores reflect only this window; each run replaces the
/// previous values.
pub async fn persist(
    pool: &PgPool,
    username: &str,
    assessments: &[TagAssessment],
) -> common::Result<()> {
    for assessment in assessments {
        db::tags::upsert_tag(pool, &assessment.tag, assessment.category.as_str())
            .await
            .map_err(db_err)?;

        db::tags::upsert_user_tag_score(
            pool,
            username,
            &assessment.tag,
            assessment.score,
            assessment.level,
            assessment.progress,
            points_to_next(assessment.level),
        )
        .await
        .map_err(db_err)?;
    }

    Ok(())
}
