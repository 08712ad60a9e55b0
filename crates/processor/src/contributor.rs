//! Per-contributor scoring engine
//!
//! Fetches one contributor's raw activity for a window, runs the pure
//! per-signal scoring functions, and persists the derived user record and
//! tag scores. Holds no state across invocations beyond the configuration
//! it is called with.

use std::collections::HashMap;

use common::models::{Comment, ContributorMetrics, PrFile};
use common::{PipelineConfig, TimeWindow};
use sqlx::PgPool;
use tracing::debug;

use crate::db_err;
use crate::{expertise, scoring};

/// Compute full metrics for one contributor in one window
pub async fn score_contributor(
    pool: &PgPool,
    username: &str,
    window: &TimeWindow,
    repository: &str,
    config: &PipelineConfig,
) -> common::Result<ContributorMetrics> {
    debug!("Processing metrics for {}", username);

    let since = window.since();
    let until = window.until();

    let profile = db::users::get_by_username(pool, username)
        .await
        .map_err(db_err)?;

    let prs = db::prs::list_by_author(pool, repository, username, since, until)
        .await
        .map_err(db_err)?;

    let mut files_by_pr: HashMap<String, Vec<PrFile>> = HashMap::new();
    for pr in &prs {
        let files = db::prs::list_files(pool, &pr.id).await.map_err(db_err)?;
        files_by_pr.insert(pr.id.clone(), files);
    }

    let issues = db::issues::list_by_author(pool, repository, username, since, until)
        .await
        .map_err(db_err)?;

    let mut comments_by_issue: HashMap<String, Vec<Comment>> = HashMap::new();
    for issue in &issues {
        let comments = db::comments::issue_comments_for_issue(pool, &issue.id)
            .await
            .map_err(db_err)?;
        comments_by_issue.insert(issue.id.clone(), comments);
    }

    let reviews = db::reviews::list_by_author(pool, repository, username, since, until)
        .await
        .map_err(db_err)?;

    let pr_comments = db::comments::pr_comments_by_author(pool, repository, username, since, until)
        .await
        .map_err(db_err)?;

    let pr_outcome =
        scoring::score_pull_requests(&prs, &files_by_pr, &config.tags, &config.scoring);
    let issue_outcome = scoring::score_issues(&issues, &comments_by_issue, &config.scoring);
    let review_outcome = scoring::score_reviews(&reviews, &config.scoring);
    let comment_outcome = scoring::score_pr_comments(&pr_comments, &config.scoring);
    let code_score =
        scoring::score_code_changes(&pr_outcome.code_changes, &pr_outcome.file_paths, &config.scoring);

    let expertise_areas =
        expertise::classify(&pr_outcome.file_paths, &pr_outcome.pr_titles, &config.tags);
    expertise::persist(pool, username, &expertise_areas).await?;

    let score = scoring::composite_score(
        pr_outcome.score,
        issue_outcome.score,
        review_outcome.score,
        comment_outcome.score,
        code_score,
    );

    let mut comments = comment_outcome.stats;
    comments.issues = issue_outcome.comment_stats.issues;
    comments.total += issue_outcome.comment_stats.total;

    let metrics = ContributorMetrics {
        username: username.to_string(),
        avatar_url: profile.and_then(|p| p.avatar_url),
        score,
        pull_requests: pr_outcome.stats,
        issues: issue_outcome.stats,
        reviews: review_outcome.stats,
        comments,
        code_changes: pr_outcome.code_changes,
        focus_areas: scoring::focus_areas(&pr_outcome.file_paths),
        file_types: scoring::file_types(&pr_outcome.file_paths),
        expertise_areas,
    };

    db::users::upsert(pool, username, metrics.avatar_url.as_deref(), metrics.score)
        .await
        .map_err(db_err)?;

    Ok(metrics)
}
