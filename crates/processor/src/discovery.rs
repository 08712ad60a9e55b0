//! Active contributor discovery
//!
//! A contributor counts as active for a window when they authored a PR or
//! an issue, gave a review, or commented at all. Sentinel identities and
//! configured bots are excluded regardless of their activity volume.

use std::collections::HashMap;

use common::TimeWindow;
use sqlx::PgPool;
use tracing::debug;

use crate::db_err;

/// Placeholder usernames the forge uses for unknown or deleted accounts
pub const SENTINEL_USERNAMES: &[&str] = &["unknown", "[deleted]"];

/// Merged per-signal activity counts for one username
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityCounts {
    pub prs: i64,
    pub issues: i64,
    pub reviews: i64,
    pub pr_comments: i64,
    pub issue_comments: i64,
}

impl ActivityCounts {
    /// Meaningful activity: authored something, reviewed something, or
    /// commented at all. Comment-only contributors are kept with any
    /// nonzero comment count.
    pub fn is_meaningful(&self) -> bool {
        self.prs > 0
            || self.issues > 0
            || self.reviews > 0
            || (self.pr_comments + self.issue_comments) > 0
    }
}

/// Filter merged counts down to valid, meaningful contributors.
/// Order is not significant; callers re-sort by score later.
pub fn filter_active(
    counts: &HashMap<String, ActivityCounts>,
    bot_users: &[String],
) -> Vec<String> {
    let mut active: Vec<String> = counts
        .iter()
        .filter(|(username, counts)| {
            if username.is_empty() || SENTINEL_USERNAMES.contains(&username.as_str()) {
                return false;
            }
            if bot_users.iter().any(|bot| bot == *username) {
                return false;
            }
            counts.is_meaningful()
        })
        .map(|(username, _)| username.clone())
        .collect();
    active.sort();
    active
}

/// Discover the set of contributors with meaningful activity in a window
pub async fn discover_active_contributors(
    pool: &PgPool,
    window: &TimeWindow,
    repository: &str,
    bot_users: &[String],
) -> common::Result<Vec<String>> {
    debug!(
        "Looking for contributors between {} and {} in {}",
        window.start, window.end, repository
    );

    let since = window.since();
    let until = window.until();
    let mut counts: HashMap<String, ActivityCounts> = HashMap::new();

    for (username, count) in db::activity::pr_author_counts(pool, repository, since, until)
        .await
        .map_err(db_err)?
    {
        counts.entry(username).or_default().prs = count;
    }

    for (username, count) in db::activity::issue_author_counts(pool, repository, since, until)
        .await
        .map_err(db_err)?
    {
        counts.entry(username).or_default().issues = count;
    }

    for (username, count) in db::activity::review_author_counts(pool, repository, since, until)
        .await
        .map_err(db_err)?
    {
        counts.entry(username).or_default().reviews = count;
    }

    for (username, count) in db::activity::pr_comment_author_counts(pool, repository, since, until)
        .await
        .map_err(db_err)?
    {
        counts.entry(username).or_default().pr_comments = count;
    }

    for (username, count) in
        db::activity::issue_comment_author_counts(pool, repository, since, until)
            .await
            .map_err(db_err)?
    {
        counts.entry(username).or_default().issue_comments = count;
    }

    debug!("Found {} usernames with any activity", counts.len());

    Ok(filter_active(&counts, bot_users))
}
