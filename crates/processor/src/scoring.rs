//! Per-signal scoring algorithms
//!
//! One independent pure function per signal type. Each returns its scalar
//! contribution plus the side collections later stages need (file paths,
//! PR titles, code-change totals); the engine sums the scalars into the
//! composite score.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use common::models::{
    CodeChanges, Comment, CommentStats, FileTypeStat, FocusArea, Issue, IssueItem, IssueState,
    IssueStats, PrFile, PrItem, PrState, PullRequest, PullRequestStats, Review, ReviewState,
    ReviewStats, decode_labels,
};
use common::scoring::ScoringConfig;
use common::tags::TagRuleSet;

/// Result of scoring a contributor's pull requests
#[derive(Debug, Clone, Default)]
pub struct PrOutcome {
    pub score: f64,
    pub stats: PullRequestStats,
    pub code_changes: CodeChanges,
    pub file_paths: Vec<String>,
    pub pr_titles: Vec<String>,
}

/// Result of scoring a contributor's issues
#[derive(Debug, Clone, Default)]
pub struct IssueOutcome {
    pub score: f64,
    pub stats: IssueStats,
    /// Issue-comment counts only; PR comments come from [`score_pr_comments`]
    pub comment_stats: CommentStats,
}

/// Result of scoring a contributor's reviews
#[derive(Debug, Clone, Default)]
pub struct ReviewOutcome {
    pub score: f64,
    pub stats: ReviewStats,
}

/// Result of scoring a contributor's PR comments
#[derive(Debug, Clone, Default)]
pub struct CommentOutcome {
    pub score: f64,
    pub stats: CommentStats,
}

/// Score pull requests with a per-day cap.
///
/// PRs beyond `max_per_day` for a calendar day (UTC, in creation order)
/// are excluded from processing entirely: they are not scored, not
/// counted in any bucket, and contribute no files.
pub fn score_pull_requests(
    prs: &[PullRequest],
    files_by_pr: &HashMap<String, Vec<PrFile>>,
    rules: &TagRuleSet,
    config: &ScoringConfig,
) -> PrOutcome {
    let cfg = &config.pull_request;
    let mut outcome = PrOutcome::default();
    let mut processed_per_day: HashMap<NaiveDate, usize> = HashMap::new();

    for pr in prs {
        let day = pr.created_at.date_naive();
        let processed = processed_per_day.entry(day).or_insert(0);
        if *processed >= cfg.max_per_day {
            continue;
        }
        *processed += 1;

        outcome.stats.total += 1;
        if pr.merged {
            outcome.stats.merged += 1;
        } else if pr.state == PrState::Open {
            outcome.stats.open += 1;
        } else {
            outcome.stats.closed += 1;
        }
        outcome.stats.items.push(PrItem {
            id: pr.id.clone(),
            number: pr.number,
            title: pr.title.clone(),
            merged: pr.merged,
            additions: pr.additions,
            deletions: pr.deletions,
        });
        outcome.pr_titles.push(pr.title.clone());

        // Highest matching area weight wins; a PR touching nothing tagged
        // scores at 1.0
        let mut area_multiplier: Option<f64> = None;

        let files = files_by_pr.get(&pr.id).map(Vec::as_slice).unwrap_or(&[]);
        for file in files {
            outcome.file_paths.push(file.path.clone());
            outcome.code_changes.files += 1;
            outcome.code_changes.additions += file.additions;
            outcome.code_changes.deletions += file.deletions;

            for rule in rules.area_rules() {
                if rule.matches_path(&file.path) {
                    area_multiplier =
                        Some(area_multiplier.map_or(rule.weight, |m| m.max(rule.weight)));
                }
            }
        }

        let mut base = cfg.base;
        if pr.merged {
            base += cfg.merged;
        }

        let body_len = pr.body.as_deref().map_or(0, str::len) as f64;
        let description = (body_len * cfg.description_multiplier).min(10.0);

        let total_changes = pr.additions + pr.deletions;
        let complexity = pr.changed_files.min(10) as f64
            * ((total_changes.min(1000) as f64) + 1.0).ln();
        let complexity_score = complexity * cfg.complexity_multiplier;

        let size_bonus = if (100..=500).contains(&total_changes) {
            cfg.optimal_size_bonus
        } else if total_changes > 1000 {
            -5.0
        } else {
            0.0
        };

        let pr_score = base + description + complexity_score + size_bonus;
        outcome.score += pr_score * area_multiplier.unwrap_or(1.0);
    }

    outcome
}

/// Score issues: base scaled by the product of label multipliers, with a
/// closed bonus and a resolution-speed multiplier for resolved issues.
/// All comments on an issue count toward totals; only the first
/// `max_per_thread` earn points.
pub fn score_issues(
    issues: &[Issue],
    comments_by_issue: &HashMap<String, Vec<Comment>>,
    config: &ScoringConfig,
) -> IssueOutcome {
    let cfg = &config.issue;
    let thread_cap = config.comment.max_per_thread;
    let mut outcome = IssueOutcome::default();

    for issue in issues {
        outcome.stats.total += 1;
        if issue.state == IssueState::Open {
            outcome.stats.open += 1;
        } else {
            outcome.stats.closed += 1;
        }
        outcome.stats.items.push(IssueItem {
            id: issue.id.clone(),
            number: issue.number,
            title: issue.title.clone(),
            state: issue.state,
        });

        let mut points = cfg.base;

        for label in decode_labels(&issue.labels) {
            let multiplier = cfg
                .with_labels_multiplier
                .get(&label.to_lowercase())
                .copied()
                .unwrap_or(1.0);
            points *= multiplier;
        }

        if issue.state == IssueState::Closed {
            if let Some(closed_at) = issue.closed_at {
                points += cfg.closed_bonus;

                // Faster resolution earns a higher multiplier, floored at 0.5
                let resolution_days =
                    (closed_at - issue.created_at).num_seconds() as f64 / 86_400.0;
                let speed_multiplier = (cfg.resolution_speed_multiplier
                    * (10.0 / (resolution_days + 1.0)))
                    .max(0.5);
                points *= speed_multiplier;
            }
        }

        outcome.score += points;

        if let Some(comments) = comments_by_issue.get(&issue.id) {
            if !comments.is_empty() {
                let effective = comments.len().min(thread_cap);
                outcome.comment_stats.issues += comments.len() as i64;
                outcome.comment_stats.total += comments.len() as i64;
                outcome.score += effective as f64 * cfg.per_comment;
            }
        }
    }

    outcome
}

/// Score reviews with a per-day cap. Reviews beyond `max_per_day` for a
/// submission day are neither scored nor counted.
pub fn score_reviews(reviews: &[Review], config: &ScoringConfig) -> ReviewOutcome {
    let cfg = &config.review;
    let mut outcome = ReviewOutcome::default();
    let mut scored_per_day: HashMap<NaiveDate, usize> = HashMap::new();

    for review in reviews {
        let day = review.submitted_at.date_naive();
        let scored = scored_per_day.entry(day).or_insert(0);
        if *scored >= cfg.max_per_day {
            continue;
        }
        *scored += 1;

        outcome.stats.total += 1;

        let body_len = review.body.as_deref().map_or(0, str::len);
        let mut thoroughness = 1.0;
        if body_len > 100 {
            thoroughness = cfg.thoroughness_multiplier;
        }

        let mut base = cfg.base;
        match review.state {
            ReviewState::Approved => {
                outcome.stats.approved += 1;
                base += cfg.approved;
            }
            ReviewState::ChangesRequested => {
                outcome.stats.changes_requested += 1;
                base += cfg.changes_requested;
                // Change requests with detailed feedback are valued higher
                if body_len > 200 {
                    thoroughness *= 1.5;
                }
            }
            ReviewState::Commented => {
                outcome.stats.commented += 1;
                base += cfg.commented;
            }
        }

        let detailed_feedback = (body_len as f64 * cfg.detailed_feedback_multiplier).min(8.0);

        outcome.score += (base + detailed_feedback) * thoroughness;
    }

    outcome
}

/// Score PR comments with per-thread diminishing returns. All comments
/// count toward totals; only the first `max_per_thread` per thread are
/// scored, each at `base x factor` plus a capped substantive-content
/// bonus, with the factor decaying after every scored comment.
pub fn score_pr_comments(comments: &[Comment], config: &ScoringConfig) -> CommentOutcome {
    let cfg = &config.comment;
    let mut outcome = CommentOutcome::default();

    let mut threads: HashMap<&str, Vec<&Comment>> = HashMap::new();
    for comment in comments {
        threads
            .entry(comment.parent_id.as_str())
            .or_default()
            .push(comment);
    }

    for (_pr_id, mut thread) in threads {
        thread.sort_by_key(|comment| comment.created_at);

        let mut factor = 1.0_f64;
        for (index, comment) in thread.iter().enumerate() {
            outcome.stats.pull_requests += 1;
            outcome.stats.total += 1;

            if index >= cfg.max_per_thread {
                continue;
            }

            let body_len = comment.body.as_deref().map_or(0, str::len) as f64;
            let base = cfg.base * factor;
            let substantive = (body_len * cfg.substantive_multiplier).min(3.0 * factor);

            outcome.score += base + substantive;
            factor *= cfg.diminishing_returns;
        }
    }

    outcome
}

/// Score aggregated code changes. Additions and deletions are capped
/// before weighting so oversized PRs cannot dominate; touched test files
/// earn a coverage bonus.
pub fn score_code_changes(
    code_changes: &CodeChanges,
    file_paths: &[String],
    config: &ScoringConfig,
) -> f64 {
    let cfg = &config.code_change;

    let capped_additions = code_changes.additions.min(cfg.max_lines) as f64;
    let capped_deletions = code_changes.deletions.min(cfg.max_lines) as f64;

    let mut score = capped_additions * cfg.per_line_addition
        + capped_deletions * cfg.per_line_deletion
        + code_changes.files as f64 * cfg.per_file;

    let test_file_count = file_paths
        .iter()
        .filter(|path| {
            path.contains(".test.")
                || path.contains(".spec.")
                || path.contains("/__tests__/")
                || path.contains("/test/")
        })
        .count();

    if test_file_count > 0 {
        score += test_file_count as f64 * cfg.test_coverage_bonus;
    }

    score
}

/// Top-5 directories by touched-file count. Paths without a directory
/// component are excluded from both the counts and the percentage base.
pub fn focus_areas(file_paths: &[String]) -> Vec<FocusArea> {
    let mut dir_counts: HashMap<String, i64> = HashMap::new();
    let mut total = 0_i64;

    for path in file_paths {
        if let Some((dir, _file)) = path.rsplit_once('/') {
            *dir_counts.entry(dir.to_string()).or_insert(0) += 1;
            total += 1;
        }
    }

    let mut areas: Vec<FocusArea> = dir_counts
        .into_iter()
        .map(|(area, count)| FocusArea {
            area,
            count,
            percentage: percentage(count, total),
        })
        .collect();

    areas.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.area.cmp(&b.area)));
    areas.truncate(5);
    areas
}

/// Top-5 file extensions by touched-file count
pub fn file_types(file_paths: &[String]) -> Vec<FileTypeStat> {
    let mut extension_counts: HashMap<String, i64> = HashMap::new();
    let mut total = 0_i64;

    for path in file_paths {
        if let Some(extension) = Path::new(path).extension().and_then(|e| e.to_str()) {
            *extension_counts.entry(extension.to_string()).or_insert(0) += 1;
            total += 1;
        }
    }

    let mut types: Vec<FileTypeStat> = extension_counts
        .into_iter()
        .map(|(extension, count)| FileTypeStat {
            extension,
            count,
            percentage: percentage(count, total),
        })
        .collect();

    types.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.extension.cmp(&b.extension)));
    types.truncate(5);
    types
}

/// Round the summed per-signal contributions to the final integer score.
/// Negative contributions are allowed to pull the total down; nothing
/// clamps at zero.
pub fn composite_score(
    pr_score: f64,
    issue_score: f64,
    review_score: f64,
    comment_score: f64,
    code_score: f64,
) -> i64 {
    (pr_score + issue_score + review_score + comment_score + code_score).round() as i64
}

fn percentage(count: i64, total: i64) -> i64 {
    if total > 0 {
        ((count as f64 / total as f64) * 100.0).round() as i64
    } else {
        0
    }
}
