//! Scoring configuration
//!
//! Every field has a default so an operator config only needs to override
//! the weights it cares about. The fixed caps of the algorithm itself
//! (description bonus ceiling, complexity clamps, size windows) live in the
//! processor, not here.

use std::collections::HashMap;

use serde::Deserialize;

/// Per-signal scoring weights, caps and multipliers
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub pull_request: PullRequestScoring,
    pub issue: IssueScoring,
    pub review: ReviewScoring,
    pub comment: CommentScoring,
    pub code_change: CodeChangeScoring,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PullRequestScoring {
    pub base: f64,
    /// Bonus on top of `base` when the PR was merged
    pub merged: f64,
    pub description_multiplier: f64,
    pub complexity_multiplier: f64,
    pub optimal_size_bonus: f64,
    /// PRs beyond this count on a single calendar day are not processed
    pub max_per_day: usize,
}

impl Default for PullRequestScoring {
    fn default() -> Self {
        Self {
            base: 2.0,
            merged: 5.0,
            description_multiplier: 0.01,
            complexity_multiplier: 0.5,
            optimal_size_bonus: 5.0,
            max_per_day: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IssueScoring {
    pub base: f64,
    pub closed_bonus: f64,
    pub resolution_speed_multiplier: f64,
    pub per_comment: f64,
    /// Label name (lowercase) to score multiplier; absent labels multiply by 1
    pub with_labels_multiplier: HashMap<String, f64>,
}

impl Default for IssueScoring {
    fn default() -> Self {
        Self {
            base: 3.0,
            closed_bonus: 5.0,
            resolution_speed_multiplier: 1.0,
            per_comment: 0.5,
            with_labels_multiplier: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReviewScoring {
    pub base: f64,
    pub approved: f64,
    pub changes_requested: f64,
    pub commented: f64,
    pub thoroughness_multiplier: f64,
    pub detailed_feedback_multiplier: f64,
    /// Reviews beyond this count on a single calendar day are not scored
    pub max_per_day: usize,
}

impl Default for ReviewScoring {
    fn default() -> Self {
        Self {
            base: 3.0,
            approved: 2.0,
            changes_requested: 3.0,
            commented: 1.0,
            thoroughness_multiplier: 1.3,
            detailed_feedback_multiplier: 0.02,
            max_per_day: 8,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CommentScoring {
    pub base: f64,
    pub substantive_multiplier: f64,
    /// Multiplicative decay applied after each scored comment in a thread
    pub diminishing_returns: f64,
    /// Comments beyond this count in one thread are counted but not scored
    pub max_per_thread: usize,
}

impl Default for CommentScoring {
    fn default() -> Self {
        Self {
            base: 1.0,
            substantive_multiplier: 0.01,
            diminishing_returns: 0.7,
            max_per_thread: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CodeChangeScoring {
    pub per_line_addition: f64,
    pub per_line_deletion: f64,
    pub per_file: f64,
    /// Additions and deletions are each capped here before weighting
    pub max_lines: i64,
    pub test_coverage_bonus: f64,
}

impl Default for CodeChangeScoring {
    fn default() -> Self {
        Self {
            per_line_addition: 0.01,
            per_line_deletion: 0.02,
            per_file: 0.1,
            max_lines: 1000,
            test_coverage_bonus: 2.0,
        }
    }
}
