//! Domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tags::TagCategory;

/// A pull request as recorded by the ingest layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: String,
    pub repository: String,
    pub number: i32,
    pub title: String,
    pub author: Option<String>,
    pub state: PrState,
    pub merged: bool,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub additions: i64,
    pub deletions: i64,
    pub changed_files: i64,
    pub body: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    Open,
    Closed,
    Merged,
}

impl PrState {
    /// Parse the raw state string stored by the ingest layer.
    pub fn from_raw(raw: &str) -> Self {
        match raw.to_uppercase().as_str() {
            "MERGED" => Self::Merged,
            "CLOSED" => Self::Closed,
            _ => Self::Open,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
            Self::Merged => "MERGED",
        }
    }
}

/// A single file diff within a pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrFile {
    pub pr_id: String,
    pub path: String,
    pub additions: i64,
    pub deletions: i64,
}

/// An issue as recorded by the ingest layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub repository: String,
    pub number: i32,
    pub title: String,
    pub author: Option<String>,
    pub state: IssueState,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    /// Serialized label list, decoded on demand via [`decode_labels`]
    pub labels: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    pub fn from_raw(raw: &str) -> Self {
        match raw.to_uppercase().as_str() {
            "CLOSED" => Self::Closed,
            _ => Self::Open,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
        }
    }
}

/// A PR review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub pr_id: String,
    pub author: Option<String>,
    pub state: ReviewState,
    pub body: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
}

impl ReviewState {
    /// Anything that is not an approval or a change request counts as a
    /// plain comment review.
    pub fn from_raw(raw: &str) -> Self {
        match raw.to_uppercase().as_str() {
            "APPROVED" => Self::Approved,
            "CHANGES_REQUESTED" => Self::ChangesRequested,
            _ => Self::Commented,
        }
    }
}

/// A comment on a PR or an issue; `parent_id` points at the parent record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub parent_id: String,
    pub author: Option<String>,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A contributor profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub avatar_url: Option<String>,
    pub score: i64,
    pub last_updated: DateTime<Utc>,
}

/// Decode the serialized label list stored on an issue.
///
/// Accepts both `[{"name": "bug"}]` and `["bug"]` shapes. Malformed input
/// decodes to an empty list rather than failing the record.
pub fn decode_labels(raw: &str) -> Vec<String> {
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(_) => return Vec::new(),
    };
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(map) => map
                .get("name")
                .and_then(|n| n.as_str())
                .map(str::to_owned),
            _ => None,
        })
        .collect()
}

/// Full per-contributor output of a scoring run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContributorMetrics {
    pub username: String,
    pub avatar_url: Option<String>,
    pub score: i64,
    pub pull_requests: PullRequestStats,
    pub issues: IssueStats,
    pub reviews: ReviewStats,
    pub comments: CommentStats,
    pub code_changes: CodeChanges,
    pub focus_areas: Vec<FocusArea>,
    pub file_types: Vec<FileTypeStat>,
    pub expertise_areas: Vec<TagAssessment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PullRequestStats {
    pub total: i64,
    pub merged: i64,
    pub open: i64,
    pub closed: i64,
    pub items: Vec<PrItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrItem {
    pub id: String,
    pub number: i32,
    pub title: String,
    pub merged: bool,
    pub additions: i64,
    pub deletions: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueStats {
    pub total: i64,
    pub open: i64,
    pub closed: i64,
    pub items: Vec<IssueItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueItem {
    pub id: String,
    pub number: i32,
    pub title: String,
    pub state: IssueState,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewStats {
    pub total: i64,
    pub approved: i64,
    pub changes_requested: i64,
    pub commented: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentStats {
    pub total: i64,
    pub pull_requests: i64,
    pub issues: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeChanges {
    pub additions: i64,
    pub deletions: i64,
    pub files: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusArea {
    pub area: String,
    pub count: i64,
    pub percentage: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTypeStat {
    pub extension: String,
    pub count: i64,
    pub percentage: i64,
}

/// A leveled expertise classification for one tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagAssessment {
    pub tag: String,
    pub category: TagCategory,
    pub score: f64,
    pub level: i32,
    pub progress: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_labels_object_shape() {
        let labels = decode_labels(r#"[{"name": "bug"}, {"name": "P1"}]"#);
        assert_eq!(labels, vec!["bug".to_string(), "P1".to_string()]);
    }

    #[test]
    fn test_decode_labels_string_shape() {
        let labels = decode_labels(r#"["bug", "enhancement"]"#);
        assert_eq!(labels, vec!["bug".to_string(), "enhancement".to_string()]);
    }

    #[test]
    fn test_decode_labels_malformed_is_empty() {
        assert!(decode_labels("not json").is_empty());
        assert!(decode_labels("{\"name\": \"bug\"}").is_empty());
        assert!(decode_labels("").is_empty());
    }

    #[test]
    fn test_decode_labels_skips_unusable_entries() {
        let labels = decode_labels(r#"[{"name": "bug"}, 42, {"id": 7}]"#);
        assert_eq!(labels, vec!["bug".to_string()]);
    }

    #[test]
    fn test_pr_state_from_raw() {
        assert_eq!(PrState::from_raw("merged"), PrState::Merged);
        assert_eq!(PrState::from_raw("CLOSED"), PrState::Closed);
        assert_eq!(PrState::from_raw("open"), PrState::Open);
        assert_eq!(PrState::from_raw("anything"), PrState::Open);
    }

    #[test]
    fn test_review_state_default_bucket() {
        assert_eq!(ReviewState::from_raw("APPROVED"), ReviewState::Approved);
        assert_eq!(
            ReviewState::from_raw("changes_requested"),
            ReviewState::ChangesRequested
        );
        assert_eq!(ReviewState::from_raw("DISMISSED"), ReviewState::Commented);
        assert_eq!(ReviewState::from_raw("PENDING"), ReviewState::Commented);
    }
}
