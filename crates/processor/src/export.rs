//! JSON snapshot export
//!
//! Writes the day's processed summaries as a "current" artifact plus a
//! dated historical artifact under the data directory.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use common::models::{IssueItem, PrItem};
use common::{Error, IntervalType};
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::db_err;

/// Aggregate metrics over one exported date
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotMetrics {
    pub contributors: i64,
    pub merged_prs: i64,
    pub new_issues: i64,
    pub lines_changed: i64,
}

/// Per-area change breakdown
#[derive(Debug, Clone, Serialize)]
pub struct AreaChange {
    pub name: String,
    pub files: i64,
    pub additions: i64,
    pub deletions: i64,
}

/// A top contributor with their strongest areas
#[derive(Debug, Clone, Serialize)]
pub struct TopContributor {
    pub name: String,
    pub summary: String,
    pub areas: Vec<String>,
}

/// The exported snapshot document
#[derive(Debug, Clone, Serialize)]
pub struct DailySnapshot {
    pub title: String,
    pub overview: String,
    pub metrics: SnapshotMetrics,
    pub areas: Vec<AreaChange>,
    pub top_contributors: Vec<TopContributor>,
}

/// Service for exporting processed summaries to JSON files
pub struct ExportService {
    data_dir: PathBuf,
}

impl ExportService {
    pub fn new(data_dir: impl Into<PathBuf>) -> common::Result<Self> {
        let service = Self {
            data_dir: data_dir.into(),
        };
        service.ensure_directories()?;
        Ok(service)
    }

    fn daily_dir(&self) -> PathBuf {
        self.data_dir.join("daily")
    }

    fn ensure_directories(&self) -> common::Result<()> {
        for dir in [self.daily_dir(), self.daily_dir().join("history")] {
            fs::create_dir_all(&dir)
                .map_err(|e| Error::Export(format!("create {}: {}", dir.display(), e)))?;
        }
        Ok(())
    }

    /// Export the snapshot for one date, both as the current artifact and
    /// into history
    pub async fn export_daily_summary(
        &self,
        pool: &PgPool,
        repository: &str,
        date: &str,
        interval: IntervalType,
    ) -> common::Result<()> {
        let summaries = db::summaries::list_for_date(pool, date, interval.as_str())
            .await
            .map_err(db_err)?;

        if summaries.is_empty() {
            warn!("No summaries found for date {}", date);
            return Ok(());
        }

        let mut merged_prs = 0;
        let mut new_issues = 0;
        let mut lines_changed = 0;
        for summary in &summaries {
            merged_prs += decode_pr_items(&summary.pull_requests)
                .iter()
                .filter(|item| item.merged)
                .count() as i64;
            new_issues += decode_issue_items(&summary.issues).len() as i64;
            lines_changed += summary.additions + summary.deletions;
        }

        let metrics = SnapshotMetrics {
            contributors: summaries.len() as i64,
            merged_prs,
            new_issues,
            lines_changed,
        };

        let mut top_contributors = Vec::new();
        for summary in summaries.iter().take(3) {
            let stats = db::stats::get(pool, &summary.username)
                .await
                .map_err(db_err)?;
            let areas = stats
                .map(|stats| {
                    decode_focus_pairs(&stats.focus_areas)
                        .into_iter()
                        .map(|(area, _count)| area)
                        .take(3)
                        .collect()
                })
                .unwrap_or_default();

            top_contributors.push(TopContributor {
                name: summary.username.clone(),
                summary: if summary.summary.is_empty() {
                    format!("{} made various contributions", summary.username)
                } else {
                    summary.summary.clone()
                },
                areas,
            });
        }

        let mut area_changes: HashMap<String, AreaChange> = HashMap::new();
        for summary in &summaries {
            let stats = db::stats::get(pool, &summary.username)
                .await
                .map_err(db_err)?;
            let Some(stats) = stats else { continue };

            for (area, _count) in decode_focus_pairs(&stats.focus_areas) {
                let entry = area_changes.entry(area.clone()).or_insert(AreaChange {
                    name: area,
                    files: 0,
                    additions: 0,
                    deletions: 0,
                });
                entry.files += summary.changed_files;
                entry.additions += summary.additions;
                entry.deletions += summary.deletions;
            }
        }
        let mut areas: Vec<AreaChange> = area_changes.into_values().collect();
        areas.sort_by(|a, b| b.files.cmp(&a.files).then_with(|| a.name.cmp(&b.name)));

        let snapshot = DailySnapshot {
            title: format!("{repository} ({date})"),
            overview: generate_overview(&summaries),
            metrics,
            areas,
            top_contributors,
        };

        self.save(self.daily_dir().join("summary.json"), &snapshot)?;
        self.save(
            self.daily_dir()
                .join("history")
                .join(format!("summary_{date}.json")),
            &snapshot,
        )?;

        info!(
            "Exported snapshot for {} ({} contributors)",
            date, snapshot.metrics.contributors
        );
        Ok(())
    }

    fn save<T: Serialize>(&self, path: PathBuf, data: &T) -> common::Result<()> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| Error::Export(format!("serialize {}: {}", path.display(), e)))?;
        fs::write(&path, json).map_err(|e| Error::Export(format!("write {}: {}", path.display(), e)))
    }
}

fn generate_overview(summaries: &[db::summaries::SummaryRecord]) -> String {
    let total_prs: i64 = summaries.iter().map(|s| s.total_prs).sum();
    let mut overview = format!(
        "Development activity with {} contributors merging {} PRs. ",
        summaries.len(),
        total_prs
    );
    if let Some(top) = summaries.first() {
        if !top.summary.is_empty() {
            overview.push_str(&format!("Major work included {}", top.summary));
        }
    }
    overview
}

fn decode_pr_items(raw: &str) -> Vec<PrItem> {
    serde_json::from_str(raw).unwrap_or_default()
}

fn decode_issue_items(raw: &str) -> Vec<IssueItem> {
    serde_json::from_str(raw).unwrap_or_default()
}

/// Decode the serialized `[["area", count], ...]` snapshot, empty on
/// malformed input
fn decode_focus_pairs(raw: &str) -> Vec<(String, i64)> {
    serde_json::from_str(raw).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_focus_pairs() {
        let pairs = decode_focus_pairs(r#"[["src/api", 10], ["docs", 3]]"#);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].0, "src/api");
        assert_eq!(pairs[0].1, 10);
        assert!(decode_focus_pairs("garbage").is_empty());
    }

    #[test]
    fn test_decode_pr_items_fail_soft() {
        assert!(decode_pr_items("not json").is_empty());
        let items = decode_pr_items(
            r#"[{"id":"r/pull/1","number":1,"title":"t","merged":true,"additions":5,"deletions":2}]"#,
        );
        assert_eq!(items.len(), 1);
        assert!(items[0].merged);
    }
}
