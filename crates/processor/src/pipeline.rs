//! Pipeline orchestration
//!
//! Discovers active contributors for a window, scores each one
//! sequentially, and persists summaries, rolling stats and the export
//! snapshot. Contributor failures are contributor-scoped: one bad record
//! set never aborts the batch. Tag-score and summary upserts for a given
//! key happen only from this sequential loop, so no two writers race on
//! the same row.

use std::collections::HashMap;

use common::models::ContributorMetrics;
use common::{IntervalType, PipelineConfig, TimeWindow};
use sqlx::PgPool;
use tracing::{error, info, warn};

use crate::db_err;
use crate::export::ExportService;
use crate::{contributor, discovery, summary};

/// Run totals across all scored contributors
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessingTotals {
    pub contributors: i64,
    pub pull_requests: i64,
    pub issues: i64,
    pub reviews: i64,
    pub comments: i64,
}

/// Result of processing one window
#[derive(Debug)]
pub struct ProcessingResult {
    pub metrics: Vec<ContributorMetrics>,
    pub totals: ProcessingTotals,
    pub window: TimeWindow,
}

/// The orchestrating pipeline for one repository
pub struct Pipeline {
    pool: PgPool,
    config: PipelineConfig,
    export: ExportService,
    client: reqwest::Client,
}

impl Pipeline {
    pub fn new(
        pool: PgPool,
        config: PipelineConfig,
        export: ExportService,
    ) -> common::Result<Self> {
        let client = summary::build_client(&config.ai_summary)
            .map_err(|e| common::Error::Summary(e.to_string()))?;
        Ok(Self {
            pool,
            config,
            export,
            client,
        })
    }

    /// Process contribution data for one time window
    pub async fn process_timeframe(
        &self,
        window: TimeWindow,
        repository: &str,
        interval: IntervalType,
        force: bool,
    ) -> common::Result<ProcessingResult> {
        let contributors = discovery::discover_active_contributors(
            &self.pool,
            &window,
            repository,
            &self.config.bot_users,
        )
        .await?;

        if contributors.is_empty() {
            warn!(
                "No active contributors found for {} between {} and {}",
                repository, window.start, window.end
            );
            return Ok(ProcessingResult {
                metrics: Vec::new(),
                totals: ProcessingTotals::default(),
                window,
            });
        }

        info!("Processing {} active contributors", contributors.len());

        let mut metrics: Vec<ContributorMetrics> = Vec::new();
        let mut totals = ProcessingTotals::default();

        for username in &contributors {
            match contributor::score_contributor(
                &self.pool,
                username,
                &window,
                repository,
                &self.config,
            )
            .await
            {
                Ok(contributor_metrics) => {
                    totals.pull_requests += contributor_metrics.pull_requests.total;
                    totals.issues += contributor_metrics.issues.total;
                    totals.reviews += contributor_metrics.reviews.total;
                    totals.comments += contributor_metrics.comments.total;
                    metrics.push(contributor_metrics);
                }
                Err(e) => {
                    // Contributor-scoped failure; the rest of the batch
                    // still runs
                    error!("Failed to score {}: {}", username, e);
                }
            }
        }

        totals.contributors = metrics.len() as i64;

        metrics.sort_by(|a, b| b.score.cmp(&a.score));

        self.save_summaries(&metrics, &window, repository, interval, force)
            .await?;

        Ok(ProcessingResult {
            metrics,
            totals,
            window,
        })
    }

    /// Persist per-contributor summaries and rolling stats, then export
    async fn save_summaries(
        &self,
        metrics: &[ContributorMetrics],
        window: &TimeWindow,
        repository: &str,
        interval: IntervalType,
        force: bool,
    ) -> common::Result<()> {
        let date = window.end_date_str();

        for metric in metrics {
            let mut generated = String::new();
            let exists = db::summaries::has_nonempty_summary(
                &self.pool,
                &metric.username,
                &date,
                interval.as_str(),
            )
            .await
            .map_err(db_err)?;

            if force || !exists {
                generated = summary::generate_contributor_summary(
                    &self.client,
                    metric,
                    &self.config.ai_summary,
                    interval,
                )
                .await;
            }

            let record = db::summaries::SummaryRecord {
                id: db::summaries::SummaryRecord::make_id(
                    &metric.username,
                    &date,
                    interval.as_str(),
                ),
                username: metric.username.clone(),
                date: date.clone(),
                interval_type: interval.as_str().to_string(),
                score: metric.score,
                summary: generated,
                total_prs: metric.pull_requests.total,
                additions: metric.code_changes.additions,
                deletions: metric.code_changes.deletions,
                changed_files: metric.code_changes.files,
                pull_requests: serde_json::to_string(&metric.pull_requests.items)
                    .unwrap_or_else(|_| "[]".to_string()),
                issues: serde_json::to_string(&metric.issues.items)
                    .unwrap_or_else(|_| "[]".to_string()),
            };
            db::summaries::upsert(&self.pool, &record)
                .await
                .map_err(db_err)?;

            let files_by_type: HashMap<&str, i64> = metric
                .file_types
                .iter()
                .map(|file_type| (file_type.extension.as_str(), file_type.count))
                .collect();
            let focus_pairs: Vec<(&str, i64)> = metric
                .focus_areas
                .iter()
                .map(|area| (area.area.as_str(), area.count))
                .collect();

            let delta = db::stats::StatsDelta {
                total_prs: metric.pull_requests.total,
                merged_prs: metric.pull_requests.merged,
                closed_prs: metric.pull_requests.closed,
                total_files: metric.code_changes.files,
                total_additions: metric.code_changes.additions,
                total_deletions: metric.code_changes.deletions,
                files_by_type: serde_json::to_string(&files_by_type)
                    .unwrap_or_else(|_| "{}".to_string()),
                focus_areas: serde_json::to_string(&focus_pairs)
                    .unwrap_or_else(|_| "[]".to_string()),
            };
            db::stats::upsert_additive(&self.pool, &metric.username, &delta)
                .await
                .map_err(db_err)?;
        }

        self.export
            .export_daily_summary(&self.pool, repository, &date, interval)
            .await
    }
}
