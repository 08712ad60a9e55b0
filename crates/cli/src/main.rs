//! contrib-pulse pipeline runner
//!
//! Invoked by an external orchestrator once per day/week/month. Each run
//! scores one repository over one time window.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Parser;
use common::{Config, IntervalType, PipelineConfig, TimeWindow};
use processor::{ExportService, Pipeline};
use tracing::info;

/// Score repository contributions for a time window
///
/// Reads raw activity records from the database, computes per-contributor
/// scores, distributions and expertise levels, and persists summaries,
/// rolling stats and JSON export snapshots.
#[derive(Parser, Debug)]
#[command(name = "contrib-pulse")]
#[command(version)]
#[command(about, long_about = None)]
struct Cli {
    /// Repository to process, e.g. "acme/widgets"
    repository: String,

    /// First date of the window (inclusive), YYYY-MM-DD
    #[arg(long)]
    start_date: NaiveDate,

    /// Last date of the window (inclusive), YYYY-MM-DD
    #[arg(long)]
    end_date: NaiveDate,

    /// Summary interval recorded with the results
    #[arg(long, default_value = "day")]
    interval: IntervalType,

    /// Regenerate narrative summaries even when one already exists
    #[arg(long)]
    force: bool,

    /// Pipeline config file (overrides PIPELINE_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("contrib_pulse=info".parse()?)
                .add_directive("processor=debug".parse()?),
        )
        .init();

    let cli = Cli::parse();
    if cli.end_date < cli.start_date {
        anyhow::bail!("end date {} is before start date {}", cli.end_date, cli.start_date);
    }

    let config = Config::from_env();
    let pipeline_config = PipelineConfig::load_from_file(
        cli.config
            .as_deref()
            .unwrap_or(Path::new(&config.pipeline_config)),
    )?;

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;

    let export = ExportService::new(config.data_dir.as_str())?;
    let pipeline = Pipeline::new(pool, pipeline_config, export)?;

    let window = TimeWindow::new(cli.start_date, cli.end_date);
    info!(
        "Processing {} from {} to {} ({} interval)",
        cli.repository, window.start, window.end, cli.interval
    );

    let result = pipeline
        .process_timeframe(window, &cli.repository, cli.interval, cli.force)
        .await?;

    info!(
        "Processed {} contributors: {} PRs, {} issues, {} reviews, {} comments",
        result.totals.contributors,
        result.totals.pull_requests,
        result.totals.issues,
        result.totals.reviews,
        result.totals.comments
    );

    Ok(())
}
