//! The extract → aggregate → render pipeline.
//!
//! Each stage is a plain function over a [`PipelineConfig`]; the renderer is
//! injected so the drawing step can be swapped out.

use tasklog_core::error::{Result, TaskLogError};
use tasklog_core::models::{DailyTotals, SleepSeries, TaskRecord, TaskSummary};
use tasklog_core::render::ChartRenderer;
use tasklog_core::settings::PipelineConfig;
use tracing::{debug, info, warn};

use crate::aggregator::SleepAggregator;
use crate::reader::extract_tasks;
use crate::summary::{load_summary, save_summary};

/// Scan `config.input_dir` and write the task summary.
pub fn run_extract(config: &PipelineConfig) -> Result<TaskSummary> {
    let input_dir = config
        .input_dir
        .as_deref()
        .ok_or_else(|| TaskLogError::Config("no input directory given (--input-dir)".into()))?;

    info!("Extracting tasks from {}", input_dir.display());
    let tasks = extract_tasks(input_dir, &config.extensions)?;
    let summary = TaskSummary::new(tasks);
    save_summary(&config.summary_path, &summary)?;
    Ok(summary)
}

/// Sum the monitored records of `tasks` per date under the config's filter.
pub fn aggregate_tasks(config: &PipelineConfig, tasks: &[TaskRecord]) -> Result<DailyTotals> {
    SleepAggregator::new(config.monitored_tasks.clone())
        .with_range(config.date_range)
        .with_overnight(config.overnight)
        .aggregate(tasks)
}

/// Aggregate `tasks` and hand the resulting series to `renderer`.
pub fn report_tasks(
    config: &PipelineConfig,
    tasks: &[TaskRecord],
    renderer: &mut dyn ChartRenderer,
) -> Result<SleepSeries> {
    let totals = aggregate_tasks(config, tasks)?;
    let series = SleepSeries::from_totals(&totals);
    if series.is_empty() {
        warn!("No monitored tasks in the selected date range");
    }
    debug!("Rendering {} days", series.len());
    renderer.render(&series)?;
    Ok(series)
}

/// Load the summary at `config.summary_path` and report from it.
pub fn run_report(
    config: &PipelineConfig,
    renderer: &mut dyn ChartRenderer,
) -> Result<SleepSeries> {
    let summary = load_summary(&config.summary_path)?;
    debug!(
        "Loaded {} tasks generated on {}",
        summary.tasks.len(),
        summary.generated_on
    );
    report_tasks(config, &summary.tasks, renderer)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
