mod bootstrap;

use std::path::Path;

use anyhow::Result;
use tasklog_core::models::SleepSeries;
use tasklog_core::render::ChartRenderer;
use tasklog_core::settings::{home_dir, Settings};
use tasklog_data::analysis::{run_extract, run_report};
use tasklog_ui::svg::SvgChartRenderer;
use tasklog_ui::terminal::TerminalChartRenderer;
use tasklog_ui::themes::Theme;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref())?;

    tracing::info!("tasklog v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("Stage: {}, Theme: {}", settings.stage, settings.theme);

    if let Err(e) = run(&settings, &home_dir()) {
        tracing::error!("{}", e);
        return Err(e);
    }
    Ok(())
}

/// Run the stages selected by `settings`, drawing to a file when `--output`
/// is set and to the terminal otherwise.
fn run(settings: &Settings, home: &Path) -> Result<Option<SleepSeries>> {
    let config = settings.pipeline_config(home)?;
    let stage = settings.stage()?;

    if stage.runs_extract() {
        let summary = run_extract(&config)?;
        tracing::info!(
            "Extracted {} tasks to {}",
            summary.tasks.len(),
            config.summary_path.display()
        );
    }

    if !stage.runs_report() {
        return Ok(None);
    }

    let mut renderer: Box<dyn ChartRenderer> = match &config.output_path {
        Some(path) => Box::new(SvgChartRenderer::new(path)),
        None => Box::new(TerminalChartRenderer::new(Theme::from_name(&settings.theme))),
    };
    let series = run_report(&config, renderer.as_mut())?;
    tracing::info!("Reported {} days", series.len());
    Ok(Some(series))
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn setup() -> TempDir {
        let tmp = TempDir::new().expect("tempdir");
        let logs = tmp.path().join("logs");
        std::fs::create_dir_all(&logs).unwrap();
        std::fs::write(
            logs.join("2024-09-28.md"),
            "- [x] 00:30 - 07:00 睡眠\n- [x] 13:00 - 13:30 仮眠\n",
        )
        .unwrap();
        std::fs::write(logs.join("2024-09-29.md"), "- [x] 01:00 - 08:00 睡眠\n").unwrap();
        tmp
    }

    fn settings(tmp: &TempDir, extra: &[&str]) -> Settings {
        let input = tmp.path().join("logs");
        let output = tmp.path().join("sleep.svg");
        let mut args = vec![
            "tasklog".to_string(),
            "--input-dir".to_string(),
            input.display().to_string(),
            "--output".to_string(),
            output.display().to_string(),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        Settings::parse_from(args)
    }

    #[test]
    fn test_run_all_writes_summary_and_chart() {
        let tmp = setup();
        let series = run(&settings(&tmp, &[]), tmp.path())
            .unwrap()
            .expect("report ran");

        assert_eq!(series.hours(), vec![7.0, 7.0]);
        assert!(tmp.path().join(".tasklog").join("tasks.json").is_file());
        assert!(tmp.path().join("sleep.svg").is_file());
    }

    #[test]
    fn test_run_extract_only_skips_chart() {
        let tmp = setup();
        let result = run(&settings(&tmp, &["--stage", "extract"]), tmp.path()).unwrap();

        assert!(result.is_none());
        assert!(tmp.path().join(".tasklog").join("tasks.json").is_file());
        assert!(!tmp.path().join("sleep.svg").exists());
    }

    #[test]
    fn test_run_report_uses_existing_summary() {
        let tmp = setup();
        run(&settings(&tmp, &["--stage", "extract"]), tmp.path()).unwrap();
        std::fs::remove_dir_all(tmp.path().join("logs")).unwrap();

        let series = run(
            &settings(&tmp, &["--stage", "report", "--start-date", "2024-09-29"]),
            tmp.path(),
        )
        .unwrap()
        .expect("report ran");

        assert_eq!(series.len(), 1);
        assert!(tmp.path().join("sleep.svg").is_file());
    }

    #[test]
    fn test_run_rejects_inverted_range() {
        let tmp = setup();
        let s = settings(
            &tmp,
            &["--start-date", "2024-09-30", "--end-date", "2024-09-28"],
        );
        assert!(run(&s, tmp.path()).is_err());
        assert!(!tmp.path().join(".tasklog").exists());
    }
}
