use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TaskLogError};
use crate::models::{DateRange, OvernightPolicy, DEFAULT_EXTENSIONS, DEFAULT_MONITORED_TASKS};
use crate::time_utils::parse_date_arg;

/// Directory under the home dir holding persisted params, logs and the
/// default task summary.
pub const APP_DIR_NAME: &str = ".tasklog";

/// File name of the default task summary inside [`APP_DIR_NAME`].
pub const DEFAULT_SUMMARY_NAME: &str = "tasks.json";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Extract sleep and nap entries from daily markdown logs and chart them
#[derive(Parser, Debug, Clone)]
#[command(
    name = "tasklog",
    about = "Extract sleep and nap entries from daily markdown logs and chart them",
    version
)]
pub struct Settings {
    /// Directory containing YYYY-MM-DD.<ext> daily log files
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Path of the intermediate task summary JSON
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Chart image (SVG) path; the chart is shown in the terminal when omitted
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// First date to include (YYYY-MM-DD, inclusive)
    #[arg(long, value_parser = parse_date_value)]
    pub start_date: Option<NaiveDate>,

    /// Last date to include (YYYY-MM-DD, inclusive)
    #[arg(long, value_parser = parse_date_value)]
    pub end_date: Option<NaiveDate>,

    /// Pipeline stage(s) to run
    #[arg(long, default_value = "all", value_parser = ["all", "extract", "report"])]
    pub stage: String,

    /// Log file extension to scan (repeatable, default: md)
    #[arg(long = "extension", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Task name counted as sleep (repeatable, default: 睡眠 and 仮眠)
    #[arg(long = "task", value_name = "NAME")]
    pub tasks: Vec<String>,

    /// Treat ranges whose end is before their start as crossing midnight
    #[arg(long)]
    pub wrap_midnight: bool,

    /// Terminal chart theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

fn parse_date_value(s: &str) -> std::result::Result<NaiveDate, String> {
    parse_date_arg(s).map_err(|e| e.to_string())
}

// ── Stage ──────────────────────────────────────────────────────────────────────

/// Which pipeline stages a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Extract, write the summary, then report from it.
    All,
    Extract,
    Report,
}

impl Stage {
    pub fn runs_extract(self) -> bool {
        matches!(self, Stage::All | Stage::Extract)
    }

    pub fn runs_report(self) -> bool {
        matches!(self, Stage::All | Stage::Report)
    }
}

impl std::str::FromStr for Stage {
    type Err = TaskLogError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(Stage::All),
            "extract" => Ok(Stage::Extract),
            "report" => Ok(Stage::Report),
            other => Err(TaskLogError::Config(format!("unknown stage \"{}\"", other))),
        }
    }
}

// ── PipelineConfig ─────────────────────────────────────────────────────────────

/// Everything the extract and report stages need, with no global defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Directory scanned by the extract stage.
    pub input_dir: Option<PathBuf>,
    /// Intermediate JSON written by extract and read by report.
    pub summary_path: PathBuf,
    /// Chart image destination; `None` means interactive display.
    pub output_path: Option<PathBuf>,
    /// Recognised log file extensions, without the leading dot.
    pub extensions: Vec<String>,
    /// Task names whose durations are summed.
    pub monitored_tasks: BTreeSet<String>,
    pub date_range: DateRange,
    pub overnight: OvernightPolicy,
}

impl PipelineConfig {
    /// A config with the default extensions and monitored tasks.
    pub fn new(input_dir: Option<PathBuf>, summary_path: PathBuf) -> Self {
        Self {
            input_dir,
            summary_path,
            output_path: None,
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            monitored_tasks: DEFAULT_MONITORED_TASKS.iter().map(|s| s.to_string()).collect(),
            date_range: DateRange::default(),
            overnight: OvernightPolicy::SameDay,
        }
    }
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used paths saved to `~/.tasklog/last_used.json`.
///
/// `--output` is per run and never saved, so omitting it always shows the
/// chart in the terminal.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&home_dir())
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(APP_DIR_NAME).join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path.
    pub fn save_to(&self, path: &Path) -> std::result::Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &Path) -> std::result::Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            input_dir: s.input_dir.clone(),
            summary: s.summary.clone(),
            extensions: (!s.extensions.is_empty()).then(|| s.extensions.clone()),
            theme: Some(s.theme.clone()),
        }
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation; accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(args: Vec<std::ffi::OsString>, config_path: &Path) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            return Self::apply_debug(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins; clap ids are the field names.
        if !is_arg_explicitly_set(&matches, "input_dir") && settings.input_dir.is_none() {
            settings.input_dir = last.input_dir;
        }
        if !is_arg_explicitly_set(&matches, "summary") && settings.summary.is_none() {
            settings.summary = last.summary;
        }
        if !is_arg_explicitly_set(&matches, "extensions") && settings.extensions.is_empty() {
            settings.extensions = last.extensions.unwrap_or_default();
        }
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }

        settings = Self::apply_debug(settings);

        let params = LastUsedParams::from(&settings);
        let _ = params.save_to(config_path);

        settings
    }

    fn apply_debug(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// The stage selected with `--stage`.
    pub fn stage(&self) -> Result<Stage> {
        self.stage.parse()
    }

    /// Resolve CLI values into a [`PipelineConfig`].
    ///
    /// The summary defaults to `<home>/.tasklog/tasks.json` under `home`.
    pub fn pipeline_config(&self, home: &Path) -> Result<PipelineConfig> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(TaskLogError::Config(format!(
                    "start date {} is after end date {}",
                    start, end
                )));
            }
        }

        let summary_path = self
            .summary
            .clone()
            .unwrap_or_else(|| home.join(APP_DIR_NAME).join(DEFAULT_SUMMARY_NAME));

        let mut config = PipelineConfig::new(self.input_dir.clone(), summary_path);
        config.output_path = self.output.clone();
        if !self.extensions.is_empty() {
            config.extensions = self
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect();
        }
        if !self.tasks.is_empty() {
            config.monitored_tasks = self.tasks.iter().cloned().collect();
        }
        config.date_range = DateRange::new(self.start_date, self.end_date);
        if self.wrap_midnight {
            config.overnight = OvernightPolicy::WrapMidnight;
        }
        Ok(config)
    }
}

/// Home directory, falling back to the current directory.
pub fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
