use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calculations::moving_average;

/// Task labels counted as sleep by default: sleep and nap.
pub const DEFAULT_MONITORED_TASKS: [&str; 2] = ["睡眠", "仮眠"];

/// File extensions scanned for task lines by default.
pub const DEFAULT_EXTENSIONS: [&str; 1] = ["md"];

/// Format of [`TaskSummary::generated_on`].
pub const GENERATED_ON_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One checkbox line extracted from a daily log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Bare file name the line came from, e.g. `"2024-09-29.md"`.
    #[serde(rename = "file_name")]
    pub source_file: String,
    /// `true` for `[x]`, `false` for `[ ]`.
    pub completed: bool,
    /// The time range exactly as written, e.g. `"23:00 - 07:00"`.
    pub time_range: String,
    /// Free text after the time range.
    #[serde(rename = "task")]
    pub task_name: String,
}

/// The intermediate document written between the extract and report stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSummary {
    /// Local wall-clock time the summary was produced.
    pub generated_on: String,
    pub tasks: Vec<TaskRecord>,
}

impl TaskSummary {
    /// Wrap `tasks`, stamping the current local time.
    pub fn new(tasks: Vec<TaskRecord>) -> Self {
        Self {
            generated_on: Local::now().format(GENERATED_ON_FORMAT).to_string(),
            tasks,
        }
    }
}

/// Inclusive calendar-date filter. `None` on either side means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// A range covering exactly one day.
    pub fn single(date: NaiveDate) -> Self {
        Self::new(Some(date), Some(date))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }
}

/// How to treat a range whose end time is earlier than its start time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OvernightPolicy {
    /// Both times are on the same day; `end < start` gives a negative duration.
    #[default]
    SameDay,
    /// `end < start` means the range crossed midnight; 24h is added.
    WrapMidnight,
}

/// Hours per calendar date, iterated in chronological order.
pub type DailyTotals = BTreeMap<NaiveDate, f64>;

/// Short and long trailing windows drawn alongside the daily values.
pub const SHORT_WINDOW: usize = 3;
pub const LONG_WINDOW: usize = 7;

/// One day of the chart: the total and both trailing averages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportPoint {
    pub date: NaiveDate,
    pub hours: f64,
    /// Mean of the last [`SHORT_WINDOW`] totals, `None` until that many exist.
    pub short_average: Option<f64>,
    /// Mean of the last [`LONG_WINDOW`] totals, `None` until that many exist.
    pub long_average: Option<f64>,
}

/// The chronologically sorted series handed to a chart renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SleepSeries {
    pub points: Vec<ReportPoint>,
}

impl SleepSeries {
    /// Build the series from per-date totals.
    ///
    /// Averages run over consecutive entries, so a day with no record does
    /// not count towards a window.
    pub fn from_totals(totals: &DailyTotals) -> Self {
        let hours: Vec<f64> = totals.values().copied().collect();
        let short = moving_average(&hours, SHORT_WINDOW);
        let long = moving_average(&hours, LONG_WINDOW);

        let points = totals
            .keys()
            .zip(hours.iter())
            .zip(short.into_iter().zip(long))
            .map(|((date, hours), (short_average, long_average))| ReportPoint {
                date: *date,
                hours: *hours,
                short_average,
                long_average,
            })
            .collect();

        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn hours(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.hours).collect()
    }
}
