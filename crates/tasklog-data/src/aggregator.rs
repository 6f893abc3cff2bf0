//! Per-date totals of monitored task durations.

use std::collections::BTreeSet;

use tasklog_core::error::Result;
use tasklog_core::models::{DailyTotals, DateRange, OvernightPolicy, TaskRecord};
use tasklog_core::time_utils::{date_from_file_name, TimeRange};
use tracing::{debug, warn};

// ── SleepAggregator ───────────────────────────────────────────────────────────

/// Sums the durations of monitored tasks by the date in their file name.
#[derive(Debug, Clone)]
pub struct SleepAggregator {
    monitored: BTreeSet<String>,
    range: DateRange,
    overnight: OvernightPolicy,
}

impl SleepAggregator {
    pub fn new(monitored: BTreeSet<String>) -> Self {
        Self {
            monitored,
            range: DateRange::default(),
            overnight: OvernightPolicy::SameDay,
        }
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    pub fn with_overnight(mut self, overnight: OvernightPolicy) -> Self {
        self.overnight = overnight;
        self
    }

    /// Is `task_name` one of the monitored labels?
    pub fn is_monitored(&self, task_name: &str) -> bool {
        self.monitored.contains(task_name)
    }

    /// Fold `records` into per-date hour totals.
    ///
    /// Non-monitored records are skipped before any parsing. For monitored
    /// ones a bad file-name date or time range fails the whole aggregation.
    /// Ranges are never checked for overlap.
    pub fn aggregate(&self, records: &[TaskRecord]) -> Result<DailyTotals> {
        let mut totals = DailyTotals::new();
        let mut counted = 0usize;

        for record in records.iter().filter(|r| self.is_monitored(&r.task_name)) {
            let date = date_from_file_name(&record.source_file)?;
            if !self.range.contains(date) {
                continue;
            }

            let range = TimeRange::parse(&record.time_range)?;
            if range.is_reversed() && self.overnight == OvernightPolicy::SameDay {
                warn!(
                    "{}: \"{}\" ends before it starts; counted as {} hours",
                    record.source_file,
                    record.time_range,
                    range.elapsed_hours(self.overnight)
                );
            }

            *totals.entry(date).or_insert(0.0) += range.elapsed_hours(self.overnight);
            counted += 1;
        }

        debug!(
            "Aggregated {} of {} records into {} days",
            counted,
            records.len(),
            totals.len()
        );
        Ok(totals)
    }
}

/// Aggregate with the given filter and policy in one call.
pub fn calculate_sleep_times(
    records: &[TaskRecord],
    monitored: &BTreeSet<String>,
    range: DateRange,
    overnight: OvernightPolicy,
) -> Result<DailyTotals> {
    SleepAggregator::new(monitored.clone())
        .with_range(range)
        .with_overnight(overnight)
        .aggregate(records)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
