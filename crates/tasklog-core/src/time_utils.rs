use chrono::{NaiveDate, NaiveTime};

use crate::error::{Result, TaskLogError};
use crate::models::OvernightPolicy;

/// Date format carried in daily log file names.
pub const FILE_DATE_FORMAT: &str = "%Y-%m-%d";

const CLOCK_FORMAT: &str = "%H:%M";
const MINUTES_PER_DAY: i64 = 24 * 60;

// ── TimeRange ─────────────────────────────────────────────────────────────────

/// A parsed `HH:MM - HH:MM` span. No calendar date is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    /// Parse `"HH:MM - HH:MM"`. Whitespace around the dash is optional.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || TaskLogError::InvalidTimeRange(s.to_string());

        let (start, end) = s.split_once('-').ok_or_else(invalid)?;
        let start = NaiveTime::parse_from_str(start.trim(), CLOCK_FORMAT).map_err(|_| invalid())?;
        let end = NaiveTime::parse_from_str(end.trim(), CLOCK_FORMAT).map_err(|_| invalid())?;

        Ok(Self { start, end })
    }

    /// `end - start` in whole minutes, negative when `end < start`.
    pub fn signed_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// `true` when the end clock time is before the start clock time.
    pub fn is_reversed(&self) -> bool {
        self.end < self.start
    }

    /// Elapsed hours under `policy`.
    ///
    /// With [`OvernightPolicy::SameDay`] a reversed range yields a negative
    /// value; callers are expected to surface that rather than hide it.
    pub fn elapsed_hours(&self, policy: OvernightPolicy) -> f64 {
        let mut minutes = self.signed_minutes();
        if policy == OvernightPolicy::WrapMidnight && minutes < 0 {
            minutes += MINUTES_PER_DAY;
        }
        minutes as f64 / 60.0
    }
}

/// Parse a time range and return its same-day elapsed hours.
pub fn time_diff_in_hours(time_range: &str) -> Result<f64> {
    Ok(TimeRange::parse(time_range)?.elapsed_hours(OvernightPolicy::SameDay))
}

// ── File-name dates ───────────────────────────────────────────────────────────

/// Extract the calendar date from a log file name such as `2024-09-29.md`.
///
/// Everything before the first `.` must be a `YYYY-MM-DD` date.
pub fn date_from_file_name(file_name: &str) -> Result<NaiveDate> {
    let stem = file_name.split('.').next().unwrap_or(file_name);
    NaiveDate::parse_from_str(stem, FILE_DATE_FORMAT).map_err(|_| TaskLogError::InvalidDate {
        file_name: file_name.to_string(),
        value: stem.to_string(),
    })
}

/// Parse a `YYYY-MM-DD` command-line date.
pub fn parse_date_arg(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), FILE_DATE_FORMAT)
        .map_err(|_| TaskLogError::Config(format!("invalid date \"{}\", expected YYYY-MM-DD", s)))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
