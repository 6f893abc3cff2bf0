//! Chart geometry shared by the terminal and image renderers.

use chrono::NaiveDate;
use tasklog_core::calculations::{max_value, min_value};
use tasklog_core::models::{ReportPoint, SleepSeries, LONG_WINDOW, SHORT_WINDOW};

pub const CHART_TITLE: &str = "Daily Sleep and Nap Times with Moving Averages";
pub const X_AXIS_TITLE: &str = "Date";
pub const Y_AXIS_TITLE: &str = "Hours of Sleep/Nap";
pub const DAILY_LABEL: &str = "Daily Sleep Time";

pub fn short_average_label() -> String {
    format!("{}-Day Moving Average", SHORT_WINDOW)
}

pub fn long_average_label() -> String {
    format!("{}-Day Moving Average", LONG_WINDOW)
}

/// Days since the first point, so gaps between log dates stay visible.
pub fn day_offset(first: NaiveDate, date: NaiveDate) -> f64 {
    (date - first).num_days() as f64
}

/// Horizontal extent in days: `[0, last - first]`, widened to `[-1, 1]` for
/// a single point so it is not drawn on the border.
pub fn x_bounds(series: &SleepSeries) -> [f64; 2] {
    match (series.points.first(), series.points.last()) {
        (Some(first), Some(last)) if first.date != last.date => {
            [0.0, day_offset(first.date, last.date)]
        }
        _ => [-1.0, 1.0],
    }
}

/// Vertical extent in whole hours.
///
/// The top is one hour above the largest total. The bottom is zero unless a
/// total is negative, in which case it is floored to the hour below it.
pub fn y_bounds(series: &SleepSeries) -> [f64; 2] {
    let hours = series.hours();
    let max = max_value(&hours).unwrap_or(0.0).max(0.0);
    let min = min_value(&hours).unwrap_or(0.0).min(0.0);
    [min.floor(), max.floor() + 1.0]
}

/// Integer hour ticks covering `bounds`, inclusive.
pub fn y_ticks(bounds: [f64; 2]) -> Vec<i64> {
    (bounds[0] as i64..=bounds[1] as i64).collect()
}

/// `(x, y)` pairs for the daily totals.
pub fn daily_points(series: &SleepSeries) -> Vec<(f64, f64)> {
    let Some(first) = series.points.first() else {
        return Vec::new();
    };
    series
        .points
        .iter()
        .map(|p| (day_offset(first.date, p.date), p.hours))
        .collect()
}

/// `(x, y)` pairs for whichever average `pick` selects, skipping days whose
/// window is not full yet.
pub fn average_points(
    series: &SleepSeries,
    pick: impl Fn(&ReportPoint) -> Option<f64>,
) -> Vec<(f64, f64)> {
    let Some(first) = series.points.first() else {
        return Vec::new();
    };
    series
        .points
        .iter()
        .filter_map(|p| pick(p).map(|v| (day_offset(first.date, p.date), v)))
        .collect()
}
