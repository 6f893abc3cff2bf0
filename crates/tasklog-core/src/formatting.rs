use chrono::NaiveDate;

/// Format an hour total for point labels, one decimal place.
///
/// # Examples
///
/// ```
/// use tasklog_core::formatting::format_hours;
///
/// assert_eq!(format_hours(7.5), "7.5");
/// assert_eq!(format_hours(6.0), "6.0");
/// assert_eq!(format_hours(-16.0), "-16.0");
/// ```
pub fn format_hours(value: f64) -> String {
    format!("{:.1}", value)
}

/// Axis label for a day: the ISO date followed by the abbreviated weekday.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use tasklog_core::formatting::date_label;
///
/// let date = NaiveDate::from_ymd_opt(2024, 9, 29).unwrap();
/// assert_eq!(date_label(date), "2024-09-29 (Sun)");
/// ```
pub fn date_label(date: NaiveDate) -> String {
    date.format("%Y-%m-%d (%a)").to_string()
}

/// Short `MM-DD` label used where horizontal space is tight.
pub fn short_date_label(date: NaiveDate) -> String {
    date.format("%m-%d").to_string()
}

/// Format an optional average, using `-` while the window is still filling.
pub fn format_optional_hours(value: Option<f64>) -> String {
    value.map(format_hours).unwrap_or_else(|| "-".to_string())
}
