use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the task-log pipeline.
#[derive(Error, Debug)]
pub enum TaskLogError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file could not be written to disk.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed or serialised.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A log file name did not start with a `YYYY-MM-DD` date.
    #[error("Invalid date in file name {file_name}: {value}")]
    InvalidDate { file_name: String, value: String },

    /// A time range was not of the form `HH:MM - HH:MM`.
    #[error("Invalid time range: {0}")]
    InvalidTimeRange(String),

    /// The log directory does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the tasklog crates.
pub type Result<T> = std::result::Result<T, TaskLogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = TaskLogError::FileRead {
            path: PathBuf::from("/logs/2024-09-29.md"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/logs/2024-09-29.md"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_invalid_date() {
        let err = TaskLogError::InvalidDate {
            file_name: "notes.md".to_string(),
            value: "notes".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid date in file name notes.md: notes");
    }

    #[test]
    fn test_error_display_invalid_time_range() {
        let err = TaskLogError::InvalidTimeRange("25:00 - 26:00".to_string());
        assert_eq!(err.to_string(), "Invalid time range: 25:00 - 26:00");
    }

    #[test]
    fn test_error_display_data_path_not_found() {
        let err = TaskLogError::DataPathNotFound(PathBuf::from("/missing/dir"));
        assert_eq!(err.to_string(), "Data path not found: /missing/dir");
    }

    #[test]
    fn test_error_display_config() {
        let err = TaskLogError::Config("no input directory".to_string());
        assert_eq!(err.to_string(), "Configuration error: no input directory");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: TaskLogError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: TaskLogError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }
}
