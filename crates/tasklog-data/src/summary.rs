//! The JSON task summary passed from the extract stage to the report stage.

use std::path::Path;

use serde::Serialize;
use tasklog_core::error::{Result, TaskLogError};
use tasklog_core::models::TaskSummary;
use tracing::info;

/// Serialise `summary` as pretty JSON with a four-space indent.
///
/// Non-ASCII task names are written as-is, not `\u` escaped.
pub fn to_pretty_json(summary: &TaskSummary) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    summary.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| TaskLogError::Other(e.into()))
}

/// Write `summary` to `path`, creating parent directories.
///
/// The document goes to a sibling temp file first and is then renamed into
/// place, so a reader never sees a half-written summary.
pub fn save_summary(path: &Path, summary: &TaskSummary) -> Result<()> {
    let write_err = |source| TaskLogError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let json = to_pretty_json(summary)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).map_err(write_err)?;
    std::fs::rename(&tmp, path).map_err(write_err)?;

    info!(
        "Summary with {} tasks saved to {}",
        summary.tasks.len(),
        path.display()
    );
    Ok(())
}

/// Read a summary previously written by [`save_summary`].
pub fn load_summary(path: &Path) -> Result<TaskSummary> {
    let content = std::fs::read_to_string(path).map_err(|source| TaskLogError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasklog_core::models::TaskRecord;
    use tempfile::TempDir;

    fn sample_summary() -> TaskSummary {
        TaskSummary {
            generated_on: "2024-10-01 07:30:00".to_string(),
            tasks: vec![
                TaskRecord {
                    source_file: "2024-09-30.md".to_string(),
                    completed: true,
                    time_range: "00:30 - 07:00".to_string(),
                    task_name: "睡眠".to_string(),
                },
                TaskRecord {
                    source_file: "2024-09-30.md".to_string(),
                    completed: false,
                    time_range: "13:00 - 13:30".to_string(),
                    task_name: "仮眠".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_pretty_json_layout() {
        let json = to_pretty_json(&sample_summary()).unwrap();
        assert!(json.starts_with("{\n    \"generated_on\": \"2024-10-01 07:30:00\""));
        assert!(json.contains("\n    \"tasks\": ["));
        assert!(json.contains("\"file_name\": \"2024-09-30.md\""));
        assert!(json.contains("\"task\": \"睡眠\""), "names must not be escaped");
        assert!(!json.contains("\\u"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("tasks.json");
        let summary = sample_summary();

        save_summary(&path, &summary).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());

        let loaded = load_summary(&path).unwrap();
        assert_eq!(loaded, summary);
    }

    #[test]
    fn test_save_overwrites_previous_summary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        save_summary(&path, &sample_summary()).unwrap();

        let empty = TaskSummary {
            generated_on: "2024-10-02 07:30:00".to_string(),
            tasks: Vec::new(),
        };
        save_summary(&path, &empty).unwrap();

        assert!(load_summary(&path).unwrap().tasks.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_summary(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, TaskLogError::FileRead { .. }));
    }

    #[test]
    fn test_load_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, "{\"generated_on\": 1}").unwrap();
        let err = load_summary(&path).unwrap_err();
        assert!(matches!(err, TaskLogError::JsonParse(_)));
    }
}
