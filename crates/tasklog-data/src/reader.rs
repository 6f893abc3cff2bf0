//! Daily log discovery and task-line extraction.
//!
//! Scans a directory of `YYYY-MM-DD.<ext>` files and turns every checkbox
//! line carrying a `HH:MM - HH:MM` range into a [`TaskRecord`].

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tasklog_core::error::{Result, TaskLogError};
use tasklog_core::models::TaskRecord;
use tracing::{debug, warn};

/// `[ ]` or `[x]`, a time range, then the task text.
static TASK_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[( |x)\]\s+(\d{2}:\d{2}\s*-\s*\d{2}:\d{2})\s*(.*)").expect("regex is valid")
});

// ── Public API ────────────────────────────────────────────────────────────────

/// Find the log files directly inside `dir` whose extension is one of
/// `extensions`, sorted by path.
///
/// Subdirectories are not descended into. An entry with a recognised
/// extension that cannot be opened as a regular file (a dangling symlink, a
/// directory, an unreadable entry) is an error.
pub fn find_log_files(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(TaskLogError::DataPathNotFound(dir.to_path_buf()));
    }

    let recognised = |path: &Path| {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|e| e == ext))
    };

    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => match err.path().map(Path::to_path_buf) {
                Some(path) if !recognised(&path) => {
                    debug!("Skipping {}: {}", path.display(), err);
                    continue;
                }
                Some(path) => {
                    return Err(TaskLogError::FileRead {
                        path,
                        source: err.into(),
                    })
                }
                None => return Err(TaskLogError::Io(err.into())),
            },
        };

        if !recognised(entry.path()) {
            continue;
        }
        if !entry.file_type().is_file() {
            return Err(TaskLogError::FileRead {
                path: entry.into_path(),
                source: std::io::Error::other("not a regular file"),
            });
        }
        files.push(entry.into_path());
    }

    files.sort();
    Ok(files)
}

/// Match one line against the task grammar.
///
/// The pattern may appear anywhere in the line, so list markers such as
/// `- ` or indentation in front of the checkbox are fine. Trailing whitespace
/// is stripped from the task name.
pub fn parse_task_line(line: &str, file_name: &str) -> Option<TaskRecord> {
    let caps = TASK_LINE.captures(line)?;
    Some(TaskRecord {
        source_file: file_name.to_string(),
        completed: &caps[1] == "x",
        time_range: caps[2].to_string(),
        task_name: caps[3].trim_end().to_string(),
    })
}

/// Parse every line of `content`, keeping line order.
pub fn parse_task_lines(content: &str, file_name: &str) -> Vec<TaskRecord> {
    content
        .lines()
        .filter_map(|line| parse_task_line(line, file_name))
        .collect()
}

/// Read one log file and return its task records.
///
/// Any read failure (missing file, permissions, invalid UTF-8) is an error.
pub fn extract_file(path: &Path) -> Result<Vec<TaskRecord>> {
    let content = std::fs::read_to_string(path).map_err(|source| TaskLogError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let records = parse_task_lines(&content, &file_name);
    debug!(
        "File {}: {} lines, {} task records",
        path.display(),
        content.lines().count(),
        records.len()
    );
    Ok(records)
}

/// Extract task records from every recognised file in `dir`.
///
/// Records follow file order, then line order. The first unreadable file
/// aborts extraction.
pub fn extract_tasks(dir: &Path, extensions: &[String]) -> Result<Vec<TaskRecord>> {
    let files = find_log_files(dir, extensions)?;
    if files.is_empty() {
        warn!("No log files found in {}", dir.display());
    }

    let mut tasks = Vec::new();
    for file in &files {
        tasks.extend(extract_file(file)?);
    }

    debug!("Extracted {} tasks from {} files", tasks.len(), files.len());
    Ok(tasks)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn write_log(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    fn md() -> Vec<String> {
        vec!["md".to_string()]
    }

    // ── parse_task_line ───────────────────────────────────────────────────────

    #[test]
    fn test_parse_completed_line() {
        let record = parse_task_line("- [x] 23:00 - 07:00 睡眠", "2024-09-29.md").unwrap();
        assert_eq!(record.source_file, "2024-09-29.md");
        assert!(record.completed);
        assert_eq!(record.time_range, "23:00 - 07:00");
        assert_eq!(record.task_name, "睡眠");
    }

    #[test]
    fn test_parse_open_line() {
        let record = parse_task_line("- [ ] 13:00 - 13:30 仮眠", "2024-09-30.md").unwrap();
        assert!(!record.completed);
        assert_eq!(record.task_name, "仮眠");
    }

    #[test]
    fn test_parse_compact_range_kept_verbatim() {
        let record = parse_task_line("[x] 22:00-23:30 仮眠", "f.md").unwrap();
        assert_eq!(record.time_range, "22:00-23:30");
    }

    #[test]
    fn test_parse_strips_trailing_whitespace() {
        let record = parse_task_line("  - [x] 09:00 - 10:00 write report  \r", "f.md").unwrap();
        assert_eq!(record.task_name, "write report");
    }

    #[test]
    fn test_parse_empty_task_name() {
        let record = parse_task_line("[x] 09:00 - 10:00", "f.md").unwrap();
        assert_eq!(record.task_name, "");
    }

    #[test]
    fn test_parse_rejects_non_task_lines() {
        for line in [
            "# 2024-09-29",
            "- plain bullet",
            "- [x] no time here",
            "- [X] 09:00 - 10:00 uppercase marker",
            "- [-] 09:00 - 10:00 other marker",
            "- [x]09:00 - 10:00 missing space",
            "- [x] 9:00 - 10:00 single digit hour",
            "",
        ] {
            assert!(parse_task_line(line, "f.md").is_none(), "line {line:?}");
        }
    }

    #[test]
    fn test_parse_accepts_impossible_clock_values() {
        // The grammar only checks digit shapes; range parsing rejects these later.
        let record = parse_task_line("[x] 25:00 - 26:00 睡眠", "f.md").unwrap();
        assert_eq!(record.time_range, "25:00 - 26:00");
    }

    #[test]
    fn test_parse_task_lines_counts_only_matches() {
        let content = "# log\n- [x] 01:00 - 02:00 a\nnote\n- [ ] 03:00 - 04:00 b\n\n- [x] 05:00 - 06:00 c\n";
        let records = parse_task_lines(content, "2024-01-01.md");
        assert_eq!(records.len(), 3);
        let names: Vec<&str> = records.iter().map(|r| r.task_name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    // ── find_log_files ────────────────────────────────────────────────────────

    #[test]
    fn test_find_log_files_filters_extension() {
        let dir = TempDir::new().unwrap();
        write_log(dir.path(), "2024-09-29.md", &["x"]);
        write_log(dir.path(), "2024-09-30.md", &["x"]);
        write_log(dir.path(), "notes.txt", &["x"]);

        let files = find_log_files(dir.path(), &md()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| p.extension().unwrap() == "md"));
    }

    #[test]
    fn test_find_log_files_multiple_extensions() {
        let dir = TempDir::new().unwrap();
        write_log(dir.path(), "2024-09-29.md", &["x"]);
        write_log(dir.path(), "2024-09-30.txt", &["x"]);

        let exts = vec!["md".to_string(), "txt".to_string()];
        assert_eq!(find_log_files(dir.path(), &exts).unwrap().len(), 2);
    }

    #[test]
    fn test_find_log_files_not_recursive() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("archive");
        std::fs::create_dir_all(&sub).unwrap();
        write_log(dir.path(), "2024-09-29.md", &["x"]);
        write_log(&sub, "2024-01-01.md", &["x"]);

        let files = find_log_files(dir.path(), &md()).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_find_log_files_sorted() {
        let dir = TempDir::new().unwrap();
        write_log(dir.path(), "2024-10-02.md", &["x"]);
        write_log(dir.path(), "2024-09-29.md", &["x"]);
        write_log(dir.path(), "2024-10-01.md", &["x"]);

        let files = find_log_files(dir.path(), &md()).unwrap();
        let names: Vec<&str> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["2024-09-29.md", "2024-10-01.md", "2024-10-02.md"]);
    }

    #[test]
    fn test_find_log_files_missing_dir() {
        let err = find_log_files(Path::new("/tmp/does-not-exist-tasklog-xyz"), &md()).unwrap_err();
        assert!(matches!(err, TaskLogError::DataPathNotFound(_)));
    }

    // ── extract_tasks ─────────────────────────────────────────────────────────

    #[test]
    fn test_extract_tasks_n_matching_of_n_plus_m() {
        let dir = TempDir::new().unwrap();
        write_log(
            dir.path(),
            "2024-09-29.md",
            &[
                "# Sunday",
                "- [x] 00:30 - 07:00 睡眠",
                "some prose",
                "- [ ] 10:00 - 11:00 read",
                "- [x] 13:00 - 13:20 仮眠",
            ],
        );

        let tasks = extract_tasks(dir.path(), &md()).unwrap();
        assert_eq!(tasks.len(), 3);
        assert!(tasks.iter().all(|t| t.source_file == "2024-09-29.md"));
    }

    #[test]
    fn test_extract_tasks_file_then_line_order() {
        let dir = TempDir::new().unwrap();
        write_log(dir.path(), "2024-09-30.md", &["- [x] 01:00 - 02:00 c"]);
        write_log(
            dir.path(),
            "2024-09-29.md",
            &["- [x] 01:00 - 02:00 a", "- [x] 03:00 - 04:00 b"],
        );

        let tasks = extract_tasks(dir.path(), &md()).unwrap();
        let names: Vec<&str> = tasks.iter().map(|t| t.task_name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_extract_tasks_overnight_line_is_extracted() {
        let dir = TempDir::new().unwrap();
        write_log(dir.path(), "2024-09-29.md", &["- [x] 23:00 - 07:00 睡眠"]);

        let tasks = extract_tasks(dir.path(), &md()).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].time_range, "23:00 - 07:00");
    }

    #[test]
    fn test_extract_tasks_empty_directory() {
        let dir = TempDir::new().unwrap();
        assert!(extract_tasks(dir.path(), &md()).unwrap().is_empty());
    }

    #[test]
    fn test_extract_tasks_unreadable_file_aborts() {
        let dir = TempDir::new().unwrap();
        write_log(dir.path(), "2024-09-29.md", &["- [x] 01:00 - 02:00 a"]);
        // Invalid UTF-8 cannot be read as text.
        std::fs::write(dir.path().join("2024-09-30.md"), [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let err = extract_tasks(dir.path(), &md()).unwrap_err();
        match err {
            TaskLogError::FileRead { path, .. } => {
                assert!(path.ends_with("2024-09-30.md"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_extract_tasks_directory_with_log_extension_aborts() {
        let dir = TempDir::new().unwrap();
        write_log(dir.path(), "2024-09-29.md", &["- [x] 01:00 - 02:00 a"]);
        std::fs::create_dir(dir.path().join("2024-09-30.md")).unwrap();

        let err = extract_tasks(dir.path(), &md()).unwrap_err();
        match err {
            TaskLogError::FileRead { path, .. } => {
                assert!(path.ends_with("2024-09-30.md"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_extract_tasks_dangling_symlink_aborts() {
        let dir = TempDir::new().unwrap();
        write_log(dir.path(), "2024-09-29.md", &["- [x] 01:00 - 02:00 a"]);
        std::os::unix::fs::symlink(dir.path().join("gone.md"), dir.path().join("2024-09-30.md"))
            .unwrap();

        let err = extract_tasks(dir.path(), &md()).unwrap_err();
        match err {
            TaskLogError::FileRead { path, .. } => {
                assert!(path.ends_with("2024-09-30.md"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_find_log_files_ignores_unrecognised_broken_entries() {
        let dir = TempDir::new().unwrap();
        write_log(dir.path(), "2024-09-29.md", &["- [x] 01:00 - 02:00 a"]);
        std::os::unix::fs::symlink(dir.path().join("gone.txt"), dir.path().join("notes.txt"))
            .unwrap();
        std::fs::create_dir(dir.path().join("attachments")).unwrap();

        let files = find_log_files(dir.path(), &md()).unwrap();
        assert_eq!(files, vec![dir.path().join("2024-09-29.md")]);
    }
}
