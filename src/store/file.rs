//! CSV encoding of the tasks file.
//!
//! The whole file is rewritten on every save. A crash in the middle of a
//! write can leave it truncated; there is no journal or temp-file swap.

use crate::types::{Task, TaskStatus};
use anyhow::{Context, Result, bail};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Column order of the tasks file.
pub const HEADER: [&str; 8] = [
    "id",
    "title",
    "description",
    "due_date",
    "priority",
    "status",
    "created_at",
    "completed_at",
];

/// Create `path` (and missing parent directories) containing only the header row.
pub fn create_empty(path: &Path) -> Result<()> {
    write_tasks(path, &[])
}

/// Read every row of the tasks file. Any malformed row fails the whole read.
///
/// Rows must also carry a unique id of at least 1, and `completed_at` must be
/// set exactly when the status is `Completed`.
pub fn read_tasks(path: &Path) -> Result<Vec<Task>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("cannot open {}", path.display()))?;

    let mut tasks = Vec::new();
    let mut seen = HashSet::new();
    for (index, row) in reader.deserialize::<Task>().enumerate() {
        // +2: one for the header, one for 1-based numbering
        let line = index + 2;
        let task = row.with_context(|| format!("row {}", line))?;
        check_row(&task, &mut seen).with_context(|| format!("row {}", line))?;
        tasks.push(task);
    }
    Ok(tasks)
}

fn check_row(task: &Task, seen: &mut HashSet<u32>) -> Result<()> {
    if task.id == 0 {
        bail!("task id must be at least 1");
    }
    if !seen.insert(task.id) {
        bail!("duplicate task id {}", task.id);
    }
    match (task.status, task.completed_at) {
        (TaskStatus::Completed, None) => {
            bail!("task {} is Completed but has no completed_at", task.id)
        }
        (TaskStatus::Pending | TaskStatus::Overdue, Some(_)) => {
            bail!("task {} is {} but has a completed_at", task.id, task.status)
        }
        _ => Ok(()),
    }
}

/// Overwrite `path` with the header followed by one row per task.
pub fn write_tasks(path: &Path, tasks: &[Task]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("cannot open {} for writing", path.display()))?;

    writer.write_record(HEADER)?;
    for task in tasks {
        writer.serialize(task)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Priority;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample(id: u32, title: &str, description: &str) -> Task {
        let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        Task {
            id,
            title: title.to_string(),
            description: description.to_string(),
            due_date: day,
            priority: Priority::Medium,
            status: TaskStatus::Pending,
            created_at: day.and_hms_opt(9, 30, 0).unwrap(),
            completed_at: None,
        }
    }

    #[test]
    fn empty_file_has_header_only() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasks.csv");

        create_empty(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "id,title,description,due_date,priority,status,created_at,completed_at\n"
        );
        assert!(read_tasks(&path).unwrap().is_empty());
    }

    #[test]
    fn rows_use_fixed_formats() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasks.csv");

        write_tasks(&path, &[sample(7, "Pay rent", "")]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let row = content.lines().nth(1).unwrap();
        assert_eq!(row, "7,Pay rent,,2025-03-01,Medium,Pending,2025-03-01 09:30:00,");
    }

    #[test]
    fn delimiters_and_quotes_are_escaped() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasks.csv");
        let task = sample(1, "Buy eggs, milk", "say \"hi\"\nto Bob");

        write_tasks(&path, std::slice::from_ref(&task)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"Buy eggs, milk\""));
        assert_eq!(read_tasks(&path).unwrap(), vec![task]);
    }

    #[test]
    fn nested_directories_are_created() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a").join("b").join("tasks.csv");

        create_empty(&path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn malformed_row_fails_whole_read() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasks.csv");
        fs::write(
            &path,
            "id,title,description,due_date,priority,status,created_at,completed_at\n\
             1,Ok,,2025-03-01,High,Pending,2025-03-01 09:00:00,\n\
             two,Broken,,2025-03-01,High,Pending,2025-03-01 09:00:00,\n",
        )
        .unwrap();

        let err = read_tasks(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("row 3"));
    }

    fn read_rows(rows: &str) -> Result<Vec<Task>> {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasks.csv");
        fs::write(
            &path,
            format!(
                "id,title,description,due_date,priority,status,created_at,completed_at\n{}",
                rows
            ),
        )
        .unwrap();
        read_tasks(&path)
    }

    #[test]
    fn duplicate_id_is_rejected_with_row() {
        let err = read_rows(
            "1,A,,2025-03-01,High,Pending,2025-03-01 09:00:00,\n\
             1,B,,2025-03-01,High,Pending,2025-03-01 09:00:00,\n",
        )
        .unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.contains("row 3"));
        assert!(message.contains("duplicate task id 1"));
    }

    #[test]
    fn zero_id_is_rejected() {
        let err = read_rows("0,Z,,2025-03-01,Low,Pending,2025-03-01 09:00:00,\n").unwrap_err();
        assert!(format!("{:#}", err).contains("at least 1"));
    }

    #[test]
    fn status_must_agree_with_completed_at() {
        assert!(read_rows("1,A,,2025-03-01,Low,Completed,2025-03-01 09:00:00,\n").is_err());
        assert!(
            read_rows("1,A,,2025-03-01,Low,Pending,2025-03-01 09:00:00,2025-03-02 10:00:00\n")
                .is_err()
        );
        assert!(
            read_rows("1,A,,2025-03-01,Low,Overdue,2025-03-01 09:00:00,2025-03-02 10:00:00\n")
                .is_err()
        );
        let ok = read_rows(
            "1,A,,2025-03-01,Low,Completed,2025-03-01 09:00:00,2025-03-02 10:00:00\n",
        )
        .unwrap();
        assert!(ok[0].completed_at.is_some());
    }
}
