//! Plain-text summary report.
//!
//! The report is built from the same aggregation the dashboard uses:
//! counts by status, every task grouped by priority, and the upcoming window.

use crate::store::stats::UPCOMING_WINDOW_DAYS;
use crate::types::{Priority, Summary, TIMESTAMP_FORMAT, Task};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

const REPORT_EXTENSION: &str = "txt";

/// Resolve the report file name, appending `.txt` when missing.
pub fn report_path(requested: Option<&Path>, default: &Path) -> PathBuf {
    let path = match requested {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => default.to_path_buf(),
    };

    let has_txt = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(REPORT_EXTENSION));
    if has_txt {
        path
    } else {
        let mut name = path.into_os_string();
        name.push(".");
        name.push(REPORT_EXTENSION);
        PathBuf::from(name)
    }
}

/// Render the report. `tasks` should already be reconciled.
pub fn render_report(tasks: &[Task], summary: &Summary<'_>, generated_at: NaiveDateTime) -> String {
    let mut out = String::new();
    let rule = "-".repeat(50);

    out.push_str("TASK SUMMARY REPORT\n");
    out.push_str(&"=".repeat(50));
    out.push('\n');
    out.push_str(&format!(
        "Report generated on: {}\n\n",
        generated_at.format(TIMESTAMP_FORMAT)
    ));

    out.push_str("STATISTICS:\n");
    out.push_str(&format!("Total Tasks: {}\n", summary.total));
    out.push_str(&format!("Pending: {}\n", summary.pending));
    out.push_str(&format!("Completed: {}\n", summary.completed));
    out.push_str(&format!("Overdue: {}\n\n", summary.overdue));

    for priority in Priority::ALL {
        let group: Vec<&Task> = tasks.iter().filter(|t| t.priority == priority).collect();
        if group.is_empty() {
            continue;
        }
        out.push_str(&format!(
            "\n{} PRIORITY TASKS:\n{}\n",
            priority.as_str().to_uppercase(),
            rule
        ));
        for task in group {
            out.push_str(&format!(
                "{:<15} {:<30} Due: {}\n",
                format!("[{}]", task.status),
                task.title,
                task.due_date
            ));
            if !task.description.is_empty() {
                out.push_str(&format!("{:>15} Description: {}\n", "", task.description));
            }
        }
    }

    out.push_str(&format!(
        "\n\nUPCOMING TASKS (Next {} days):\n{}\n",
        UPCOMING_WINDOW_DAYS, rule
    ));
    if summary.upcoming.is_empty() {
        out.push_str(&format!(
            "No upcoming tasks in the next {} days.\n",
            UPCOMING_WINDOW_DAYS
        ));
    } else {
        for task in &summary.upcoming {
            out.push_str(&format!(
                "{} - {} [{}]\n",
                task.due_date, task.title, task.priority
            ));
        }
    }

    out
}

/// Write `content` to `path`, replacing any existing file.
pub fn write_report(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("cannot write report {}", path.display()))?;
    info!(path = %path.display(), bytes = content.len(), "Summary exported");
    Ok(())
}

/// Open `path` with the platform's default application.
pub fn open_in_shell(path: &Path) -> Result<()> {
    let mut command = if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else if cfg!(target_os = "macos") {
        Command::new("open")
    } else {
        Command::new("xdg-open")
    };

    debug!(path = %path.display(), "Opening report");
    command
        .arg(path)
        .spawn()
        .with_context(|| format!("cannot open {}", path.display()))?;
    Ok(())
}
