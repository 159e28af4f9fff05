//! Terminal rendering of task lists, the dashboard and JSON output.

use crate::types::{Priority, Summary, Task, TaskStatus};
use anyhow::Result;
use chrono::NaiveDate;
use colored::{ColoredString, Colorize};

/// Output format for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned, colorized table
    #[default]
    Table,
    /// JSON array of tasks
    Json,
}

const ID_WIDTH: usize = 6;
const TITLE_WIDTH: usize = 30;
const DUE_WIDTH: usize = 22;
const PRIORITY_WIDTH: usize = 10;
const STATUS_WIDTH: usize = 18;
const CREATED_WIDTH: usize = 20;
const TABLE_WIDTH: usize =
    ID_WIDTH + TITLE_WIDTH + DUE_WIDTH + PRIORITY_WIDTH + STATUS_WIDTH + CREATED_WIDTH + 5;

/// Enable or disable ANSI colors for the whole process.
pub fn set_color(enabled: bool) {
    colored::control::set_override(enabled);
}

/// Boxed section heading.
pub fn header(text: &str) -> String {
    let rule = "=".repeat(60);
    format!(
        "\n{}\n{} {} {}\n{}",
        rule.cyan(),
        "===".cyan(),
        format!("{:^52}", text).white().bold(),
        "===".cyan(),
        rule.cyan()
    )
}

fn priority_color(priority: Priority, text: String) -> ColoredString {
    match priority {
        Priority::High => text.red(),
        Priority::Medium => text.yellow(),
        Priority::Low => text.green(),
    }
}

fn status_cell(status: TaskStatus) -> ColoredString {
    let (marker, text) = match status {
        TaskStatus::Overdue => ("[!]", status.as_str()),
        TaskStatus::Completed => ("[✓]", status.as_str()),
        TaskStatus::Pending => ("[-]", status.as_str()),
    };
    let cell = format!("{:<width$}", format!("{} {}", marker, text), width = STATUS_WIDTH);
    match status {
        TaskStatus::Overdue => cell.red(),
        TaskStatus::Completed => cell.green(),
        TaskStatus::Pending => cell.yellow(),
    }
}

/// Shorten to fit the title column, on character boundaries.
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() > TITLE_WIDTH - 3 {
        let head: String = title.chars().take(TITLE_WIDTH - 6).collect();
        format!("{}...", head)
    } else {
        title.to_string()
    }
}

/// Due date with a relative hint for tasks that are still open.
pub fn due_label(task: &Task, today: NaiveDate) -> String {
    if task.is_completed() {
        return task.due_date.to_string();
    }
    match task.days_until_due(today) {
        d if d < 0 => format!("{} ({}d late)", task.due_date, -d),
        0 => format!("{} (Today!)", task.due_date),
        1 => format!("{} (Tomorrow)", task.due_date),
        d => format!("{} ({}d left)", task.due_date, d),
    }
}

/// Render tasks as a table followed by a per-status summary line.
pub fn render_table(tasks: &[&Task], today: NaiveDate) -> String {
    if tasks.is_empty() {
        return format!("{}\n", "No tasks to display!".yellow());
    }

    let rule = "-".repeat(TABLE_WIDTH);
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", rule.cyan()));
    out.push_str(&format!(
        "{}\n",
        format!(
            "{:<ID_WIDTH$}{:<TITLE_WIDTH$}{:<DUE_WIDTH$}{:<PRIORITY_WIDTH$}{:<STATUS_WIDTH$}{:<CREATED_WIDTH$}",
            "ID", "Title", "Due Date", "Priority", "Status", "Created"
        )
        .white()
        .bold()
    ));
    out.push_str(&format!("{}\n", rule.cyan()));

    for task in tasks {
        out.push_str(&format!(
            "{}{}{}{}{}{}\n",
            format!("{:<ID_WIDTH$}", task.id).white(),
            format!("{:<TITLE_WIDTH$}", truncate_title(&task.title)).white(),
            format!("{:<DUE_WIDTH$}", due_label(task, today)).cyan(),
            priority_color(task.priority, format!("{:<PRIORITY_WIDTH$}", task.priority)),
            status_cell(task.status),
            format!(
                "{:<CREATED_WIDTH$}",
                task.created_at.format(crate::types::TIMESTAMP_FORMAT).to_string()
            )
            .blue(),
        ));
    }

    out.push_str(&format!("{}\n", rule.cyan()));

    let count = |status: TaskStatus| tasks.iter().filter(|t| t.status == status).count();
    out.push_str(&format!(
        "\n{} {}  {}  {}  {}\n",
        "Summary:".white().bold(),
        format!("Pending: {}", count(TaskStatus::Pending)).yellow(),
        format!("Completed: {}", count(TaskStatus::Completed)).green(),
        format!("Overdue: {}", count(TaskStatus::Overdue)).red(),
        format!("Total: {}", tasks.len()).cyan(),
    ));

    out
}

/// One-line-per-task list used when picking an id.
pub fn render_picker(tasks: &[&Task]) -> String {
    let mut out = String::new();
    for task in tasks {
        let title = match task.status {
            TaskStatus::Completed => task.title.green(),
            TaskStatus::Overdue => task.title.red(),
            TaskStatus::Pending => task.title.yellow(),
        };
        out.push_str(&format!("  ID: {:<3} {}\n", task.id.to_string().white(), title));
    }
    out
}

/// At-a-glance statistics and today's tasks.
pub fn render_dashboard(summary: &Summary<'_>) -> String {
    if summary.total == 0 {
        return format!(
            "{}\n",
            "No tasks yet! Start by adding your first task.".yellow()
        );
    }

    let rule = "─".repeat(40);
    let mut out = String::new();

    out.push_str(&format!("\n{}\n{}\n", "OVERVIEW".white().bold(), rule.cyan()));
    out.push_str(&format!("Total Tasks: {}\n", summary.total.to_string().cyan()));
    out.push_str(&format!("{}\n", format!("Pending: {}", summary.pending).yellow()));
    out.push_str(&format!(
        "{}\n",
        format!(
            "Completed: {} ({:.1}%)",
            summary.completed,
            summary.completion_rate()
        )
        .green()
    ));
    out.push_str(&format!("{}\n", format!("Overdue: {}", summary.overdue).red()));

    out.push_str(&format!(
        "\n{}\n{}\n",
        "ACTIVE TASKS BY PRIORITY".white().bold(),
        rule.cyan()
    ));
    for priority in Priority::ALL {
        let line = format!("{}: {}", priority, summary.active_by_priority.get(priority));
        out.push_str(&format!("{}\n", priority_color(priority, line)));
    }

    out.push_str(&format!("\n{}\n{}\n", "TODAY'S TASKS".white().bold(), rule.cyan()));
    if summary.due_today.is_empty() {
        out.push_str(&format!("{}\n", "No tasks due today!".green()));
    } else {
        for task in &summary.due_today {
            let tag = priority_color(task.priority, format!("[{}]", task.priority));
            out.push_str(&format!("{} {}\n", tag, task.title));
        }
    }

    out
}

/// Tasks as a pretty-printed JSON array.
pub fn render_json(tasks: &[&Task]) -> Result<String> {
    Ok(serde_json::to_string_pretty(tasks)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::stats::summarize;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn task(id: u32, title: &str, due: NaiveDate, status: TaskStatus) -> Task {
        Task {
            id,
            title: title.to_string(),
            description: String::new(),
            due_date: due,
            priority: Priority::High,
            status,
            created_at: day(1).and_hms_opt(8, 15, 0).unwrap(),
            completed_at: (status == TaskStatus::Completed)
                .then(|| day(2).and_hms_opt(8, 0, 0).unwrap()),
        }
    }

    #[test]
    fn long_titles_are_truncated() {
        let long = "a".repeat(40);
        let short = truncate_title(&long);
        assert_eq!(short.chars().count(), 27);
        assert!(short.ends_with("..."));
        assert_eq!(truncate_title("Short"), "Short");
    }

    #[test]
    fn truncation_is_char_safe() {
        let title = "é".repeat(35);
        assert!(truncate_title(&title).starts_with("éé"));
    }

    #[test]
    fn due_labels_describe_distance() {
        let today = day(10);
        assert_eq!(
            due_label(&task(1, "t", day(7), TaskStatus::Overdue), today),
            "2025-01-07 (3d late)"
        );
        assert_eq!(
            due_label(&task(1, "t", day(10), TaskStatus::Pending), today),
            "2025-01-10 (Today!)"
        );
        assert_eq!(
            due_label(&task(1, "t", day(11), TaskStatus::Pending), today),
            "2025-01-11 (Tomorrow)"
        );
        assert_eq!(
            due_label(&task(1, "t", day(15), TaskStatus::Pending), today),
            "2025-01-15 (5d left)"
        );
        assert_eq!(
            due_label(&task(1, "t", day(7), TaskStatus::Completed), today),
            "2025-01-07"
        );
    }

    #[test]
    fn table_contains_rows_and_summary() {
        let a = task(1, "Write report", day(12), TaskStatus::Pending);
        let b = task(2, "File taxes", day(3), TaskStatus::Overdue);

        let out = render_table(&[&a, &b], day(10));

        assert!(out.contains("Write report"));
        assert!(out.contains("File taxes"));
        assert!(out.contains("[!] Overdue"));
        assert!(out.contains("2025-01-01 08:15:00"));
        assert!(out.contains("Pending: 1"));
        assert!(out.contains("Overdue: 1"));
        assert!(out.contains("Total: 2"));
    }

    #[test]
    fn empty_table_says_so() {
        assert!(render_table(&[], day(1)).contains("No tasks to display!"));
    }

    #[test]
    fn dashboard_lists_todays_tasks() {
        let tasks = vec![
            task(1, "Stand-up notes", day(10), TaskStatus::Pending),
            task(2, "Old thing", day(2), TaskStatus::Completed),
        ];
        let summary = summarize(&tasks, day(10));

        let out = render_dashboard(&summary);

        assert!(out.contains("Total Tasks"));
        assert!(out.contains("Completed: 1 (50.0%)"));
        assert!(out.contains("High: 1"));
        assert!(out.contains("Stand-up notes"));
    }

    #[test]
    fn json_uses_file_timestamp_format() {
        let t = task(4, "Ship", day(10), TaskStatus::Pending);
        let json = render_json(&[&t]).unwrap();
        assert!(json.contains("\"created_at\": \"2025-01-01 08:15:00\""));
        assert!(json.contains("\"completed_at\": \"\""));
        assert!(json.contains("\"priority\": \"High\""));
    }
}
