//! Aggregation for the dashboard and the export report.

use super::TaskStore;
use crate::types::{PriorityCounts, Summary, Task, TaskStatus};
use chrono::{Days, NaiveDate};

/// Length of the upcoming window after today, inclusive of both ends.
pub const UPCOMING_WINDOW_DAYS: u64 = 7;

/// Summarize `tasks` relative to `today`.
pub fn summarize(tasks: &[Task], today: NaiveDate) -> Summary<'_> {
    let window_end = today + Days::new(UPCOMING_WINDOW_DAYS);

    let mut summary = Summary {
        total: tasks.len(),
        pending: 0,
        completed: 0,
        overdue: 0,
        active_by_priority: PriorityCounts::default(),
        due_today: Vec::new(),
        upcoming: Vec::new(),
    };

    for task in tasks {
        match task.status {
            TaskStatus::Pending => summary.pending += 1,
            TaskStatus::Completed => summary.completed += 1,
            TaskStatus::Overdue => summary.overdue += 1,
        }

        if task.status != TaskStatus::Completed {
            summary.active_by_priority.bump(task.priority);
            if task.due_date == today {
                summary.due_today.push(task);
            }
        }

        if task.status == TaskStatus::Pending
            && task.due_date >= today
            && task.due_date <= window_end
        {
            summary.upcoming.push(task);
        }
    }

    summary.upcoming.sort_by_key(|t| t.due_date);
    summary
}

impl TaskStore {
    pub fn summary(&self) -> Summary<'_> {
        summarize(&self.tasks, self.clock.today())
    }
}
