//! Overdue status reconciliation.

use super::TaskStore;
use crate::types::{Task, TaskStatus};
use chrono::NaiveDate;
use tracing::debug;

/// Recompute Pending/Overdue for every task that is not completed.
///
/// A past due date moves a task to Overdue; a due date of today or later moves
/// an Overdue task back to Pending. Completed tasks are never touched.
/// Returns whether any task changed.
pub fn reconcile_overdue(tasks: &mut [Task], today: NaiveDate) -> bool {
    let mut changed = false;

    for task in tasks.iter_mut() {
        if task.status == TaskStatus::Completed {
            continue;
        }

        let next = if task.due_date < today {
            TaskStatus::Overdue
        } else if task.status == TaskStatus::Overdue {
            // Only reachable if a due date moved into the future.
            TaskStatus::Pending
        } else {
            continue;
        };

        if task.status != next {
            debug!(task_id = task.id, from = %task.status, to = %next, "Status reconciled");
            task.status = next;
            changed = true;
        }
    }

    changed
}

impl TaskStore {
    /// Reconcile against `today` without persisting.
    pub fn reconcile_overdue(&mut self, today: NaiveDate) -> bool {
        reconcile_overdue(&mut self.tasks, today)
    }
}
