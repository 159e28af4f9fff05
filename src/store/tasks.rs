//! Task creation, completion, deletion and lookup.

use super::TaskStore;
use crate::error::{StoreError, StoreResult};
use crate::types::{NewTask, Task, TaskStatus};
use tracing::info;

impl TaskStore {
    /// Next id to assign: one past the highest existing id, or 1 when empty.
    ///
    /// The file keeps no high-water mark, so deleting the task holding the
    /// current maximum makes that id available again. Fails once the highest
    /// id is `u32::MAX`.
    pub fn next_id(&self) -> StoreResult<u32> {
        match self.tasks.iter().map(|t| t.id).max() {
            None => Ok(1),
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| StoreError::validation("id", format!("no ids left after {}", max))),
        }
    }

    /// Create a task. The due date must be today or later.
    pub fn add(&mut self, input: NewTask) -> StoreResult<Task> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(StoreError::validation("title", "title cannot be empty"));
        }

        let today = self.clock.today();
        if input.due_date < today {
            return Err(StoreError::validation(
                "due_date",
                format!(
                    "{} is in the past, use today ({}) or a later date",
                    input.due_date, today
                ),
            ));
        }

        let task = Task {
            id: self.next_id()?,
            title: title.to_string(),
            description: input.description.trim().to_string(),
            due_date: input.due_date,
            priority: input.priority,
            status: TaskStatus::Pending,
            created_at: self.clock.now(),
            completed_at: None,
        };

        self.tasks.push(task.clone());
        info!(task_id = task.id, title = %task.title, due = %task.due_date, "Task added");
        self.save()?;
        Ok(task)
    }

    /// Mark a task completed, stamping `completed_at`.
    pub fn complete(&mut self, id: u32) -> StoreResult<Task> {
        let now = self.clock.now();
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))?;

        if task.status == TaskStatus::Completed {
            return Err(StoreError::AlreadyCompleted(id));
        }

        task.status = TaskStatus::Completed;
        task.completed_at = Some(now);
        let task = task.clone();

        info!(task_id = id, "Task completed");
        self.save()?;
        Ok(task)
    }

    /// Remove a task permanently. Confirmation is the caller's concern.
    pub fn delete(&mut self, id: u32) -> StoreResult<Task> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))?;

        let removed = self.tasks.remove(index);
        info!(task_id = id, title = %removed.title, "Task deleted");
        self.save()?;
        Ok(removed)
    }

    pub fn find(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }
}
