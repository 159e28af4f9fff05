//! Read-only filters, search and display ordering.
//!
//! These functions never mutate or persist; call [`TaskStore::refresh`] first
//! so statuses reflect today's date.

use super::TaskStore;
use crate::types::{Priority, Task, TaskStatus};
use chrono::{Days, NaiveDate};

/// A predicate over tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskFilter {
    Status(TaskStatus),
    /// Due today or tomorrow, whatever the status.
    DueSoon,
    Priority(Priority),
    /// Case-insensitive substring of title or description.
    Search(String),
}

impl TaskFilter {
    pub fn search(keyword: &str) -> Self {
        TaskFilter::Search(keyword.trim().to_lowercase())
    }

    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        match self {
            TaskFilter::Status(status) => task.status == *status,
            TaskFilter::DueSoon => {
                let tomorrow = today + Days::new(1);
                task.due_date == today || task.due_date == tomorrow
            }
            TaskFilter::Priority(priority) => task.priority == *priority,
            TaskFilter::Search(keyword) => {
                let keyword = keyword.to_lowercase();
                task.title.to_lowercase().contains(&keyword)
                    || task.description.to_lowercase().contains(&keyword)
            }
        }
    }

    /// Heading used when rendering the filtered list.
    pub fn label(&self) -> String {
        match self {
            TaskFilter::Status(status) => format!("{} Tasks", status),
            TaskFilter::DueSoon => "Tasks Due Today or Tomorrow".to_string(),
            TaskFilter::Priority(priority) => format!("{} Priority Tasks", priority),
            TaskFilter::Search(keyword) => {
                format!("Search Results for '{}'", keyword.to_uppercase())
            }
        }
    }
}

/// Tasks matching `filter`, in collection order.
pub fn filter_tasks<'a>(tasks: &'a [Task], filter: &TaskFilter, today: NaiveDate) -> Vec<&'a Task> {
    tasks.iter().filter(|t| filter.matches(t, today)).collect()
}

/// Overdue first, then by priority, then by due date. Stable, so equal keys
/// keep collection order.
pub fn sort_for_display(tasks: &mut [&Task]) {
    tasks.sort_by_key(|t| {
        (
            if t.status == TaskStatus::Overdue { 0u8 } else { 1 },
            t.priority.rank(),
            t.due_date,
        )
    });
}

impl TaskStore {
    /// Every task in display order.
    pub fn list_sorted(&self) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self.tasks.iter().collect();
        sort_for_display(&mut tasks);
        tasks
    }

    pub fn filter(&self, filter: &TaskFilter) -> Vec<&Task> {
        filter_tasks(&self.tasks, filter, self.clock.today())
    }

    pub fn search(&self, keyword: &str) -> Vec<&Task> {
        self.filter(&TaskFilter::search(keyword))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn task(id: u32, title: &str, priority: Priority, due: NaiveDate, status: TaskStatus) -> Task {
        Task {
            id,
            title: title.to_string(),
            description: String::new(),
            due_date: due,
            priority,
            status,
            created_at: day(1).and_hms_opt(8, 0, 0).unwrap(),
            completed_at: None,
        }
    }

    #[test]
    fn overdue_ranks_before_priority() {
        let a = task(1, "A", Priority::Low, day(10), TaskStatus::Overdue);
        let b = task(2, "B", Priority::High, day(5), TaskStatus::Pending);
        let c = task(3, "C", Priority::High, day(1), TaskStatus::Overdue);
        let mut list = vec![&a, &b, &c];

        sort_for_display(&mut list);

        let titles: Vec<&str> = list.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A", "B"]);
    }

    #[test]
    fn ties_keep_collection_order() {
        let first = task(1, "first", Priority::Medium, day(5), TaskStatus::Pending);
        let second = task(2, "second", Priority::Medium, day(5), TaskStatus::Pending);
        let mut list = vec![&first, &second];

        sort_for_display(&mut list);

        assert_eq!(list[0].id, 1);
        assert_eq!(list[1].id, 2);
    }

    #[test]
    fn due_soon_covers_today_and_tomorrow_only() {
        let tasks = vec![
            task(1, "yesterday", Priority::Low, day(4), TaskStatus::Overdue),
            task(2, "today", Priority::Low, day(5), TaskStatus::Pending),
            task(3, "tomorrow", Priority::Low, day(6), TaskStatus::Completed),
            task(4, "later", Priority::Low, day(7), TaskStatus::Pending),
        ];

        let ids: Vec<u32> = filter_tasks(&tasks, &TaskFilter::DueSoon, day(5))
            .iter()
            .map(|t| t.id)
            .collect();

        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn search_matches_description_case_insensitively() {
        let mut t = task(1, "Groceries", Priority::Low, day(5), TaskStatus::Pending);
        t.description = "Remember the OAT milk".to_string();
        let tasks = vec![t, task(2, "Taxes", Priority::High, day(5), TaskStatus::Pending)];

        let found = filter_tasks(&tasks, &TaskFilter::search("oat MILK"), day(5));

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 1);
    }

    #[test]
    fn status_and_priority_filters() {
        let tasks = vec![
            task(1, "a", Priority::High, day(5), TaskStatus::Pending),
            task(2, "b", Priority::Low, day(5), TaskStatus::Overdue),
            task(3, "c", Priority::High, day(5), TaskStatus::Overdue),
        ];

        let overdue = filter_tasks(&tasks, &TaskFilter::Status(TaskStatus::Overdue), day(5));
        let high = filter_tasks(&tasks, &TaskFilter::Priority(Priority::High), day(5));

        assert_eq!(overdue.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(high.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn labels_for_headings() {
        assert_eq!(TaskFilter::Status(TaskStatus::Pending).label(), "Pending Tasks");
        assert_eq!(TaskFilter::Priority(Priority::High).label(), "High Priority Tasks");
        assert_eq!(TaskFilter::search("milk").label(), "Search Results for 'MILK'");
    }
}
