//! Numbered-menu session over a [`TaskStore`].
//!
//! All prompting, retry loops, confirmation and colorized output live here;
//! the store only sees validated calls. Input and output are generic so a
//! session can be scripted in tests.

use crate::error::StoreError;
use crate::export::{open_in_shell, render_report, report_path, write_report};
use crate::format::{header, render_dashboard, render_picker, render_table};
use crate::store::TaskStore;
use crate::store::query::TaskFilter;
use crate::types::{NewTask, Priority, Task, TaskStatus, parse_due_date};
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Printed when the session is ended with Ctrl+C.
pub const INTERRUPTED_MESSAGE: &str = "Program interrupted. Goodbye!";

/// Exit with a goodbye line on Ctrl+C.
///
/// Mutations are written before they return; only a change whose save
/// already failed is lost.
pub fn install_interrupt_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| {
        println!("\n\n{}", INTERRUPTED_MESSAGE.yellow());
        std::process::exit(0);
    })
}

/// What the menu loop should do after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// An interactive session.
pub struct Menu<'a, R, W> {
    store: &'a mut TaskStore,
    input: R,
    out: W,
    export_default: PathBuf,
    pause: bool,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(store: &'a mut TaskStore, input: R, out: W) -> Self {
        Self {
            store,
            input,
            out,
            export_default: PathBuf::from("task_summary.txt"),
            pause: false,
        }
    }

    /// Default report file offered by the export action.
    pub fn with_export_default(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_default = path.into();
        self
    }

    /// Wait for Enter and clear the screen between actions.
    pub fn with_pause(mut self, pause: bool) -> Self {
        self.pause = pause;
        self
    }

    /// Run until the user exits or input ends.
    pub fn run(mut self) -> io::Result<()> {
        writeln!(self.out, "{}", header("SMART TO-DO LIST MANAGER"))?;
        writeln!(self.out, "{}", "Welcome! Let's get organized.".yellow())?;

        loop {
            self.print_menu()?;
            let Some(choice) = self.prompt("Select an option (1-9): ")? else {
                break;
            };

            let flow = match choice.as_str() {
                "1" => self.add_task()?,
                "2" => self.view_all()?,
                "3" => self.complete_task()?,
                "4" => self.delete_task()?,
                "5" => self.filter_tasks()?,
                "6" => self.search_tasks()?,
                "7" => self.dashboard()?,
                "8" => self.export_summary()?,
                "9" => Flow::Exit,
                other => {
                    debug!(choice = other, "Unknown menu choice");
                    writeln!(
                        self.out,
                        "\n{}",
                        "Invalid choice! Please select a valid option (1-9)".red()
                    )?;
                    Flow::Continue
                }
            };

            if flow == Flow::Exit {
                break;
            }

            if self.pause {
                if self.prompt("\nPress Enter to continue...")?.is_none() {
                    break;
                }
                write!(self.out, "\x1B[2J\x1B[1;1H")?;
            }
        }

        writeln!(self.out, "\n{}", "Thank you for using Smart To-Do List Manager!".green().bold())?;
        Ok(())
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.out, "\n{}", "=== MAIN MENU ===".cyan())?;
        for (n, label) in [
            "Add Task",
            "View All Tasks",
            "Mark Task as Completed",
            "Delete Task",
            "Filter Tasks",
            "Search Tasks",
            "Dashboard",
            "Export Summary",
            "Exit",
        ]
        .iter()
        .enumerate()
        {
            writeln!(self.out, "{}. {}", n + 1, label)?;
        }
        Ok(())
    }

    /// Read one trimmed line. `None` on end of input.
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.out, "{}", message.yellow())?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn confirm(&mut self, message: &str) -> io::Result<bool> {
        Ok(self
            .prompt(message)?
            .is_some_and(|answer| answer.eq_ignore_ascii_case("yes")))
    }

    fn report(&mut self, err: &StoreError) -> io::Result<()> {
        let line = match err {
            StoreError::AlreadyCompleted(_) => format!("{}", err).yellow(),
            StoreError::Save { .. } => format!("WARNING: {}", err).red().bold(),
            _ => format!("Error: {}", err).red(),
        };
        writeln!(self.out, "{}", line)
    }

    /// Reconcile before a read; a failed save is reported but not fatal.
    fn refresh(&mut self) -> io::Result<()> {
        if let Err(e) = self.store.refresh() {
            self.report(&e)?;
        }
        Ok(())
    }

    fn read_id(&mut self, message: &str) -> io::Result<Option<u32>> {
        let Some(raw) = self.prompt(message)? else {
            return Ok(None);
        };
        match raw.parse::<u32>() {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                writeln!(self.out, "{}", "Error: Invalid task ID!".red())?;
                Ok(None)
            }
        }
    }

    fn add_task(&mut self) -> io::Result<Flow> {
        writeln!(self.out, "{}", header("ADD NEW TASK"))?;

        let Some(title) = self.prompt("Enter task title: ")? else {
            return Ok(Flow::Exit);
        };
        if title.is_empty() {
            writeln!(self.out, "{}", "Error: Title cannot be empty!".red())?;
            return Ok(Flow::Continue);
        }

        let Some(description) = self.prompt("Enter task description (optional): ")? else {
            return Ok(Flow::Exit);
        };

        let today = self.store.clock().today();
        writeln!(self.out, "{}", format!("Today's date: {}", today).blue())?;

        let due_date = loop {
            let Some(raw) = self.prompt("Enter due date (YYYY-MM-DD): ")? else {
                return Ok(Flow::Exit);
            };
            match parse_due_date(&raw) {
                Ok(date) if date < today => {
                    writeln!(
                        self.out,
                        "{}",
                        "Error: Due date cannot be in the past! Please enter today or a future date."
                            .red()
                    )?;
                }
                Ok(date) => {
                    let hint = match (date - today).num_days() {
                        0 => "Due today!".yellow(),
                        1 => "Due tomorrow!".green(),
                        n => format!("Due in {} days.", n).green(),
                    };
                    writeln!(self.out, "{}", hint)?;
                    break date;
                }
                Err(_) => {
                    writeln!(self.out, "{}", "Invalid date format! Please use YYYY-MM-DD".red())?;
                }
            }
        };

        let priority = loop {
            let Some(raw) = self.prompt("Enter priority (H/M/L): ")? else {
                return Ok(Flow::Exit);
            };
            match raw.parse::<Priority>() {
                Ok(p) => break p,
                Err(_) => {
                    writeln!(self.out, "{}", "Invalid priority! Please enter H, M, or L".red())?;
                }
            }
        };

        let input = NewTask {
            title,
            description,
            due_date,
            priority,
        };
        match self.store.add(input) {
            Ok(task) => writeln!(
                self.out,
                "\n{}",
                format!("✓ Task added successfully! (ID: {})", task.id).green().bold()
            )?,
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn view_all(&mut self) -> io::Result<Flow> {
        writeln!(self.out, "{}", header("ALL TASKS"))?;
        if self.store.is_empty() {
            writeln!(self.out, "{}", "No tasks found! Start by adding a new task.".yellow())?;
            return Ok(Flow::Continue);
        }

        self.refresh()?;
        let today = self.store.clock().today();
        let tasks = self.store.list_sorted();
        write!(self.out, "{}", render_table(&tasks, today))?;
        Ok(Flow::Continue)
    }

    fn complete_task(&mut self) -> io::Result<Flow> {
        writeln!(self.out, "{}", header("MARK TASK AS COMPLETED"))?;
        self.refresh()?;

        let open: Vec<&Task> = self
            .store
            .tasks()
            .iter()
            .filter(|t| !t.is_completed())
            .collect();
        if open.is_empty() {
            writeln!(self.out, "{}", "No pending tasks to complete!".yellow())?;
            return Ok(Flow::Continue);
        }
        writeln!(self.out, "\n{}", "Pending/Overdue tasks:".cyan())?;
        write!(self.out, "{}", render_picker(&open))?;

        let Some(id) = self.read_id("\nEnter task ID to mark as completed: ")? else {
            return Ok(Flow::Continue);
        };
        match self.store.complete(id) {
            Ok(task) => writeln!(
                self.out,
                "{}",
                format!("✓ Task '{}' marked as completed!", task.title).green().bold()
            )?,
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn delete_task(&mut self) -> io::Result<Flow> {
        writeln!(self.out, "{}", header("DELETE TASK"))?;
        self.refresh()?;
        if self.store.is_empty() {
            writeln!(self.out, "{}", "No tasks to delete!".yellow())?;
            return Ok(Flow::Continue);
        }

        let all: Vec<&Task> = self.store.tasks().iter().collect();
        writeln!(self.out, "\n{}", "Current tasks:".cyan())?;
        write!(self.out, "{}", render_picker(&all))?;

        let Some(id) = self.read_id("\nEnter task ID to delete: ")? else {
            return Ok(Flow::Continue);
        };
        let Some(task) = self.store.find(id).cloned() else {
            self.report(&StoreError::NotFound(id))?;
            return Ok(Flow::Continue);
        };

        writeln!(self.out, "\n{}", "Task to delete:".yellow())?;
        writeln!(self.out, "  Title: {}", task.title)?;
        writeln!(self.out, "  Due date: {}", task.due_date)?;
        writeln!(self.out, "  Status: {}", task.status)?;

        if !self.confirm("\nAre you sure you want to delete this task? (yes/no): ")? {
            writeln!(self.out, "{}", "Deletion cancelled.".yellow())?;
            return Ok(Flow::Continue);
        }
        match self.store.delete(id) {
            Ok(_) => writeln!(self.out, "{}", "✓ Task deleted successfully!".green().bold())?,
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn filter_tasks(&mut self) -> io::Result<Flow> {
        writeln!(self.out, "{}", header("FILTER TASKS"))?;
        writeln!(self.out, "1. Pending tasks")?;
        writeln!(self.out, "2. Completed tasks")?;
        writeln!(self.out, "3. Tasks due today or tomorrow")?;
        writeln!(self.out, "4. Overdue tasks")?;
        writeln!(self.out, "5. High priority tasks")?;

        let Some(choice) = self.prompt("\nSelect filter option (1-5): ")? else {
            return Ok(Flow::Exit);
        };
        let filter = match choice.as_str() {
            "1" => TaskFilter::Status(TaskStatus::Pending),
            "2" => TaskFilter::Status(TaskStatus::Completed),
            "3" => TaskFilter::DueSoon,
            "4" => TaskFilter::Status(TaskStatus::Overdue),
            "5" => TaskFilter::Priority(Priority::High),
            _ => {
                writeln!(self.out, "{}", "Invalid choice!".red())?;
                return Ok(Flow::Continue);
            }
        };

        self.refresh()?;
        let today = self.store.clock().today();
        let tasks = self.store.filter(&filter);
        writeln!(self.out, "{}", header(&filter.label().to_uppercase()))?;
        write!(self.out, "{}", render_table(&tasks, today))?;
        Ok(Flow::Continue)
    }

    fn search_tasks(&mut self) -> io::Result<Flow> {
        writeln!(self.out, "{}", header("SEARCH TASKS"))?;

        let Some(keyword) = self.prompt("Enter search keyword: ")? else {
            return Ok(Flow::Exit);
        };
        if keyword.is_empty() {
            writeln!(self.out, "{}", "Error: Search keyword cannot be empty!".red())?;
            return Ok(Flow::Continue);
        }

        self.refresh()?;
        let today = self.store.clock().today();
        let filter = TaskFilter::search(&keyword);
        let tasks = self.store.filter(&filter);
        writeln!(self.out, "{}", header(&filter.label().to_uppercase()))?;
        if tasks.is_empty() {
            writeln!(
                self.out,
                "{}",
                format!("No tasks found matching '{}'", keyword.to_lowercase()).yellow()
            )?;
        } else {
            write!(self.out, "{}", render_table(&tasks, today))?;
        }
        Ok(Flow::Continue)
    }

    fn dashboard(&mut self) -> io::Result<Flow> {
        writeln!(self.out, "{}", header("TASK DASHBOARD"))?;
        self.refresh()?;
        let summary = self.store.summary();
        write!(self.out, "{}", render_dashboard(&summary))?;
        Ok(Flow::Continue)
    }

    fn export_summary(&mut self) -> io::Result<Flow> {
        writeln!(self.out, "{}", header("EXPORT SUMMARY"))?;

        let question = format!(
            "Enter filename for export (default: {}): ",
            self.export_default.display()
        );
        let Some(name) = self.prompt(&question)? else {
            return Ok(Flow::Exit);
        };
        let path = report_path(Some(Path::new(&name)), &self.export_default);

        self.refresh()?;
        let now = self.store.clock().now();
        let content = render_report(self.store.tasks(), &self.store.summary(), now);
        if let Err(e) = write_report(&path, &content) {
            writeln!(self.out, "{}", format!("Error exporting summary: {:#}", e).red())?;
            return Ok(Flow::Continue);
        }
        writeln!(
            self.out,
            "{}",
            format!("✓ Summary exported successfully to {}", path.display()).green().bold()
        )?;

        if self.confirm("\nDo you want to open the file? (yes/no): ")? {
            if let Err(e) = open_in_shell(&path) {
                writeln!(self.out, "{}", format!("Error: {:#}", e).red())?;
            }
        }
        Ok(Flow::Continue)
    }
}
