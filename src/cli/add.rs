//! Add subcommand for smart-todo CLI

use crate::error::StoreResult;
use crate::types::{NewTask, Priority, parse_due_date};
use clap::Args;

/// Arguments for the add subcommand
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Task title
    pub title: String,

    /// Optional longer description
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Due date (YYYY-MM-DD), today or later
    #[arg(long, value_name = "DATE")]
    pub due: String,

    /// Priority: high/medium/low or H/M/L
    #[arg(short, long, default_value = "medium")]
    pub priority: Priority,
}

impl AddArgs {
    /// Validate the date format and build the store input.
    pub fn to_new_task(&self) -> StoreResult<NewTask> {
        Ok(NewTask {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: parse_due_date(&self.due)?,
            priority: self.priority,
        })
    }
}
