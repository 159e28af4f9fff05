//! Filter subcommand for smart-todo CLI

use crate::store::query::TaskFilter;
use crate::types::{Priority, TaskStatus};
use clap::Args;

/// Arguments for the filter subcommand. Exactly one criterion is required.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct FilterArgs {
    /// Tasks with this status (pending, completed, overdue)
    #[arg(long)]
    pub status: Option<TaskStatus>,

    /// Tasks with this priority (high, medium, low)
    #[arg(long)]
    pub priority: Option<Priority>,

    /// Tasks due today or tomorrow
    #[arg(long)]
    pub due_soon: bool,
}

impl FilterArgs {
    pub fn to_filter(&self) -> TaskFilter {
        if let Some(status) = self.status {
            TaskFilter::Status(status)
        } else if let Some(priority) = self.priority {
            TaskFilter::Priority(priority)
        } else {
            TaskFilter::DueSoon
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;

    fn parse(args: &[&str]) -> Result<FilterArgs, clap::Error> {
        let mut argv = vec!["smart-todo", "filter"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv)?.command {
            Some(Command::Filter(f)) => Ok(f),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn status_filter() {
        let f = parse(&["--status", "overdue"]).unwrap();
        assert_eq!(f.to_filter(), TaskFilter::Status(TaskStatus::Overdue));
    }

    #[test]
    fn priority_shorthand() {
        let f = parse(&["--priority", "H"]).unwrap();
        assert_eq!(f.to_filter(), TaskFilter::Priority(Priority::High));
    }

    #[test]
    fn due_soon_filter() {
        assert_eq!(parse(&["--due-soon"]).unwrap().to_filter(), TaskFilter::DueSoon);
    }

    #[test]
    fn requires_exactly_one_criterion() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["--due-soon", "--status", "pending"]).is_err());
    }
}
