//! CLI command definitions for smart-todo
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.
//! Running without a subcommand starts the interactive menu.

pub mod add;
pub mod export;
pub mod filter;

use crate::format::OutputFormat;
use add::AddArgs;
use clap::{Parser, Subcommand};
use export::ExportArgs;
use filter::FilterArgs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Smart to-do list manager
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the tasks CSV file (overrides config)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Enable verbose logging (ignored when RUST_LOG is set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Output format for task listings
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Level used when `RUST_LOG` is unset.
    pub fn default_log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "warn" }
    }

    /// `RUST_LOG` when it parses, otherwise [`Cli::default_log_level`].
    pub fn log_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_log_level()))
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive menu (default if no subcommand given)
    Menu,

    /// Add a new task
    Add(AddArgs),

    /// List all tasks, overdue first
    List,

    /// Mark a task as completed
    Complete {
        /// Task ID
        id: u32,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: u32,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List tasks matching a status, priority or due-date filter
    Filter(FilterArgs),

    /// Search titles and descriptions (case-insensitive)
    Search {
        /// Keyword to look for
        keyword: String,
    },

    /// Show counts and today's tasks
    Dashboard,

    /// Write a plain-text summary report
    Export(ExportArgs),
}
