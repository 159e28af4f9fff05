//! Export subcommand for smart-todo CLI
//!
//! Writes the plain-text summary report and can hand it to the OS viewer.

use crate::export::report_path;
use clap::Args;
use std::path::{Path, PathBuf};

/// Arguments for the export subcommand
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output file path (default from config, `.txt` appended if missing)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Open the report with the default application afterwards
    #[arg(long)]
    pub open: bool,
}

impl ExportArgs {
    /// Resolve the report path against the configured default.
    pub fn output_path(&self, default: &Path) -> PathBuf {
        report_path(self.output.as_deref(), default)
    }
}
