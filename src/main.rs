//! Smart To-Do List Manager
//!
//! A single-user task tracker persisted to a CSV file, usable through an
//! interactive menu or one-shot subcommands.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use smart_todo::cli::add::AddArgs;
use smart_todo::cli::export::ExportArgs;
use smart_todo::cli::filter::FilterArgs;
use smart_todo::cli::{Cli, Command};
use smart_todo::config::Config;
use smart_todo::error::StoreError;
use smart_todo::export::{open_in_shell, render_report, write_report};
use smart_todo::format::{self, OutputFormat};
use smart_todo::interactive::{Menu, install_interrupt_handler};
use smart_todo::store::TaskStore;
use smart_todo::types::Task;
use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};
use tracing::{debug, error, warn};
use tracing_subscriber::FmtSubscriber;

fn main() {
    if let Err(e) = run() {
        error!(error = %format!("{:#}", e), "Exiting after error");
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;
    if let Err(e) = install_interrupt_handler() {
        warn!(error = %e, "Could not install Ctrl+C handler");
    }

    let mut config = Config::resolve(cli.config.as_deref())?;
    if let Some(file) = &cli.file {
        config.storage.tasks_file = file.clone();
    }
    if cli.no_color || !config.display.color {
        format::set_color(false);
    }
    debug!(?config, "Resolved configuration");

    let mut store = TaskStore::initialize(&config.storage.tasks_file);
    if let Some(e) = store.load_error() {
        eprintln!("{} {}", "Error reading tasks file:".red(), e);
        eprintln!(
            "{}",
            format!(
                "Continuing with an empty task list. The next change copies the file to {} before overwriting it.",
                store.backup_path().display()
            )
            .yellow()
        );
    }

    let outcome = match cli.command {
        Some(Command::Menu) | None => run_menu(&mut store, &config),
        Some(Command::Add(args)) => run_add(&mut store, args),
        Some(Command::List) => run_list(&mut store, cli.format),
        Some(Command::Complete { id }) => run_complete(&mut store, id),
        Some(Command::Delete { id, yes }) => run_delete(&mut store, id, yes),
        Some(Command::Filter(args)) => run_filter(&mut store, args, cli.format),
        Some(Command::Search { keyword }) => run_search(&mut store, &keyword, cli.format),
        Some(Command::Dashboard) => run_dashboard(&mut store),
        Some(Command::Export(args)) => run_export(&mut store, &config, args),
    };

    // Always attempt to close so an unsaved change gets one more write.
    let closed = store.close();
    outcome?;
    closed?;
    Ok(())
}

/// Initialize logging based on --log option.
///
/// The level comes from `RUST_LOG` when set, else `--verbose` (debug) or warn.
fn init_logging(cli: &Cli) -> Result<()> {
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(cli.log_filter())
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(cli.log_filter())
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)
                .with_context(|| format!("cannot open log file {}", filename))?;
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(cli.log_filter())
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

/// Report a reconciliation save failure without aborting the read.
fn refresh_or_warn(store: &mut TaskStore) {
    if let Err(e) = store.refresh() {
        eprintln!("{} {}", "WARNING:".red().bold(), e);
    }
}

fn print_tasks(tasks: &[&Task], store: &TaskStore, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Table => print!("{}", format::render_table(tasks, store.clock().today())),
        OutputFormat::Json => println!("{}", format::render_json(tasks)?),
    }
    Ok(())
}

fn run_menu(store: &mut TaskStore, config: &Config) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    Menu::new(store, stdin.lock(), stdout.lock())
        .with_export_default(&config.export.default_file)
        .with_pause(true)
        .run()?;
    Ok(())
}

fn run_add(store: &mut TaskStore, args: AddArgs) -> Result<()> {
    let task = store.add(args.to_new_task()?)?;
    println!(
        "{}",
        format!("✓ Task added successfully! (ID: {})", task.id).green().bold()
    );
    Ok(())
}

fn run_list(store: &mut TaskStore, output: OutputFormat) -> Result<()> {
    refresh_or_warn(store);
    let tasks = store.list_sorted();
    print_tasks(&tasks, store, output)
}

fn run_complete(store: &mut TaskStore, id: u32) -> Result<()> {
    match store.complete(id) {
        Ok(task) => {
            println!(
                "{}",
                format!("✓ Task '{}' marked as completed!", task.title).green().bold()
            );
            Ok(())
        }
        // Informational, not a failure.
        Err(e @ StoreError::AlreadyCompleted(_)) => {
            println!("{}", e.to_string().yellow());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn run_delete(store: &mut TaskStore, id: u32, yes: bool) -> Result<()> {
    let task = store.find(id).cloned().ok_or(StoreError::NotFound(id))?;

    if !yes {
        println!("{}", "Task to delete:".yellow());
        println!("  Title: {}", task.title);
        println!("  Due date: {}", task.due_date);
        println!("  Status: {}", task.status);
        print!(
            "{}",
            "Are you sure you want to delete this task? (yes/no): ".red()
        );
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        if !answer.trim().eq_ignore_ascii_case("yes") {
            println!("{}", "Deletion cancelled.".yellow());
            return Ok(());
        }
    }

    store.delete(id)?;
    println!("{}", "✓ Task deleted successfully!".green().bold());
    Ok(())
}

fn run_filter(store: &mut TaskStore, args: FilterArgs, output: OutputFormat) -> Result<()> {
    refresh_or_warn(store);
    let filter = args.to_filter();
    let tasks = store.filter(&filter);
    if output == OutputFormat::Table {
        println!("{}", format::header(&filter.label().to_uppercase()));
    }
    print_tasks(&tasks, store, output)
}

fn run_search(store: &mut TaskStore, keyword: &str, output: OutputFormat) -> Result<()> {
    if keyword.trim().is_empty() {
        return Err(StoreError::validation("keyword", "search keyword cannot be empty").into());
    }
    refresh_or_warn(store);
    let tasks = store.search(keyword);
    print_tasks(&tasks, store, output)
}

fn run_dashboard(store: &mut TaskStore) -> Result<()> {
    refresh_or_warn(store);
    println!("{}", format::header("TASK DASHBOARD"));
    print!("{}", format::render_dashboard(&store.summary()));
    Ok(())
}

fn run_export(store: &mut TaskStore, config: &Config, args: ExportArgs) -> Result<()> {
    refresh_or_warn(store);
    let path = args.output_path(&config.export.default_file);
    let generated_at = store.clock().now();
    let content = render_report(store.tasks(), &store.summary(), generated_at);
    write_report(&path, &content)?;
    println!(
        "{}",
        format!("✓ Summary exported successfully to {}", path.display()).green().bold()
    );

    if args.open {
        open_in_shell(&path)?;
    }
    Ok(())
}
