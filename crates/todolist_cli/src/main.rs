//! Terminal front end for the to-do list.
//!
//! # Responsibility
//! - Translate subcommands into controller events.
//! - Print the display-ordered list after every change.
//!
//! Indices shown and accepted are display positions.

use clap::{Parser, Subcommand};
use log::error;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use todolist_core::db::open_db;
use todolist_core::{
    default_log_level, init_logging, resolve_db_path, LoadReport, Renderer,
    SqliteKeyValueStore, StoreConfig, TodoItem, TodoListController, DEFAULT_STORAGE_KEY,
};

#[derive(Parser, Debug)]
#[command(name = "todolist", version, about = "Persisted, priority-sorted to-do list")]
struct Args {
    /// SQLite database file.
    #[arg(long, env = "TODOLIST_DB_PATH")]
    db: Option<PathBuf>,
    /// Key the list is stored under.
    #[arg(long, default_value = DEFAULT_STORAGE_KEY)]
    key: String,
    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, env = "TODOLIST_LOG_DIR")]
    log_dir: Option<PathBuf>,
    #[arg(long, env = "TODOLIST_LOG_LEVEL")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show items in display order.
    List,
    /// Add an item.
    Add {
        text: String,
        #[arg(long, short, default_value = "medium")]
        priority: String,
    },
    /// Flip completion of the item at a display index.
    Toggle { index: usize },
    /// Delete the item at a display index.
    Remove { index: usize },
    /// Delete every completed item.
    ClearCompleted,
    /// Print item counts.
    Summary,
}

struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn render(&mut self, ordered: &[TodoItem]) {
        if ordered.is_empty() {
            println!("(no items)");
            return;
        }
        for (index, item) in ordered.iter().enumerate() {
            let mark = if item.is_completed() { "x" } else { " " };
            println!(
                "{index:>3}. [{mark}] {:<6} {}",
                item.priority().as_str(),
                item.text()
            );
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = args.log_dir.as_deref() {
        let level = args.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    let db_path = resolve_db_path(args.db);
    let conn = open_db(&db_path)?;
    let kv = SqliteKeyValueStore::try_new(&conn)?;
    let (mut controller, report) =
        TodoListController::open(kv, StoreConfig::with_storage_key(&args.key))?;

    if let LoadReport::RecoveredFromCorruption { backup_key, reason } = &report {
        eprintln!(
            "warning: stored list was unreadable ({reason}); started empty, raw data kept under `{backup_key}`"
        );
    }

    match args.command {
        Command::List => {}
        Command::Add { text, priority } => {
            let item = controller.add_item_str(&text, &priority)?;
            println!("added: {}", item.text());
        }
        Command::Toggle { index } => {
            let moved_to = controller.toggle_completed(index)?;
            println!("toggled: now at {moved_to}");
        }
        Command::Remove { index } => {
            let removed = controller.remove_item(index)?;
            println!("removed: {}", removed.text());
        }
        Command::ClearCompleted => {
            let removed = controller.clear_completed()?;
            println!("cleared {removed} completed item(s)");
        }
        Command::Summary => {
            let summary = controller.summary();
            println!(
                "{} item(s) left, {} completed, {} total",
                summary.active, summary.completed, summary.total
            );
            return Ok(());
        }
    }

    controller.set_renderer(Box::new(TerminalRenderer));
    Ok(())
}
