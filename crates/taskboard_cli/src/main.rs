//! Command-line front end for the task board.
//!
//! # Responsibility
//! - Resolve config, logging and the SQLite board file.
//! - Apply the guards the store leaves to callers: trimmed non-blank titles
//!   and never deleting the last column without `--force`.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;
use taskboard_core::db::open_db;
use taskboard_core::{
    default_log_level, init_logging, Board, BoardStore, KeyValueStore, Outcome,
    SqliteKeyValueStore, StoreConfig, TaskPatch, TaskQuery,
};

const DB_FILE_NAME: &str = "board.sqlite3";

#[derive(Debug, Parser)]
#[command(name = "taskboard", version, about = "Kanban task board")]
struct Cli {
    /// Board database file. Defaults to the platform data dir.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// JSON store config.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level for the rolling log file. Only takes effect with a log dir.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every column with its tasks.
    Show,
    AddTask {
        column: String,
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    UpdateTask {
        task: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Target column id; moves the task to its tail.
        #[arg(long)]
        status: Option<String>,
    },
    DeleteTask {
        task: String,
    },
    MoveTask {
        task: String,
        from: String,
        to: String,
        /// Drop position in the destination column; appends when omitted.
        #[arg(long)]
        index: Option<usize>,
    },
    AddColumn {
        title: String,
    },
    DeleteColumn {
        column: String,
        /// Allow deleting the last remaining column.
        #[arg(long)]
        force: bool,
    },
    Search {
        text: String,
        #[arg(long)]
        column: Option<String>,
    },
    /// Discard the saved board and start over from the default columns.
    Reset {
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli)?;
    if let Some(level) = ignored_log_level(&config) {
        eprintln!("warning: log level `{level}` ignored; set --log-dir to enable logging");
    }
    if let Some(log_dir) = &config.log_dir {
        let level = config
            .log_level
            .as_deref()
            .unwrap_or_else(|| default_log_level());
        init_logging(level, log_dir).context("failed to start logging")?;
    }

    let db_path = resolve_db_path(cli.db.clone())?;
    let conn = open_db(&db_path)
        .with_context(|| format!("failed to open board database `{}`", db_path.display()))?;
    let mut store = BoardStore::new(SqliteKeyValueStore::new(&conn), config);
    store.initialize();
    info!(
        "event=cli_command module=cli status=start command={}",
        command_name(&cli.command)
    );

    Ok(match execute(&mut store, cli.command)? {
        Outcome::Applied(()) => ExitCode::SUCCESS,
        Outcome::Skipped(reason) => {
            eprintln!("nothing changed: {reason}");
            ExitCode::from(2)
        }
    })
}

fn load_config(cli: &Cli) -> Result<StoreConfig> {
    let mut config = match &cli.config {
        Some(path) => StoreConfig::from_json_file(path)?,
        None => StoreConfig::default(),
    }
    .apply_env_overrides();

    if let Some(level) = &cli.log_level {
        config.log_level = Some(level.clone());
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(dir.clone());
    }
    config.validate()?;
    Ok(config)
}

/// A configured level that has no log dir to write to.
fn ignored_log_level(config: &StoreConfig) -> Option<&str> {
    match (&config.log_level, &config.log_dir) {
        (Some(level), None) => Some(level.as_str()),
        _ => None,
    }
}

fn resolve_db_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    let dir = dirs::data_dir()
        .context("no platform data directory; pass --db")?
        .join("taskboard");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create `{}`", dir.display()))?;
    Ok(dir.join(DB_FILE_NAME))
}

fn execute<S: KeyValueStore>(store: &mut BoardStore<S>, command: Command) -> Result<Outcome> {
    let outcome = match command {
        Command::Show => {
            print_board(&store.snapshot());
            Outcome::Applied(())
        }
        Command::Search { text, column } => {
            let query = TaskQuery { text, column };
            let board = store.snapshot();
            for task in board.search(&query) {
                println!("{}\t{}\t{}", task.id, task.status, task.title);
            }
            Outcome::Applied(())
        }
        Command::AddTask {
            column,
            title,
            description,
        } => {
            let title = required_title(&title)?;
            report_created(store.add_task(&column, title, description.trim()))
        }
        Command::UpdateTask {
            task,
            title,
            description,
            status,
        } => {
            let mut patch = TaskPatch::new();
            if let Some(title) = title {
                patch = patch.with_title(required_title(&title)?);
            }
            if let Some(description) = description {
                patch = patch.with_description(description.trim());
            }
            if let Some(status) = status {
                patch = patch.with_status(status);
            }
            if patch.is_empty() {
                bail!("nothing to update; pass --title, --description or --status");
            }
            store.update_task(&task, patch)
        }
        Command::DeleteTask { task } => store.delete_task(&task),
        Command::MoveTask {
            task,
            from,
            to,
            index,
        } => match index {
            Some(index) => store.move_task_to(&task, &from, &to, index),
            None => store.move_task(&task, &from, &to),
        },
        Command::AddColumn { title } => {
            let title = required_title(&title)?;
            report_created(store.add_column(title))
        }
        Command::DeleteColumn { column, force } => {
            if store.snapshot().columns.len() <= 1 && !force {
                bail!("refusing to delete the last column; pass --force");
            }
            store.delete_column(&column)
        }
        Command::Reset { force } => {
            if !force {
                bail!("refusing to discard the board; pass --force");
            }
            store.reset();
            Outcome::Applied(())
        }
    };

    Ok(outcome)
}

fn required_title(raw: &str) -> Result<&str> {
    let title = raw.trim();
    if title.is_empty() {
        bail!("title must not be blank");
    }
    Ok(title)
}

fn report_created(outcome: Outcome<String>) -> Outcome {
    match outcome {
        Outcome::Applied(id) => {
            println!("{id}");
            Outcome::Applied(())
        }
        Outcome::Skipped(reason) => Outcome::Skipped(reason),
    }
}

fn print_board(board: &Board) {
    for column in &board.columns {
        println!("{} [{}] ({})", column.title, column.id, column.task_ids.len());
        for task in board.column_tasks(&column.id) {
            println!(
                "  {}  {}  {}",
                task.id,
                task.created_at.format("%Y-%m-%d"),
                task.title
            );
        }
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Show => "show",
        Command::AddTask { .. } => "add-task",
        Command::UpdateTask { .. } => "update-task",
        Command::DeleteTask { .. } => "delete-task",
        Command::MoveTask { .. } => "move-task",
        Command::AddColumn { .. } => "add-column",
        Command::DeleteColumn { .. } => "delete-column",
        Command::Search { .. } => "search",
        Command::Reset { .. } => "reset",
    }
}
