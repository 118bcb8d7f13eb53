//! negentropy CLI - a keyboard-driven terminal time tracker.

use std::path::Path;
use std::process;

use clap::Parser;
use negentropy::cli::{Cli, Commands, SessionCommands, TaskCommands};
use negentropy::commands::{self, Output};
use negentropy::config::resolve_config;
use negentropy::storage::{Storage, resolve_data_dir};
use negentropy::tui;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "negentropy.log";

fn main() {
    let cli = Cli::parse();
    // The TUI has no JSON mode, so its startup errors are always plain text.
    let plain_errors = cli.human_readable || cli.command.is_none();

    let result = resolve_data_dir(cli.data_dir.clone()).and_then(|data_dir| {
        let _guard = init_logging(&data_dir, cli.log_level.as_deref());
        run_command(cli, &data_dir)
    });

    if let Err(e) = result {
        if plain_errors {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        }
        process::exit(1);
    }
}

/// Log to `<data-dir>/negentropy.log`; the terminal belongs to the TUI.
///
/// Filter precedence: `--log-level`, then `RUST_LOG`, then `info`.
fn init_logging(data_dir: &Path, level: Option<&str>) -> Option<WorkerGuard> {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    if std::fs::create_dir_all(data_dir).is_err() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::sink)
            .try_init();
        return None;
    }

    let appender = tracing_appender::rolling::never(data_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
    Some(guard)
}

fn run_command(cli: Cli, data_dir: &Path) -> Result<(), negentropy::Error> {
    let human = cli.human_readable;
    let mut store = Storage::open_in_dir(data_dir)
        .inspect_err(|e| tracing::error!("failed to open store in {}: {}", data_dir.display(), e))?;

    match cli.command {
        None => {
            let loaded = resolve_config(cli.config);
            tracing::info!("config: {}", loaded.describe());
            tui::run_tui(store, &loaded)?;
        }

        Some(Commands::Task { command }) => match command {
            TaskCommands::Create {
                name,
                color,
                daily_target_minutes,
            } => {
                let result = commands::task_create(&mut store, &name, &color, daily_target_minutes)?;
                output(&result, human)?;
            }
            TaskCommands::List => {
                let result = commands::task_list(&store)?;
                output(&result, human)?;
            }
            TaskCommands::Delete { id } => {
                let result = commands::task_delete(&mut store, id)?;
                output(&result, human)?;
            }
        },

        Some(Commands::Session { command }) => match command {
            SessionCommands::List { task_id } => {
                let result = commands::session_list(&store, task_id)?;
                output(&result, human)?;
            }
        },
    }

    Ok(())
}

/// Print output in JSON or human-readable format.
fn output<T: Output>(result: &T, human: bool) -> Result<(), negentropy::Error> {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json()?);
    }
    Ok(())
}
