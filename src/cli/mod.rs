//! CLI argument definitions for negentropy.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("NEGENTROPY_GIT_COMMIT"),
    ", built ",
    env!("NEGENTROPY_BUILD_TIMESTAMP"),
    ")"
);

/// negentropy - a keyboard-driven terminal time tracker.
///
/// Run without a subcommand to open the interactive timer.
#[derive(Parser, Debug)]
#[command(name = "negentropy")]
#[command(author, version, long_version = LONG_VERSION, about = "A keyboard-driven terminal time tracker", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Path to config.kdl.
    /// Can also be set via NEGENTROPY_CONFIG environment variable.
    #[arg(long, global = true, env = "NEGENTROPY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the database and log file.
    /// Can also be set via NEGENTROPY_DATA_DIR environment variable.
    #[arg(long, global = true, env = "NEGENTROPY_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log filter (e.g. "debug", "negentropy=trace"); overrides RUST_LOG
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Task management commands
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Session history commands
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a new task (or reactivate a deleted one with the same name)
    Create {
        /// Task name
        name: String,

        /// Tab color (ratatui color name, e.g. "blue", "lightgreen", "#ff8800")
        #[arg(short, long, default_value = crate::models::DEFAULT_TASK_COLOR)]
        color: String,

        /// Daily target in minutes
        #[arg(short = 't', long, default_value_t = crate::models::DEFAULT_DAILY_TARGET_MINUTES)]
        daily_target_minutes: u32,
    },

    /// List active tasks
    List,

    /// Delete a task (its sessions are kept)
    Delete {
        /// Task ID
        id: i64,
    },
}

/// Session subcommands
#[derive(Subcommand, Debug)]
pub enum SessionCommands {
    /// List sessions recorded for a task
    List {
        /// Task ID
        task_id: i64,
    },
}
