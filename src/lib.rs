//! negentropy - a terminal stopwatch for tracking time spent on named tasks.
//!
//! The library holds everything the `negentropy` binary runs: the task
//! store, the stopwatch engine, and the interaction state machine behind
//! the TUI.

pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod stopwatch;
pub mod storage;
pub mod tui;


/// Library-level error type for negentropy operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for negentropy operations.
pub type Result<T> = std::result::Result<T, Error>;
