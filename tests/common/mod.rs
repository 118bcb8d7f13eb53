//! Common test utilities for negentropy integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't pollute
//! the user's `~/.local/share/negentropy/` directory.

#![allow(dead_code)]

use assert_cmd::Command;
use negentropy::config::CONFIG_PATH_ENV;
use negentropy::storage::DATA_DIR_ENV;
pub use tempfile::TempDir;

/// A test environment with isolated data and config directories.
///
/// The `negentropy()` method returns a `Command` that sets
/// `NEGENTROPY_DATA_DIR` and `NEGENTROPY_CONFIG` per-invocation, making
/// tests parallel-safe.
pub struct TestEnv {
    pub data_dir: TempDir,
    pub config_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with isolated directories.
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
            config_dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the negentropy binary with isolated directories.
    pub fn negentropy(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_negentropy"));
        cmd.env(DATA_DIR_ENV, self.data_dir.path());
        cmd.env(CONFIG_PATH_ENV, self.config_path());
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Get the path to the data directory.
    pub fn data_path(&self) -> &std::path::Path {
        self.data_dir.path()
    }

    /// Path the binary will read config.kdl from.
    pub fn config_path(&self) -> std::path::PathBuf {
        self.config_dir.path().join("config.kdl")
    }

    /// Create a task through the CLI and return its id.
    pub fn create_task(&self, name: &str) -> i64 {
        let output = self
            .negentropy()
            .args(["task", "create", name])
            .output()
            .unwrap();
        assert!(output.status.success(), "task create failed: {:?}", output);
        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        json["task"]["id"].as_i64().unwrap()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
