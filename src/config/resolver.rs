//! Locating and loading config.kdl.
//!
//! ## Path precedence (highest to lowest)
//!
//! 1. `--config` CLI flag
//! 2. `NEGENTROPY_CONFIG` environment variable (both handled by clap)
//! 3. `<config-dir>/negentropy/config.kdl`
//!
//! Loading never fails: a missing file means defaults, and anything unusable
//! comes back as a warning for the status line.

use std::path::{Path, PathBuf};

use kdl::KdlDocument;

use crate::config::UserConfig;

/// Environment variable name for the config path override.
pub const CONFIG_PATH_ENV: &str = "NEGENTROPY_CONFIG";

/// Tracks where the config path came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from CLI flag or environment variable
    Explicit,
    /// Built-in default location
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::Explicit => write!(f, "explicit"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A config loaded from disk with any fallback warnings.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: UserConfig,
    pub path: Option<PathBuf>,
    pub source: ValueSource,
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    /// Where the config was read from, for the startup log.
    pub fn describe(&self) -> String {
        match &self.path {
            Some(path) => format!("{} ({})", path.display(), self.source),
            None => format!("built-in defaults ({})", self.source),
        }
    }

    /// One line summarizing the warnings, for the initial status message.
    pub fn notice(&self) -> Option<String> {
        match self.warnings.as_slice() {
            [] => None,
            [only] => Some(format!("config: {}", only)),
            [first, rest @ ..] => Some(format!("config: {} (+{} more)", first, rest.len())),
        }
    }
}

/// Default config file location.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("negentropy").join("config.kdl"))
}

/// Resolve and load the config.
pub fn resolve_config(explicit: Option<PathBuf>) -> LoadedConfig {
    let (path, source) = match explicit {
        Some(path) => (Some(path), ValueSource::Explicit),
        None => (default_config_path(), ValueSource::Default),
    };

    let (config, warnings) = match &path {
        Some(path) => load_config_file(path),
        None => {
            tracing::info!("no config directory on this platform; using defaults");
            (UserConfig::default(), Vec::new())
        }
    };

    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    LoadedConfig {
        config,
        path,
        source,
        warnings,
    }
}

/// Load config from a file path. Missing files are not an error.
pub fn load_config_file(path: &Path) -> (UserConfig, Vec<String>) {
    if !path.exists() {
        tracing::info!("no config at {}; using defaults", path.display());
        return (UserConfig::default(), Vec::new());
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            return (
                UserConfig::default(),
                vec![format!("failed to read {}: {}; using defaults", path.display(), e)],
            );
        }
    };

    parse_config_str(&content, path)
}

fn parse_config_str(content: &str, path: &Path) -> (UserConfig, Vec<String>) {
    match content.parse::<KdlDocument>() {
        Ok(doc) => UserConfig::from_kdl(&doc),
        Err(e) => (
            UserConfig::default(),
            vec![format!("failed to parse {}: {}; using defaults", path.display(), e)],
        ),
    }
}
