//! KDL schema for config.kdl.
//!
//! ```kdl
//! keymap {
//!     start-stop-timer " " "enter"
//!     exit "q" "ctrl+c"
//!     go-right "right" "l"
//!     go-left "left" "h"
//!     delete-task "x"
//!     create-task "n"
//!     reset-timer "r"
//!     yes "y"
//!     no "n"
//! }
//! max-productivity-hours 8
//! theme "dark"
//! enable-animations #true
//! ```
//!
//! Parsing never fails. Each field falls back to its default on its own, and
//! fields that were present but unusable are reported as warnings. Unknown
//! nodes are ignored.

use kdl::{KdlDocument, KdlNode};
use serde::{Deserialize, Serialize};

/// Default cap on the session progress gauge, in hours.
pub const DEFAULT_MAX_PRODUCTIVITY_HOURS: u8 = 8;

/// Render palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trigger keys for each logical action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeymapConfig {
    pub start_stop_timer: Vec<String>,
    pub exit: Vec<String>,
    pub go_right: Vec<String>,
    pub go_left: Vec<String>,
    pub delete_task: Vec<String>,
    pub create_task: Vec<String>,
    pub reset_timer: Vec<String>,
    pub yes: Vec<String>,
    pub no: Vec<String>,
}

fn keys(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            start_stop_timer: keys(&[" ", "enter"]),
            exit: keys(&["q", "ctrl+c"]),
            go_right: keys(&["right", "l"]),
            go_left: keys(&["left", "h"]),
            delete_task: keys(&["x"]),
            create_task: keys(&["n"]),
            reset_timer: keys(&["r"]),
            yes: keys(&["y"]),
            no: keys(&["n"]),
        }
    }
}

impl KeymapConfig {
    fn slot(&mut self, node_name: &str) -> Option<&mut Vec<String>> {
        match node_name {
            "start-stop-timer" => Some(&mut self.start_stop_timer),
            "exit" => Some(&mut self.exit),
            "go-right" => Some(&mut self.go_right),
            "go-left" => Some(&mut self.go_left),
            "delete-task" => Some(&mut self.delete_task),
            "create-task" => Some(&mut self.create_task),
            "reset-timer" => Some(&mut self.reset_timer),
            "yes" => Some(&mut self.yes),
            "no" => Some(&mut self.no),
            _ => None,
        }
    }

    /// Overlay entries from a `keymap { ... }` block.
    fn apply_kdl(&mut self, block: &KdlDocument, warnings: &mut Vec<String>) {
        for node in block.nodes() {
            let name = node.name().value().to_string();
            let Some(slot) = self.slot(&name) else {
                continue;
            };
            match string_args(node) {
                Some(values) if !values.is_empty() => *slot = values,
                _ => warnings.push(format!(
                    "keymap.{} needs one or more string keys; using defaults",
                    name
                )),
            }
        }
    }
}

/// User preferences stored in config.kdl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    pub keymap: KeymapConfig,
    pub max_productivity_hours: u8,
    pub theme: Theme,
    pub enable_animations: bool,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            keymap: KeymapConfig::default(),
            max_productivity_hours: DEFAULT_MAX_PRODUCTIVITY_HOURS,
            theme: Theme::default(),
            enable_animations: true,
        }
    }
}

impl UserConfig {
    /// Parse config from a KDL document, collecting a warning per unusable field.
    pub fn from_kdl(doc: &KdlDocument) -> (Self, Vec<String>) {
        let mut config = Self::default();
        let mut warnings = Vec::new();

        if let Some(node) = doc.get("keymap") {
            match node.children() {
                Some(children) => config.keymap.apply_kdl(children, &mut warnings),
                None => warnings.push("keymap must be a block; using default keys".to_string()),
            }
        }

        if let Some(node) = doc.get("max-productivity-hours") {
            match first_integer(node) {
                Some(hours) if (1..=24).contains(&hours) => {
                    config.max_productivity_hours = hours as u8;
                }
                _ => warnings.push(format!(
                    "max-productivity-hours must be 1-24; using {}",
                    DEFAULT_MAX_PRODUCTIVITY_HOURS
                )),
            }
        }

        if let Some(node) = doc.get("theme") {
            match first_string(node).and_then(|s| Theme::parse(&s)) {
                Some(theme) => config.theme = theme,
                None => warnings.push("theme must be \"dark\" or \"light\"; using dark".to_string()),
            }
        }

        if let Some(node) = doc.get("enable-animations") {
            match node.entries().first().and_then(|e| e.value().as_bool()) {
                Some(enabled) => config.enable_animations = enabled,
                None => warnings.push("enable-animations must be #true or #false".to_string()),
            }
        }

        (config, warnings)
    }
}

/// All positional entries of a node, if every one of them is a string.
fn string_args(node: &KdlNode) -> Option<Vec<String>> {
    node.entries()
        .iter()
        .filter(|e| e.name().is_none())
        .map(|e| e.value().as_string().map(|s| s.to_string()))
        .collect()
}

fn first_string(node: &KdlNode) -> Option<String> {
    node.entries()
        .first()
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

fn first_integer(node: &KdlNode) -> Option<i128> {
    node.entries().first().and_then(|e| e.value().as_integer())
}
