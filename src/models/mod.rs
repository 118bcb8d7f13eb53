//! Data models for negentropy entities.
//!
//! - `Task` - a named thing time is tracked against
//! - `Session` - one start/stop interval recorded for a task

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Color assigned to tasks created from the TUI (which has no color picker yet).
pub const DEFAULT_TASK_COLOR: &str = "blue";

/// Daily target assigned to tasks created from the TUI, in minutes.
pub const DEFAULT_DAILY_TARGET_MINUTES: u32 = 60;

/// A task that sessions are recorded against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable numeric identifier assigned by the store
    pub id: i64,

    /// Display name (unique among tasks)
    pub name: String,

    /// Color tag used when rendering the task's tab
    pub color: String,

    /// Daily target, in minutes
    pub daily_target_minutes: u32,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// One recorded interval of work on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,

    /// Owning task
    pub task_id: i64,

    pub started_at: DateTime<Utc>,

    /// None while the session is still open
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,

    /// True when the session was discarded through a timer reset
    #[serde(default)]
    pub entropy: bool,
}

impl Session {
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Length of a closed session. Open sessions have no duration yet.
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.ended_at.map(|end| end - self.started_at)
    }
}
