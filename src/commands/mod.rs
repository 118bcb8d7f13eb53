//! Command implementations for the negentropy CLI.
//!
//! Each command takes the store, does one thing, and returns a result type
//! implementing [`Output`] so `main` can print it as JSON or for humans.

use serde::Serialize;

use crate::Result;
use crate::models::{Session, Task};
use crate::stopwatch::format_elapsed;
use crate::storage::TaskStore;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> Result<String>;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Result of `task create`.
#[derive(Debug, Serialize)]
pub struct TaskCreated {
    pub task: Task,
}

impl Output for TaskCreated {
    fn to_json(&self) -> Result<String> {
        json(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Created task {} \"{}\" ({}, {} min/day)",
            self.task.id, self.task.name, self.task.color, self.task.daily_target_minutes
        )
    }
}

/// Result of `task list`.
#[derive(Debug, Serialize)]
pub struct TaskList {
    pub tasks: Vec<Task>,
    pub count: usize,
}

impl Output for TaskList {
    fn to_json(&self) -> Result<String> {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.tasks.is_empty() {
            return "No tasks.".to_string();
        }
        let mut lines = vec![format!("{} task(s):", self.count)];
        for task in &self.tasks {
            lines.push(format!(
                "  [{}] {}  {}  {} min/day",
                task.id, task.name, task.color, task.daily_target_minutes
            ));
        }
        lines.join("\n")
    }
}

/// Result of `task delete`.
#[derive(Debug, Serialize)]
pub struct TaskDeleted {
    pub id: i64,
    pub deleted: bool,
}

impl Output for TaskDeleted {
    fn to_json(&self) -> Result<String> {
        json(self)
    }

    fn to_human(&self) -> String {
        format!("Deleted task {}", self.id)
    }
}

/// Result of `session list`.
#[derive(Debug, Serialize)]
pub struct SessionList {
    pub task_id: i64,
    pub sessions: Vec<Session>,
    pub count: usize,
}

impl Output for SessionList {
    fn to_json(&self) -> Result<String> {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.sessions.is_empty() {
            return format!("No sessions for task {}.", self.task_id);
        }
        let mut lines = vec![format!(
            "{} session(s) for task {}:",
            self.count, self.task_id
        )];
        for session in &self.sessions {
            let duration = session
                .duration()
                .and_then(|d| d.to_std().ok())
                .map(format_elapsed)
                .unwrap_or_else(|| "open".to_string());
            let marker = if session.entropy { "  (entropy)" } else { "" };
            lines.push(format!(
                "  [{}] {}  {}{}",
                session.id,
                session.started_at.format("%Y-%m-%d %H:%M:%S"),
                duration,
                marker
            ));
        }
        lines.join("\n")
    }
}

/// Create a task, or reactivate a deleted one with the same name.
pub fn task_create<S: TaskStore>(
    store: &mut S,
    name: &str,
    color: &str,
    daily_target_minutes: u32,
) -> Result<TaskCreated> {
    let task = store.create_task(name, color, daily_target_minutes)?;
    Ok(TaskCreated { task })
}

/// List active tasks.
pub fn task_list<S: TaskStore>(store: &S) -> Result<TaskList> {
    let tasks = store.get_tasks()?;
    let count = tasks.len();
    Ok(TaskList { tasks, count })
}

/// Soft-delete a task.
pub fn task_delete<S: TaskStore>(store: &mut S, id: i64) -> Result<TaskDeleted> {
    store.delete_task(id)?;
    Ok(TaskDeleted { id, deleted: true })
}

/// List sessions of a task, oldest first.
pub fn session_list<S: TaskStore>(store: &S, task_id: i64) -> Result<SessionList> {
    let sessions = store.list_sessions(task_id)?;
    let count = sessions.len();
    Ok(SessionList {
        task_id,
        sessions,
        count,
    })
}
