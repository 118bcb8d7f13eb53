//! The persistence seam consumed by the interaction state machine.
//!
//! `Storage` (SQLite) is the production implementation. The state machine
//! only ever sees this trait, so tests can swap in stores that fail on demand.

use crate::Result;
use crate::models::{Session, Task};
use chrono::{DateTime, Utc};

/// Task and session persistence.
///
/// Every call is synchronous; the caller blocks until the store answers.
pub trait TaskStore {
    /// Create a task, or reactivate a soft-deleted task with the same name.
    fn create_task(&mut self, name: &str, color: &str, daily_target_minutes: u32)
    -> Result<Task>;

    /// All active tasks, oldest first.
    fn get_tasks(&self) -> Result<Vec<Task>>;

    /// Soft-delete: the task is hidden but its sessions are kept.
    fn delete_task(&mut self, id: i64) -> Result<()>;

    /// Open a session for the task. Any session left open for it is closed
    /// first and flagged as discarded.
    fn start_session(&mut self, task_id: i64, started_at: DateTime<Utc>) -> Result<Session>;

    /// Close the task's open session as productive time.
    fn end_session(&mut self, task_id: i64, ended_at: DateTime<Utc>) -> Result<()>;

    /// Close the task's open session, flagging it as discarded.
    fn end_session_as_entropy(&mut self, task_id: i64, ended_at: DateTime<Utc>) -> Result<()>;

    /// Sessions recorded for a task, oldest first.
    fn list_sessions(&self, task_id: i64) -> Result<Vec<Session>>;
}
