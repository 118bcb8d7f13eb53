//! Storage layer for negentropy data.
//!
//! Tasks and sessions live in a single SQLite database
//! (`<data-dir>/negentropy.db`). Deleting a task only marks it inactive, so
//! creating a task with the same name later brings its history back.

pub mod backend;

pub use backend::TaskStore;

use crate::models::{Session, Task};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "NEGENTROPY_DATA_DIR";

/// Database file name inside the data directory.
pub const DB_FILE: &str = "negentropy.db";

/// SQLite-backed task store.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open or create the database inside `data_dir`.
    pub fn open_in_dir(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)?;
        let path = data_dir.join(DB_FILE);
        let conn = Connection::open(&path)?;
        Self::init_schema(&conn)?;
        tracing::debug!("opened store at {}", path.display());
        Ok(Self { conn })
    }

    /// Open a throwaway in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Initialize the SQLite schema.
    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                color TEXT NOT NULL,
                daily_target_minutes INTEGER NOT NULL,
                active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                task_id INTEGER NOT NULL,
                started_at TEXT NOT NULL,
                ended_at TEXT,
                entropy INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (task_id) REFERENCES tasks(id)
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_active ON tasks(active);
            CREATE INDEX IF NOT EXISTS idx_sessions_task ON sessions(task_id);
            "#,
        )?;
        Ok(())
    }

    fn get_task(&self, id: i64) -> Result<Task> {
        self.conn
            .query_row(
                "SELECT id, name, color, daily_target_minutes, created_at
                 FROM tasks WHERE id = ?1",
                [id],
                task_from_row,
            )
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("Task not found: {}", id)))
    }

    fn is_active(&self, id: i64) -> Result<bool> {
        let active: Option<bool> = self
            .conn
            .query_row("SELECT active FROM tasks WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(active.unwrap_or(false))
    }

    fn close_open_session(
        &mut self,
        task_id: i64,
        ended_at: DateTime<Utc>,
        entropy: bool,
    ) -> Result<()> {
        let closed = self.conn.execute(
            "UPDATE sessions SET ended_at = ?1, entropy = ?2
             WHERE task_id = ?3 AND ended_at IS NULL",
            params![ended_at.to_rfc3339(), entropy, task_id],
        )?;

        if closed == 0 {
            return Err(Error::NotFound(format!(
                "No open session for task {}",
                task_id
            )));
        }

        tracing::info!(task_id, entropy, "closed session");
        Ok(())
    }
}

impl TaskStore for Storage {
    fn create_task(
        &mut self,
        name: &str,
        color: &str,
        daily_target_minutes: u32,
    ) -> Result<Task> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput(
                "Task name cannot be empty".to_string(),
            ));
        }

        let existing: Option<(i64, bool)> = self
            .conn
            .query_row(
                "SELECT id, active FROM tasks WHERE name = ?1",
                [name],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match existing {
            Some((_, true)) => Err(Error::InvalidInput(format!(
                "Task already exists: {}",
                name
            ))),
            Some((id, false)) => {
                self.conn
                    .execute("UPDATE tasks SET active = 1 WHERE id = ?1", [id])?;
                tracing::info!(id, name, "reactivated task");
                self.get_task(id)
            }
            None => {
                self.conn.execute(
                    "INSERT INTO tasks (name, color, daily_target_minutes, active, created_at)
                     VALUES (?1, ?2, ?3, 1, ?4)",
                    params![name, color, daily_target_minutes, Utc::now().to_rfc3339()],
                )?;
                let id = self.conn.last_insert_rowid();
                tracing::info!(id, name, "created task");
                self.get_task(id)
            }
        }
    }

    fn get_tasks(&self) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, color, daily_target_minutes, created_at
             FROM tasks WHERE active = 1 ORDER BY id ASC",
        )?;
        let tasks = stmt
            .query_map([], task_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tasks)
    }

    fn delete_task(&mut self, id: i64) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE tasks SET active = 0 WHERE id = ?1 AND active = 1",
            [id],
        )?;

        if updated == 0 {
            return Err(Error::NotFound(format!("Task not found: {}", id)));
        }

        tracing::info!(id, "soft-deleted task");
        Ok(())
    }

    fn start_session(&mut self, task_id: i64, started_at: DateTime<Utc>) -> Result<Session> {
        if !self.is_active(task_id)? {
            return Err(Error::NotFound(format!("Task not found: {}", task_id)));
        }

        // A session still open here was never stopped (the app quit from a
        // reset prompt, or died). Its real end is unknown, so it is closed as
        // entropy at the new start.
        let stale = self.conn.execute(
            "UPDATE sessions SET ended_at = ?1, entropy = 1
             WHERE task_id = ?2 AND ended_at IS NULL",
            params![started_at.to_rfc3339(), task_id],
        )?;
        if stale > 0 {
            tracing::warn!(task_id, stale, "closed unfinished session as entropy");
        }

        self.conn.execute(
            "INSERT INTO sessions (task_id, started_at, entropy) VALUES (?1, ?2, 0)",
            params![task_id, started_at.to_rfc3339()],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(id, task_id, "started session");

        Ok(Session {
            id,
            task_id,
            started_at,
            ended_at: None,
            entropy: false,
        })
    }

    fn end_session(&mut self, task_id: i64, ended_at: DateTime<Utc>) -> Result<()> {
        self.close_open_session(task_id, ended_at, false)
    }

    fn end_session_as_entropy(&mut self, task_id: i64, ended_at: DateTime<Utc>) -> Result<()> {
        self.close_open_session(task_id, ended_at, true)
    }

    fn list_sessions(&self, task_id: i64) -> Result<Vec<Session>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, task_id, started_at, ended_at, entropy
             FROM sessions WHERE task_id = ?1 ORDER BY id ASC",
        )?;
        let sessions = stmt
            .query_map([task_id], session_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(sessions)
    }
}

/// Resolve the data directory: explicit path, then `NEGENTROPY_DATA_DIR`
/// (handled by clap), then the platform data dir.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    let data_dir = dirs::data_dir()
        .ok_or_else(|| Error::Other("Could not determine data directory".to_string()))?;
    Ok(data_dir.join("negentropy"))
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    let created_at: String = row.get(4)?;
    Ok(Task {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
        daily_target_minutes: row.get(3)?,
        created_at: parse_timestamp(4, &created_at)?,
    })
}

fn session_from_row(row: &Row<'_>) -> rusqlite::Result<Session> {
    let started_at: String = row.get(2)?;
    let ended_at: Option<String> = row.get(3)?;
    Ok(Session {
        id: row.get(0)?,
        task_id: row.get(1)?,
        started_at: parse_timestamp(2, &started_at)?,
        ended_at: ended_at
            .map(|s| parse_timestamp(3, &s))
            .transpose()?,
        entropy: row.get(4)?,
    })
}

fn parse_timestamp(column: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}
