//! SQLite task store.
//!
//! The store holds only the database path. Every operation opens its own
//! connection and drops it before returning, and every mutation runs inside
//! a transaction, so a failed call leaves the previously committed state.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{Error, Result};
use crate::tags;
use crate::task::{
    format_date, format_timestamp, now, parse_timestamp, validate_title, ImportRecord, NewTask,
    Priority, Task, TaskUpdate,
};

/// Default database file name inside the data directory
pub const DB_FILE: &str = "tasks.db";

const BUSY_TIMEOUT_MS: u64 = 5000;

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    notes TEXT,
    due TEXT,
    priority TEXT NOT NULL DEFAULT 'medium' CHECK (priority IN ('low', 'medium', 'high')),
    tags TEXT,
    done INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
";

const SELECT_TASKS: &str =
    "SELECT id, title, notes, due, priority, tags, done, created_at, updated_at FROM tasks";

const INSERT_TASK: &str = "INSERT INTO tasks
    (id, title, notes, due, priority, tags, done, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

const UPDATE_TASK: &str = "UPDATE tasks
    SET title = ?1, notes = ?2, due = ?3, priority = ?4, tags = ?5, done = ?6,
        updated_at = MAX(?7, created_at)
    WHERE id = ?8";

const SET_DONE: &str = "UPDATE tasks SET done = ?1, updated_at = MAX(?2, created_at) WHERE id = ?3";

const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";

const TASK_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM tasks WHERE id = ?1)";

#[derive(Debug, Clone)]
pub struct TaskStore {
    db_path: PathBuf,
}

impl TaskStore {
    /// Open (and if needed create) the store at `db_path`.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let store = Self {
            db_path: db_path.as_ref().to_path_buf(),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn connect(&self) -> Result<Connection> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(&self.db_path)?;
        conn.busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS))?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        Ok(conn)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(SCHEMA)?;
        tracing::debug!(path = %self.db_path.display(), "task store ready");
        Ok(())
    }

    pub fn create(&self, task: NewTask) -> Result<i64> {
        let title = validate_title(&task.title)?;
        let stamp = format_timestamp(now());

        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        tx.execute(
            INSERT_TASK,
            params![
                Option::<i64>::None,
                title,
                task.notes,
                task.due.map(format_date),
                task.priority.as_str(),
                stored_tags(&task.tags),
                false,
                stamp,
                stamp,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        tracing::debug!(id, "task created");
        Ok(id)
    }

    /// Overwrite every mutable field of task `id`.
    pub fn update(&self, id: i64, update: TaskUpdate) -> Result<()> {
        let title = validate_title(&update.title)?;
        let stamp = format_timestamp(now());

        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let changed = tx.execute(
            UPDATE_TASK,
            params![
                title,
                update.notes,
                update.due,
                update.priority.as_str(),
                stored_tags(&update.tags),
                update.done,
                stamp,
                id,
            ],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(id));
        }
        tx.commit()?;

        tracing::debug!(id, "task updated");
        Ok(())
    }

    pub fn set_done(&self, id: i64, done: bool) -> Result<()> {
        let stamp = format_timestamp(now());

        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let changed = tx.execute(SET_DONE, params![done, stamp, id])?;
        if changed == 0 {
            return Err(Error::NotFound(id));
        }
        tx.commit()?;

        tracing::debug!(id, done, "task completion changed");
        Ok(())
    }

    /// Hard delete. Deleting an id that is already gone fails.
    pub fn delete(&self, id: i64) -> Result<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let changed = tx.execute(DELETE_TASK, params![id])?;
        if changed == 0 {
            return Err(Error::NotFound(id));
        }
        tx.commit()?;

        tracing::debug!(id, "task deleted");
        Ok(())
    }

    pub fn get(&self, id: i64) -> Result<Task> {
        let conn = self.connect()?;
        let task = conn
            .query_row(&format!("{SELECT_TASKS} WHERE id = ?1"), params![id], read_task_row)
            .optional()?;
        task.ok_or(Error::NotFound(id))
    }

    /// All tasks. Callers must not rely on the order.
    pub fn list(&self) -> Result<Vec<Task>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(SELECT_TASKS)?;
        let rows = stmt.query_map([], read_task_row)?;
        let tasks = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tasks)
    }

    /// Insert imported records in a single transaction.
    ///
    /// Records with an explicit id keep it; an id that already exists (or
    /// repeats within the batch) aborts the whole batch.
    pub fn bulk_insert(&self, records: Vec<ImportRecord>) -> Result<usize> {
        let stamp = now();

        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let mut inserted = 0;
        {
            let mut exists = tx.prepare(TASK_EXISTS)?;
            let mut insert = tx.prepare(INSERT_TASK)?;
            for record in &records {
                let title = validate_title(&record.title)?;
                if let Some(id) = record.id {
                    let taken: bool = exists.query_row(params![id], |row| row.get(0))?;
                    if taken {
                        return Err(Error::Conflict(id));
                    }
                }

                let created_at = record.created_at.unwrap_or(stamp);
                let updated_at = record.updated_at.unwrap_or(stamp).max(created_at);
                let due = record
                    .due
                    .as_deref()
                    .map(str::trim)
                    .filter(|due| !due.is_empty());

                insert.execute(params![
                    record.id,
                    title,
                    record.notes,
                    due,
                    record.priority.as_str(),
                    stored_tags(&record.tags),
                    record.done,
                    format_timestamp(created_at),
                    format_timestamp(updated_at),
                ])?;
                inserted += 1;
            }
        }
        tx.commit()?;

        tracing::debug!(inserted, "bulk insert committed");
        Ok(inserted)
    }
}

fn stored_tags(raw: &[String]) -> Option<String> {
    let joined = tags::to_tag_string(raw);
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

fn read_task_row(row: &Row) -> rusqlite::Result<Task> {
    let id: i64 = row.get(0)?;
    let priority: String = row.get(4)?;
    let priority = priority.parse::<Priority>().unwrap_or_else(|_| {
        tracing::warn!(id, priority = %priority, "unrecognized stored priority, reading as medium");
        Priority::Medium
    });
    let tags: Option<String> = row.get(5)?;
    let done: i64 = row.get(6)?;

    Ok(Task {
        id,
        title: row.get(1)?,
        notes: row.get(2)?,
        due: row.get(3)?,
        priority,
        tags: tags.as_deref().map(tags::parse_tag_string).unwrap_or_default(),
        done: done != 0,
        created_at: read_timestamp(row, 7)?,
        updated_at: read_timestamp(row, 8)?,
    })
}

fn read_timestamp(row: &Row, idx: usize) -> rusqlite::Result<chrono::NaiveDateTime> {
    let raw: String = row.get(idx)?;
    parse_timestamp(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("invalid timestamp '{raw}'").into(),
        )
    })
}
