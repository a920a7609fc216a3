//! Row-oriented mapping shared by the CSV and XLSX adapters.
//!
//! Export flattens a task into typed cells in [`super::COLUMNS`] order.
//! Import reconciles an arbitrary header row against the known columns:
//! only `title` is required, unknown columns are ignored, and `id` plus the
//! timestamp columns are never read back.

use crate::error::{Error, Result};
use crate::tags;
use crate::task::{format_timestamp, parse_date, ImportRecord, Priority, Task};

/// A single exported cell.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Empty,
    Int(i64),
    Text(String),
}

impl Cell {
    fn text(value: Option<&str>) -> Self {
        match value {
            Some(value) if !value.is_empty() => Cell::Text(value.to_string()),
            _ => Cell::Empty,
        }
    }

    pub(crate) fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Int(value) => value.to_string(),
            Cell::Text(value) => value.clone(),
        }
    }
}

pub(crate) fn task_cells(task: &Task) -> Vec<Cell> {
    vec![
        Cell::Int(task.id),
        Cell::Text(task.title.clone()),
        Cell::text(task.notes.as_deref()),
        Cell::text(task.due.as_deref()),
        Cell::Text(task.priority.as_str().to_string()),
        Cell::text(Some(task.tag_string().as_str())),
        Cell::Int(i64::from(task.done)),
        Cell::Text(format_timestamp(task.created_at)),
        Cell::Text(format_timestamp(task.updated_at)),
    ]
}

/// Positions of the importable columns within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ColumnMap {
    title: usize,
    notes: Option<usize>,
    due: Option<usize>,
    priority: Option<usize>,
    tags: Option<usize>,
    done: Option<usize>,
}

impl ColumnMap {
    /// Match headers case-insensitively after trimming. The first
    /// occurrence of a repeated header wins.
    pub(crate) fn from_headers(headers: &[String]) -> Result<Self> {
        let names: Vec<String> = headers
            .iter()
            .map(|header| {
                header
                    .trim_start_matches('\u{feff}')
                    .trim()
                    .to_lowercase()
            })
            .collect();
        let find = |name: &str| names.iter().position(|header| header == name);

        let title = find("title").ok_or_else(|| {
            Error::Schema(format!(
                "missing required column 'title' (found: {})",
                if names.is_empty() {
                    "none".to_string()
                } else {
                    names.join(", ")
                }
            ))
        })?;

        Ok(Self {
            title,
            notes: find("notes"),
            due: find("due"),
            priority: find("priority"),
            tags: find("tags"),
            done: find("done"),
        })
    }

    /// Build a record from one data row.
    ///
    /// `line` is the 1-based row number in the source (the header is line 1)
    /// and only appears in error messages. Entirely blank rows yield `None`.
    pub(crate) fn record(&self, row: &[String], line: usize) -> Result<Option<ImportRecord>> {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            return Ok(None);
        }
        let cell = |idx: Option<usize>| {
            idx.and_then(|idx| row.get(idx))
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
        };

        let title = cell(Some(self.title))
            .ok_or_else(|| row_error(line, "title is required"))?
            .to_string();

        let priority = match cell(self.priority) {
            Some(raw) => raw
                .parse::<Priority>()
                .map_err(|_| row_error(line, format!("invalid priority '{raw}'")))?,
            None => Priority::Medium,
        };

        let done = match cell(self.done) {
            Some(raw) => parse_done(raw)
                .ok_or_else(|| row_error(line, format!("invalid done value '{raw}'")))?,
            None => false,
        };

        Ok(Some(ImportRecord {
            id: None,
            title,
            notes: cell(self.notes).map(str::to_string),
            due: cell(self.due).map(normalize_due),
            priority,
            tags: cell(self.tags)
                .map(tags::parse_tag_string)
                .unwrap_or_default(),
            done,
            created_at: None,
            updated_at: None,
        }))
    }
}

fn row_error(line: usize, message: impl std::fmt::Display) -> Error {
    Error::Validation(format!("row {line}: {message}"))
}

/// Lenient completion flag: 1/0, true/false, yes/no, y/n, x, or any number.
pub(crate) fn parse_done(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "x" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        other => other.parse::<f64>().ok().map(|value| value != 0.0),
    }
}

/// Strip a time part from date-time text; anything else is kept verbatim.
fn normalize_due(raw: &str) -> String {
    if parse_date(raw).is_some() {
        return raw.to_string();
    }
    match (raw.get(..10), raw.get(10..11)) {
        (Some(date), Some(" " | "T")) if parse_date(date).is_some() => date.to_string(),
        _ => raw.to_string(),
    }
}
