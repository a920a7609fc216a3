//! Task data model.
//!
//! A [`Task`] is the only entity quicklist stores. Inputs to the store are
//! expressed as [`NewTask`], [`TaskUpdate`], and [`ImportRecord`] so each
//! operation states exactly which fields it supplies.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Storage and display format for `created_at` / `updated_at`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Storage and display format for due dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Sort weight: higher means more urgent.
    pub fn weight(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(Error::Validation(format!(
                "invalid priority '{other}': must be low, medium, or high"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub notes: Option<String>,
    /// Stored due text; valid `YYYY-MM-DD` unless written by an external tool.
    pub due: Option<String>,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub done: bool,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub updated_at: NaiveDateTime,
}

impl Task {
    /// Parsed due date; `None` when absent or unparseable.
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due.as_deref().and_then(parse_date)
    }

    /// Tags rendered the way they are stored.
    pub fn tag_string(&self) -> String {
        self.tags.join(",")
    }
}

/// Fields supplied when creating a task.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub notes: Option<String>,
    pub due: Option<NaiveDate>,
    pub priority: Priority,
    pub tags: Vec<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Full replacement of a task's mutable fields.
#[derive(Debug, Clone)]
pub struct TaskUpdate {
    pub title: String,
    pub notes: Option<String>,
    /// Due text written as-is; use [`format_date`] for a new date.
    pub due: Option<String>,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub done: bool,
}

impl TaskUpdate {
    /// Start from the task's current values so callers overlay only what changes.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            notes: task.notes.clone(),
            due: task.due.clone(),
            priority: task.priority,
            tags: task.tags.clone(),
            done: task.done,
        }
    }
}

/// A partial task produced by an import. Only the title is required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportRecord {
    pub id: Option<i64>,
    pub title: String,
    pub notes: Option<String>,
    pub due: Option<String>,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub done: bool,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl ImportRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Trimmed title, or a validation error when nothing is left.
pub fn validate_title(title: &str) -> Result<&str> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("title cannot be empty".to_string()));
    }
    Ok(trimmed)
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Parse a user-supplied due date, rejecting anything but `YYYY-MM-DD`.
pub fn parse_due(value: &str) -> Result<NaiveDate> {
    parse_date(value).ok_or_else(|| {
        let value = value.trim();
        Error::Validation(format!("invalid due date '{value}': expected YYYY-MM-DD"))
    })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Current UTC time truncated to whole seconds, matching the stored precision.
pub fn now() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    parse_timestamp(&format_timestamp(now)).unwrap_or(now)
}

pub fn format_timestamp(value: NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored or imported timestamp.
///
/// Accepts the SQLite `CURRENT_TIMESTAMP` form, the ISO `T`-separated form
/// with optional fractional seconds, and RFC 3339 (converted to UTC).
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT) {
        return Some(parsed);
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(parsed);
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed);
    }
    chrono::DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc).naive_utc())
}

mod timestamp {
    use chrono::NaiveDateTime;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(*value))
    }
}
