//! JSON record format: a top-level array of task objects.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use super::tabular::parse_done;
use crate::task::{format_timestamp, parse_timestamp, ImportRecord, Priority, Task};

#[derive(Debug, Serialize)]
struct ExportRecord<'a> {
    id: i64,
    title: &'a str,
    notes: Option<&'a str>,
    due: Option<&'a str>,
    priority: Priority,
    tags: String,
    done: u8,
    created_at: String,
    updated_at: String,
}

impl<'a> From<&'a Task> for ExportRecord<'a> {
    fn from(task: &'a Task) -> Self {
        Self {
            id: task.id,
            title: &task.title,
            notes: task.notes.as_deref(),
            due: task.due.as_deref(),
            priority: task.priority,
            tags: task.tag_string(),
            done: u8::from(task.done),
            created_at: format_timestamp(task.created_at),
            updated_at: format_timestamp(task.updated_at),
        }
    }
}

/// Tags arrive either as the stored comma string or as a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TagsField {
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DoneField {
    Flag(bool),
    Number(i64),
    Float(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct JsonRecord {
    id: Option<i64>,
    title: Option<String>,
    notes: Option<String>,
    due: Option<String>,
    priority: Option<String>,
    tags: Option<TagsField>,
    done: Option<DoneField>,
    created_at: Option<String>,
    updated_at: Option<String>,
}

pub(crate) fn export(tasks: &[Task]) -> Result<Vec<u8>> {
    let records: Vec<ExportRecord<'_>> = tasks.iter().map(ExportRecord::from).collect();
    let mut bytes = serde_json::to_vec_pretty(&records)?;
    bytes.push(b'\n');
    Ok(bytes)
}

pub(crate) fn parse(bytes: &[u8]) -> Result<Vec<ImportRecord>> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|err| Error::Format(format!("invalid JSON: {err}")))?;
    let Value::Array(items) = value else {
        return Err(Error::Format(
            "expected a JSON array of task records".to_string(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| convert(idx + 1, item))
        .collect()
}

fn convert(position: usize, item: Value) -> Result<ImportRecord> {
    if !item.is_object() {
        return Err(Error::Format(format!(
            "record {position} is not an object"
        )));
    }
    let record: JsonRecord = serde_json::from_value(item)
        .map_err(|err| Error::Format(format!("record {position}: {err}")))?;

    let title = record
        .title
        .filter(|title| !title.trim().is_empty())
        .ok_or_else(|| Error::Validation(format!("record {position}: title is required")))?;

    let priority = match record.priority.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => raw.parse::<Priority>().map_err(|_| {
            Error::Validation(format!("record {position}: invalid priority '{raw}'"))
        })?,
        _ => Priority::Medium,
    };

    let tags = match record.tags {
        Some(TagsField::Text(raw)) => crate::tags::parse_tag_string(&raw),
        Some(TagsField::List(list)) => list,
        None => Vec::new(),
    };

    let done = match record.done {
        Some(DoneField::Flag(flag)) => flag,
        Some(DoneField::Number(number)) => number != 0,
        Some(DoneField::Float(number)) => number != 0.0,
        Some(DoneField::Text(raw)) => match raw.trim() {
            "" => false,
            text => parse_done(text).ok_or_else(|| {
                Error::Validation(format!("record {position}: invalid done value '{text}'"))
            })?,
        },
        None => false,
    };

    Ok(ImportRecord {
        id: record.id,
        title,
        notes: record.notes,
        due: record.due,
        priority,
        tags,
        done,
        created_at: timestamp(position, "created_at", record.created_at)?,
        updated_at: timestamp(position, "updated_at", record.updated_at)?,
    })
}

fn timestamp(
    position: usize,
    field: &str,
    raw: Option<String>,
) -> Result<Option<chrono::NaiveDateTime>> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_timestamp(value).map(Some).ok_or_else(|| {
            Error::Format(format!(
                "record {position}: invalid {field} timestamp '{value}'"
            ))
        }),
    }
}
