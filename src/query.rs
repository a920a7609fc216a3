//! Filtering and ordering of task lists.
//!
//! The store returns tasks in no particular order; everything shown to the
//! user goes through [`apply`], which always ends the comparison on id
//! descending so repeated calls over the same tasks give the same order.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::status::{classify, TaskStatus};
use crate::task::{Priority, Task};

/// Stand-in for a missing due date when comparing.
const FAR_FUTURE_DUE: &str = "9999-12-31";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    Open,
    Done,
    Overdue,
    All,
}

impl StatusFilter {
    fn matches(self, status: TaskStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Open => status == TaskStatus::Open,
            StatusFilter::Done => status == TaskStatus::Done,
            StatusFilter::Overdue => status == TaskStatus::Overdue,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::Open => "open",
            StatusFilter::Done => "done",
            StatusFilter::Overdue => "overdue",
            StatusFilter::All => "all",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(StatusFilter::Open),
            "done" => Ok(StatusFilter::Done),
            "overdue" => Ok(StatusFilter::Overdue),
            "all" => Ok(StatusFilter::All),
            _ => Err(Error::InvalidArgument(format!(
                "invalid status filter '{s}': must be open, done, overdue, or all"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityFilter {
    #[default]
    All,
    High,
    Medium,
    Low,
}

impl PriorityFilter {
    fn matches(self, priority: Priority) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::High => priority == Priority::High,
            PriorityFilter::Medium => priority == Priority::Medium,
            PriorityFilter::Low => priority == Priority::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PriorityFilter::All => "all",
            PriorityFilter::High => "high",
            PriorityFilter::Medium => "medium",
            PriorityFilter::Low => "low",
        }
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriorityFilter {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(PriorityFilter::All),
            "high" => Ok(PriorityFilter::High),
            "medium" => Ok(PriorityFilter::Medium),
            "low" => Ok(PriorityFilter::Low),
            _ => Err(Error::InvalidArgument(format!(
                "invalid priority filter '{s}': must be all, high, medium, or low"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Created,
    #[default]
    Due,
    Priority,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Created => "created",
            SortKey::Due => "due",
            SortKey::Priority => "priority",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "created" => Ok(SortKey::Created),
            "due" => Ok(SortKey::Due),
            "priority" => Ok(SortKey::Priority),
            _ => Err(Error::InvalidArgument(format!(
                "invalid sort key '{s}': must be created, due, or priority"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskQuery {
    /// Case-insensitive search text; blank matches everything.
    pub text: String,
    pub status: StatusFilter,
    pub priority: PriorityFilter,
    pub sort: SortKey,
}

/// Filter then order `tasks` for display.
pub fn apply(tasks: Vec<Task>, query: &TaskQuery, today: NaiveDate) -> Vec<Task> {
    let needle = query.text.trim().to_lowercase();
    let mut out: Vec<Task> = tasks
        .into_iter()
        .filter(|task| query.status.matches(classify(task, today)))
        .filter(|task| query.priority.matches(task.priority))
        .filter(|task| needle.is_empty() || haystack(task).contains(&needle))
        .collect();
    sort_tasks(&mut out, query.sort);
    out
}

pub fn sort_tasks(tasks: &mut [Task], key: SortKey) {
    tasks.sort_by(|left, right| compare(left, right, key));
}

fn compare(left: &Task, right: &Task, key: SortKey) -> Ordering {
    let by_id = || right.id.cmp(&left.id);
    match key {
        SortKey::Created => by_id(),
        SortKey::Due => left
            .due
            .is_none()
            .cmp(&right.due.is_none())
            .then_with(|| due_key(left).cmp(due_key(right)))
            .then_with(|| right.priority.weight().cmp(&left.priority.weight()))
            .then_with(by_id),
        SortKey::Priority => right
            .priority
            .weight()
            .cmp(&left.priority.weight())
            .then_with(|| due_key(left).cmp(due_key(right)))
            .then_with(by_id),
    }
}

fn due_key(task: &Task) -> &str {
    task.due.as_deref().unwrap_or(FAR_FUTURE_DUE)
}

fn haystack(task: &Task) -> String {
    let tags = task.tag_string();
    [
        task.title.as_str(),
        task.notes.as_deref().unwrap_or(""),
        tags.as_str(),
        task.due.as_deref().unwrap_or(""),
    ]
    .join(" ")
    .to_lowercase()
}
