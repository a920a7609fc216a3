//! Display status derived from a task's stored fields and the current date.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Open,
    Done,
    Overdue,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Open => "open",
            TaskStatus::Done => "done",
            TaskStatus::Overdue => "overdue",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a task relative to `today`.
///
/// Completion wins over any date. A due value that does not parse as
/// `YYYY-MM-DD` classifies as open rather than failing.
pub fn classify(task: &Task, today: NaiveDate) -> TaskStatus {
    if task.done {
        return TaskStatus::Done;
    }
    let Some(raw_due) = task.due.as_deref() else {
        return TaskStatus::Open;
    };
    match crate::task::parse_date(raw_due) {
        Some(due) if due < today => TaskStatus::Overdue,
        Some(_) => TaskStatus::Open,
        // Malformed stored date.
        None => TaskStatus::Open,
    }
}

/// Per-status totals over an unfiltered task set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub open: usize,
    pub overdue: usize,
    pub done: usize,
    pub total: usize,
}

impl StatusCounts {
    pub fn tally(tasks: &[Task], today: NaiveDate) -> Self {
        let mut counts = Self::default();
        for task in tasks {
            match classify(task, today) {
                TaskStatus::Open => counts.open += 1,
                TaskStatus::Overdue => counts.overdue += 1,
                TaskStatus::Done => counts.done += 1,
            }
            counts.total += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{now, Priority};

    fn task(due: Option<&str>, done: bool) -> Task {
        Task {
            id: 1,
            title: "Buy milk".to_string(),
            notes: None,
            due: due.map(str::to_string),
            priority: Priority::High,
            tags: vec!["errand".to_string()],
            done,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("date")
    }

    #[test]
    fn past_due_is_overdue_until_done() {
        let today = date(2024, 6, 1);
        assert_eq!(classify(&task(Some("2024-01-01"), false), today), TaskStatus::Overdue);
        assert_eq!(classify(&task(Some("2024-01-01"), true), today), TaskStatus::Done);
    }

    #[test]
    fn due_today_or_later_is_open() {
        let today = date(2024, 6, 1);
        assert_eq!(classify(&task(Some("2024-06-01"), false), today), TaskStatus::Open);
        assert_eq!(classify(&task(Some("2025-01-01"), false), today), TaskStatus::Open);
        assert_eq!(classify(&task(None, false), today), TaskStatus::Open);
    }

    #[test]
    fn malformed_due_falls_back_to_open() {
        let today = date(2024, 6, 1);
        assert_eq!(classify(&task(Some("next week"), false), today), TaskStatus::Open);
        assert_eq!(classify(&task(Some("next week"), true), today), TaskStatus::Done);
    }

    #[test]
    fn classify_is_deterministic() {
        let today = date(2024, 6, 1);
        let subject = task(Some("2024-05-31"), false);
        let first = classify(&subject, today);
        for _ in 0..5 {
            assert_eq!(classify(&subject, today), first);
        }
    }

    #[test]
    fn tally_counts_each_status() {
        let today = date(2024, 6, 1);
        let tasks = vec![
            task(Some("2024-01-01"), false),
            task(None, false),
            task(Some("2024-01-01"), true),
            task(Some("garbage"), false),
        ];
        let counts = StatusCounts::tally(&tasks, today);
        assert_eq!(
            counts,
            StatusCounts {
                open: 2,
                overdue: 1,
                done: 1,
                total: 4,
            }
        );
    }
}
