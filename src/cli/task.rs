//! quicklist task command implementations.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};
use crate::query::{self, PriorityFilter, SortKey, StatusFilter, TaskQuery};
use crate::status::{classify, StatusCounts, TaskStatus};
use crate::tags;
use crate::task::{format_date, parse_due, NewTask, Priority, Task, TaskUpdate};

use super::GlobalOptions;

pub struct AddOptions {
    pub title: String,
    pub notes: Option<String>,
    pub due: Option<String>,
    pub priority: Option<String>,
    pub tags: Option<String>,
    pub global: GlobalOptions,
}

pub struct EditOptions {
    pub id: i64,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub due: Option<String>,
    pub clear_due: bool,
    pub priority: Option<String>,
    pub tags: Option<String>,
    pub global: GlobalOptions,
}

pub struct SetDoneOptions {
    pub id: i64,
    pub done: bool,
    pub global: GlobalOptions,
}

pub struct IdOptions {
    pub id: i64,
    pub global: GlobalOptions,
}

pub struct ListOptions {
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub sort: Option<String>,
    pub global: GlobalOptions,
}

/// A task together with its status as of the command's "today".
#[derive(Serialize)]
struct TaskView<'a> {
    #[serde(flatten)]
    task: &'a Task,
    status: TaskStatus,
}

#[derive(Serialize)]
struct TaskListOutput<'a> {
    total: usize,
    query: &'a TaskQuery,
    counts: StatusCounts,
    tasks: Vec<TaskView<'a>>,
}

#[derive(Serialize)]
struct TaskDeletedOutput {
    id: i64,
    deleted: bool,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let ctx = options.global.load_context()?;
    let today = options.global.today()?;

    let new_task = NewTask {
        title: options.title,
        notes: options.notes.filter(|notes| !notes.is_empty()),
        due: options.due.as_deref().map(parse_due).transpose()?,
        priority: parse_priority(options.priority.as_deref())?.unwrap_or_default(),
        tags: options
            .tags
            .as_deref()
            .map(tags::parse_tag_string)
            .unwrap_or_default(),
    };

    let id = ctx.store.create(new_task)?;
    let task = ctx.store.get(id)?;
    let view = TaskView {
        status: classify(&task, today),
        task: &task,
    };

    let mut human = HumanOutput::new("Task added");
    push_task_summary(&mut human, &view);

    emit_success(options.global.output(), "add", &view, Some(&human))
}

pub fn run_edit(options: EditOptions) -> Result<()> {
    if options.title.is_none()
        && options.notes.is_none()
        && options.due.is_none()
        && !options.clear_due
        && options.priority.is_none()
        && options.tags.is_none()
    {
        return Err(Error::InvalidArgument(
            "edit requires at least one of --title, --notes, --due, --clear-due, --priority, --tags"
                .to_string(),
        ));
    }

    let ctx = options.global.load_context()?;
    let today = options.global.today()?;
    let current = ctx.store.get(options.id)?;

    let mut update = TaskUpdate::from_task(&current);
    if let Some(title) = options.title.filter(|title| !title.trim().is_empty()) {
        update.title = title;
    }
    if let Some(notes) = options.notes {
        update.notes = Some(notes).filter(|notes| !notes.is_empty());
    }
    if let Some(due) = options.due.as_deref() {
        update.due = Some(format_date(parse_due(due)?));
    }
    if options.clear_due {
        update.due = None;
    }
    if let Some(priority) = parse_priority(options.priority.as_deref())? {
        update.priority = priority;
    }
    if let Some(raw) = options.tags.as_deref() {
        update.tags = tags::parse_tag_string(raw);
    }

    ctx.store.update(options.id, update)?;
    let task = ctx.store.get(options.id)?;
    let view = TaskView {
        status: classify(&task, today),
        task: &task,
    };

    let mut human = HumanOutput::new(format!("Task {} updated", task.id));
    push_task_summary(&mut human, &view);

    emit_success(options.global.output(), "edit", &view, Some(&human))
}

pub fn run_set_done(options: SetDoneOptions) -> Result<()> {
    let ctx = options.global.load_context()?;
    let today = options.global.today()?;

    ctx.store.set_done(options.id, options.done)?;
    let task = ctx.store.get(options.id)?;
    let view = TaskView {
        status: classify(&task, today),
        task: &task,
    };

    let (command, header) = if options.done {
        ("done", format!("Task {} done", task.id))
    } else {
        ("reopen", format!("Task {} reopened", task.id))
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("Title", task.title.clone());
    human.push_summary("Status", view.status.to_string());
    push_due_warning(&mut human, &task);

    emit_success(options.global.output(), command, &view, Some(&human))
}

pub fn run_delete(options: IdOptions) -> Result<()> {
    let ctx = options.global.load_context()?;
    ctx.store.delete(options.id)?;

    let output = TaskDeletedOutput {
        id: options.id,
        deleted: true,
    };
    let human = HumanOutput::new(format!("Task {} deleted", options.id));

    emit_success(options.global.output(), "rm", &output, Some(&human))
}

pub fn run_show(options: IdOptions) -> Result<()> {
    let ctx = options.global.load_context()?;
    let today = options.global.today()?;
    let task = ctx.store.get(options.id)?;
    let view = TaskView {
        status: classify(&task, today),
        task: &task,
    };

    let mut human = HumanOutput::new(format!("Task {}", task.id));
    push_task_summary(&mut human, &view);
    human.push_summary("Created", crate::task::format_timestamp(task.created_at));
    human.push_summary("Updated", crate::task::format_timestamp(task.updated_at));

    emit_success(options.global.output(), "show", &view, Some(&human))
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let ctx = options.global.load_context()?;
    let today = options.global.today()?;
    let defaults = &ctx.config.list;

    let query = TaskQuery {
        text: options.search.unwrap_or_default(),
        status: match options.status.as_deref() {
            Some(raw) => raw.parse::<StatusFilter>()?,
            None => defaults.status_filter()?,
        },
        priority: match options.priority.as_deref() {
            Some(raw) => raw.parse::<PriorityFilter>()?,
            None => defaults.priority_filter()?,
        },
        sort: match options.sort.as_deref() {
            Some(raw) => raw.parse::<SortKey>()?,
            None => defaults.sort_key()?,
        },
    };

    let all = ctx.store.list()?;
    let counts = StatusCounts::tally(&all, today);
    let tasks = query::apply(all, &query, today);
    let views: Vec<TaskView<'_>> = tasks
        .iter()
        .map(|task| TaskView {
            status: classify(task, today),
            task,
        })
        .collect();

    let mut human = HumanOutput::new("Tasks");
    human.push_summary("Total", views.len().to_string());
    human.push_summary("Status", query.status.to_string());
    if query.priority != PriorityFilter::All {
        human.push_summary("Priority", query.priority.to_string());
    }
    human.push_summary("Sort", query.sort.to_string());
    if !query.text.trim().is_empty() {
        human.push_summary("Search", query.text.clone());
    }
    human.push_summary(
        "Counts",
        format!(
            "{} open, {} overdue, {} done",
            counts.open, counts.overdue, counts.done
        ),
    );
    for view in &views {
        human.push_detail(list_line(view));
        push_due_warning(&mut human, view.task);
    }
    if views.is_empty() && query.status != StatusFilter::All {
        human.push_next_step("quicklist list --status all");
    }

    let output = TaskListOutput {
        total: views.len(),
        query: &query,
        counts,
        tasks: views,
    };

    emit_success(options.global.output(), "list", &output, Some(&human))
}

pub fn run_stats(global: GlobalOptions) -> Result<()> {
    let ctx = global.load_context()?;
    let today = global.today()?;
    let counts = StatusCounts::tally(&ctx.store.list()?, today);

    let mut human = HumanOutput::new("Task stats");
    human.push_summary("Open", counts.open.to_string());
    human.push_summary("Overdue", counts.overdue.to_string());
    human.push_summary("Done", counts.done.to_string());
    human.push_summary("Total", counts.total.to_string());

    emit_success(global.output(), "stats", &counts, Some(&human))
}

fn parse_priority(value: Option<&str>) -> Result<Option<Priority>> {
    value.map(str::parse::<Priority>).transpose()
}

fn list_line(view: &TaskView<'_>) -> String {
    let task = view.task;
    let mut line = format!(
        "[{}][{}] {} {}",
        view.status, task.priority, task.id, task.title
    );
    if let Some(due) = task.due.as_ref() {
        line.push_str(&format!(" (due: {due})"));
    }
    if !task.tags.is_empty() {
        line.push_str(&format!(" #{}", task.tags.join(" #")));
    }
    line
}

fn push_task_summary(human: &mut HumanOutput, view: &TaskView<'_>) {
    let task = view.task;
    human.push_summary("ID", task.id.to_string());
    human.push_summary("Title", task.title.clone());
    human.push_summary("Status", view.status.to_string());
    human.push_summary("Priority", task.priority.to_string());
    if let Some(due) = task.due.as_ref() {
        human.push_summary("Due", due.clone());
    }
    if !task.tags.is_empty() {
        human.push_summary("Tags", task.tags.join(", "));
    }
    if let Some(notes) = task.notes.as_ref() {
        human.push_detail(notes.clone());
    }
    push_due_warning(human, task);
}

/// Flag stored due text that is not a date; such tasks classify as open.
fn push_due_warning(human: &mut HumanOutput, task: &Task) {
    if let Some(due) = task.due.as_deref() {
        if task.due_date().is_none() {
            human.push_warning(format!(
                "task {}: due '{due}' is not a YYYY-MM-DD date",
                task.id
            ));
        }
    }
}
