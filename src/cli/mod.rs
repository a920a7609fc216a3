//! Command-line interface for quicklist
//!
//! This module defines the CLI structure using clap derive macros.
//! Each group of subcommands is implemented in its own submodule.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::config::{self, Config};
use crate::error::{Error, Result};
use crate::output::OutputOptions;
use crate::store::TaskStore;

mod init;
mod task;
mod transfer;

/// quicklist - a personal to-do list backed by SQLite
///
/// Tasks carry a title, optional notes, a due date, a priority, and tags.
/// Lists can be searched, filtered, sorted, and exported to JSON, CSV, or XLSX.
#[derive(Parser, Debug)]
#[command(name = "quicklist")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the task database
    #[arg(long, global = true, env = "QUICKLIST_DB")]
    pub db: Option<PathBuf>,

    /// Path to the config file
    #[arg(long, global = true, env = "QUICKLIST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today when deciding what is overdue
    #[arg(long, global = true, env = "QUICKLIST_TODAY")]
    pub today: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database and a default config file
    Init,

    /// Add a task
    Add {
        /// Task title
        title: String,

        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<String>,

        /// Priority: low, medium, high
        #[arg(short, long)]
        priority: Option<String>,

        /// Comma-separated tags, e.g. "work, urgent"
        #[arg(short, long)]
        tags: Option<String>,
    },

    /// Change fields of an existing task
    Edit {
        /// Task id
        id: i64,

        /// New title (a blank value keeps the current title)
        #[arg(long)]
        title: Option<String>,

        /// New notes (an empty value clears them)
        #[arg(short, long)]
        notes: Option<String>,

        /// New due date (YYYY-MM-DD)
        #[arg(short, long, conflicts_with = "clear_due")]
        due: Option<String>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,

        /// New priority: low, medium, high
        #[arg(short, long)]
        priority: Option<String>,

        /// Replacement tags (an empty value clears them)
        #[arg(short, long)]
        tags: Option<String>,
    },

    /// Mark a task done
    Done {
        /// Task id
        id: i64,
    },

    /// Mark a done task open again
    Reopen {
        /// Task id
        id: i64,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: i64,
    },

    /// Show one task
    Show {
        /// Task id
        id: i64,
    },

    /// List tasks
    List {
        /// Case-insensitive text matched against title, notes, tags, and due
        #[arg(short, long)]
        search: Option<String>,

        /// Status filter: open, done, overdue, all
        #[arg(long)]
        status: Option<String>,

        /// Priority filter: all, high, medium, low
        #[arg(short, long)]
        priority: Option<String>,

        /// Sort key: created, due, priority
        #[arg(long)]
        sort: Option<String>,
    },

    /// Count tasks by status
    Stats,

    /// Export every task
    Export {
        /// Format: json, csv, xlsx (inferred from --output when omitted)
        #[arg(short, long)]
        format: Option<String>,

        /// Destination file (stdout when omitted; required for xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Append tasks from a JSON, CSV, or XLSX file
    Import {
        /// Source file
        path: PathBuf,

        /// Format: json, csv, xlsx (inferred from the extension when omitted)
        #[arg(short, long)]
        format: Option<String>,
    },
}

/// Flags shared by every command.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub db: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub today: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

/// Loaded configuration plus the store it points at.
pub(crate) struct TaskContext {
    pub config: Config,
    pub store: TaskStore,
}

impl GlobalOptions {
    pub fn output(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }

    /// The date used to classify overdue tasks.
    pub fn today(&self) -> Result<NaiveDate> {
        match self.today.as_deref() {
            Some(raw) => crate::task::parse_date(raw).ok_or_else(|| {
                Error::InvalidArgument(format!("invalid --today '{raw}': expected YYYY-MM-DD"))
            }),
            None => Ok(chrono::Local::now().date_naive()),
        }
    }

    pub(crate) fn load_context(&self) -> Result<TaskContext> {
        let config_path = config::resolve_config_path(self.config.as_deref());
        let config = Config::load_or_default(config_path.as_deref())?;
        let db_path = config.resolve_db_path(self.db.as_deref());
        tracing::debug!(db = %db_path.display(), "resolved database path");
        let store = TaskStore::open(db_path)?;
        Ok(TaskContext { config, store })
    }
}

impl Cli {
    fn global(&self) -> GlobalOptions {
        GlobalOptions {
            db: self.db.clone(),
            config: self.config.clone(),
            today: self.today.clone(),
            json: self.json,
            quiet: self.quiet,
        }
    }

    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let global = self.global();
        match self.command {
            Commands::Init => init::run(global),
            Commands::Add {
                title,
                notes,
                due,
                priority,
                tags,
            } => task::run_add(task::AddOptions {
                title,
                notes,
                due,
                priority,
                tags,
                global,
            }),
            Commands::Edit {
                id,
                title,
                notes,
                due,
                clear_due,
                priority,
                tags,
            } => task::run_edit(task::EditOptions {
                id,
                title,
                notes,
                due,
                clear_due,
                priority,
                tags,
                global,
            }),
            Commands::Done { id } => task::run_set_done(task::SetDoneOptions {
                id,
                done: true,
                global,
            }),
            Commands::Reopen { id } => task::run_set_done(task::SetDoneOptions {
                id,
                done: false,
                global,
            }),
            Commands::Rm { id } => task::run_delete(task::IdOptions { id, global }),
            Commands::Show { id } => task::run_show(task::IdOptions { id, global }),
            Commands::List {
                search,
                status,
                priority,
                sort,
            } => task::run_list(task::ListOptions {
                search,
                status,
                priority,
                sort,
                global,
            }),
            Commands::Stats => task::run_stats(global),
            Commands::Export { format, output } => transfer::run_export(transfer::ExportOptions {
                format,
                output,
                global,
            }),
            Commands::Import { path, format } => transfer::run_import(transfer::ImportOptions {
                path,
                format,
                global,
            }),
        }
    }
}
