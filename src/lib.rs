//! quicklist - Personal Task List Library
//!
//! This library provides the core functionality for the quicklist CLI:
//! a single-user task list persisted in SQLite.
//!
//! # Core Concepts
//!
//! - **Tasks**: title, notes, due date, priority, tags, and a done flag
//! - **Status**: open, overdue, or done, derived from the done flag and the
//!   due date relative to "today"; never stored
//! - **Queries**: free-text search plus status/priority filters and a sort key
//! - **Transfer**: whole-table export and append-only import as JSON, CSV, or XLSX
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `config.toml`
//! - `error`: Error types and result aliases
//! - `output`: Human and JSON output envelopes
//! - `query`: Filtering and ordering of task lists
//! - `status`: Status classification and per-status counts
//! - `store`: SQLite-backed task store
//! - `tags`: Tag normalization
//! - `task`: Task data model and field parsing
//! - `transfer`: Import/export adapters

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod query;
pub mod status;
pub mod store;
pub mod tags;
pub mod task;
pub mod transfer;

pub use error::{Error, Result};
