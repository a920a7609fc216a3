//! quicklist init command implementation
//!
//! Creates the task database and writes a default config file when none exists.

use std::path::{Path, PathBuf};

use crate::config::{self, Config};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};
use crate::store::TaskStore;

use super::GlobalOptions;

#[derive(serde::Serialize)]
struct InitReport {
    db: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<PathBuf>,
    created: InitCreated,
}

#[derive(serde::Serialize)]
struct InitCreated {
    db: bool,
    config: bool,
}

pub fn run(global: GlobalOptions) -> Result<()> {
    let config_path = config::resolve_config_path(global.config.as_deref());
    let created_config = match config_path.as_deref() {
        Some(path) => ensure_config(path)?,
        None => false,
    };

    let config = Config::load_or_default(config_path.as_deref())?;
    let db_path = config.resolve_db_path(global.db.as_deref());
    let created_db = !db_path.exists();
    let store = TaskStore::open(&db_path)?;
    let task_count = store.list()?.len();

    let report = InitReport {
        db: db_path.clone(),
        config: config_path.clone(),
        created: InitCreated {
            db: created_db,
            config: created_config,
        },
    };

    let mut created_items = Vec::new();
    if created_db {
        created_items.push("database");
    }
    if created_config {
        created_items.push("config");
    }

    let header = if created_items.is_empty() {
        "quicklist init: nothing to do".to_string()
    } else {
        "quicklist init: ready".to_string()
    };

    let mut human = HumanOutput::new(header);
    human.push_summary("db", db_path.display().to_string());
    if let Some(path) = config_path.as_ref() {
        human.push_summary("config", path.display().to_string());
    }
    human.push_summary(
        "created",
        if created_items.is_empty() {
            "none".to_string()
        } else {
            created_items.join(", ")
        },
    );
    human.push_summary("tasks", task_count.to_string());
    human.push_next_step("quicklist add \"<title>\" --due YYYY-MM-DD");

    emit_success(global.output(), "init", &report, Some(&human))
}

fn ensure_config(config_path: &Path) -> Result<bool> {
    if config_path.exists() {
        if !config_path.is_file() {
            return Err(Error::InvalidConfig(format!(
                "config path exists but is not a file: {}",
                config_path.display()
            )));
        }
        return Ok(false);
    }

    Config::default().save(config_path)?;
    Ok(true)
}
