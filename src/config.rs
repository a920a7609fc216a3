//! Configuration loading and management
//!
//! Handles parsing of the quicklist `config.toml` file and resolving where
//! the task database lives.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::query::{PriorityFilter, SortKey, StatusFilter};
use crate::store::DB_FILE;

/// Config file name inside the platform config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Database location
    #[serde(default)]
    pub storage: StorageConfig,

    /// Defaults for `quicklist list`
    #[serde(default)]
    pub list: ListConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Explicit database path; the platform data dir is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Initial filter and sort selections for listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListConfig {
    #[serde(default = "default_status")]
    pub status: String,

    #[serde(default = "default_priority")]
    pub priority: String,

    #[serde(default = "default_sort")]
    pub sort: String,
}

fn default_status() -> String {
    StatusFilter::default().as_str().to_string()
}

fn default_priority() -> String {
    PriorityFilter::default().as_str().to_string()
}

fn default_sort() -> String {
    SortKey::default().as_str().to_string()
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            status: default_status(),
            priority: default_priority(),
            sort: default_sort(),
        }
    }
}

impl ListConfig {
    pub fn status_filter(&self) -> Result<StatusFilter> {
        self.status
            .parse()
            .map_err(|_| invalid("list.status", &self.status, "open|done|overdue|all"))
    }

    pub fn priority_filter(&self) -> Result<PriorityFilter> {
        self.priority
            .parse()
            .map_err(|_| invalid("list.priority", &self.priority, "all|high|medium|low"))
    }

    pub fn sort_key(&self) -> Result<SortKey> {
        self.sort
            .parse()
            .map_err(|_| invalid("list.sort", &self.sort, "created|due|priority"))
    }

    fn validate(&self) -> Result<()> {
        self.status_filter()?;
        self.priority_filter()?;
        self.sort_key()?;
        Ok(())
    }
}

fn invalid(field: &str, value: &str, expected: &str) -> Error {
    Error::InvalidConfig(format!(
        "{field}: invalid value '{value}' (expected {expected})"
    ))
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|err| {
            Error::InvalidConfig(format!("{}: {}", path.display(), err.message()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, or return defaults when it does not exist
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.storage.path {
            if path.as_os_str().is_empty() {
                return Err(Error::InvalidConfig(
                    "storage.path cannot be empty".to_string(),
                ));
            }
        }
        self.list.validate()?;
        Ok(())
    }

    /// Database path: an explicit override, then `storage.path`, then the
    /// platform data directory, then `./tasks.db`.
    pub fn resolve_db_path(&self, explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        if let Some(path) = &self.storage.path {
            return path.clone();
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().join(DB_FILE))
            .unwrap_or_else(|| PathBuf::from(DB_FILE))
    }
}

/// Config file location: an explicit override, else the platform config dir.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "quicklist")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert!(cfg.storage.path.is_none());
        assert_eq!(cfg.list.status, "open");
        assert_eq!(cfg.list.priority, "all");
        assert_eq!(cfg.list.sort, "due");
        assert_eq!(cfg.list.status_filter().expect("status"), StatusFilter::Open);
        assert_eq!(
            cfg.list.priority_filter().expect("priority"),
            PriorityFilter::All
        );
        assert_eq!(cfg.list.sort_key().expect("sort"), SortKey::Due);
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        let content = r#"
[storage]
path = "/var/lib/quicklist/tasks.db"

[list]
status = "all"
priority = "high"
sort = "priority"
"#;
        fs::write(&path, content.trim()).expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(
            cfg.storage.path.as_deref(),
            Some(Path::new("/var/lib/quicklist/tasks.db"))
        );
        assert_eq!(cfg.list.status_filter().expect("status"), StatusFilter::All);
        assert_eq!(
            cfg.list.priority_filter().expect("priority"),
            PriorityFilter::High
        );
        assert_eq!(cfg.list.sort_key().expect("sort"), SortKey::Priority);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[list]\nsort = \"created\"").expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.list.sort, "created");
        assert_eq!(cfg.list.status, "open");
        assert!(cfg.storage.path.is_none());
    }

    #[test]
    fn invalid_list_default_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[list]\nstatus = \"someday\"").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        match err {
            Error::InvalidConfig(message) => assert!(message.contains("list.status")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_toml_is_invalid_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[list\nstatus = ").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn load_or_default_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.toml");
        let cfg = Config::load_or_default(Some(missing.as_path())).expect("defaults");
        assert_eq!(cfg, Config::default());
        assert_eq!(Config::load_or_default(None).expect("defaults"), Config::default());
    }

    #[test]
    fn db_path_precedence() {
        let mut cfg = Config::default();
        let explicit = Path::new("/tmp/explicit.db");
        assert_eq!(cfg.resolve_db_path(Some(explicit)), explicit);

        cfg.storage.path = Some(PathBuf::from("/tmp/configured.db"));
        assert_eq!(cfg.resolve_db_path(Some(explicit)), explicit);
        assert_eq!(cfg.resolve_db_path(None), PathBuf::from("/tmp/configured.db"));

        cfg.storage.path = None;
        assert!(cfg.resolve_db_path(None).ends_with(DB_FILE));
    }

    #[test]
    fn save_writes_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config::default();
        cfg.save(&path).expect("save config");

        let written = fs::read_to_string(&path).expect("read config");
        assert!(written.contains("sort = \"due\""));
        assert_eq!(Config::load(&path).expect("reload"), cfg);
    }
}
