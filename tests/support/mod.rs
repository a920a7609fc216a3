#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// Pinned "today" so overdue classification is stable across runs.
pub const TODAY: &str = "2024-06-01";

/// An isolated database and config location for driving the binary.
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("data").join("tasks.db")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config").join("config.toml")
    }

    pub fn write_file(&self, rel_path: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, contents).expect("write file");
        path
    }

    pub fn write_config(&self, contents: &str) -> PathBuf {
        let path = self.config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create config dir");
        }
        fs::write(&path, contents).expect("write config");
        path
    }

    /// `quicklist` with the environment pointed at this sandbox.
    pub fn cmd(&self) -> Command {
        let mut cmd = quicklist_cmd();
        cmd.current_dir(self.dir.path())
            .env("QUICKLIST_DB", self.db_path())
            .env("QUICKLIST_CONFIG", self.config_path())
            .env("QUICKLIST_TODAY", TODAY);
        cmd
    }

    /// Run a command with `--json` and return the parsed envelope.
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&output).expect("json envelope")
    }

    /// Add a task and return its id.
    pub fn add(&self, args: &[&str]) -> i64 {
        let mut full = vec!["add"];
        full.extend_from_slice(args);
        let value = self.json(&full);
        value["data"]["id"].as_i64().expect("task id")
    }
}

pub fn quicklist_cmd() -> Command {
    let mut cmd = Command::cargo_bin("quicklist").expect("binary");
    cmd.env_remove("RUST_LOG");
    cmd
}

pub fn titles(list_envelope: &Value) -> Vec<String> {
    list_envelope["data"]["tasks"]
        .as_array()
        .expect("tasks array")
        .iter()
        .map(|task| task["title"].as_str().expect("title").to_string())
        .collect()
}
