mod support;

use predicates::str::contains;
use serde_json::Value;

use support::{titles, TestEnv};

fn seed(env: &TestEnv) {
    env.add(&[
        "Buy milk",
        "--notes",
        "whole, not skim",
        "--due",
        "2024-01-01",
        "--priority",
        "high",
        "--tags",
        "errand, shop",
    ]);
    let id = env.add(&["File taxes", "--priority", "low"]);
    env.json(&["done", &id.to_string()]);
}

#[test]
fn json_export_goes_to_stdout_by_default() {
    let env = TestEnv::new();
    seed(&env);

    let output = env
        .cmd()
        .arg("export")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let records: Value = serde_json::from_slice(&output).expect("json records");
    let records = records.as_array().expect("array");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["id"], 1);
    assert_eq!(records[0]["tags"], "errand,shop");
    assert_eq!(records[0]["done"], 0);
    assert_eq!(records[1]["done"], 1);
}

#[test]
fn csv_export_has_header_row() {
    let env = TestEnv::new();
    seed(&env);

    env.cmd()
        .args(["export", "--format", "csv"])
        .assert()
        .success()
        .stdout(contains(
            "id,title,notes,due,priority,tags,done,created_at,updated_at",
        ))
        .stdout(contains("\"whole, not skim\""));
}

#[test]
fn xlsx_export_requires_output_path() {
    let env = TestEnv::new();
    env.cmd()
        .args(["export", "--format", "xlsx"])
        .assert()
        .code(2)
        .stderr(contains("requires --output"));
}

#[test]
fn export_to_file_infers_format_and_reports() {
    let env = TestEnv::new();
    seed(&env);
    let path = env.path().join("out").join("tasks.xlsx");

    let value = env.json(&["export", "--output", path.to_str().expect("utf8 path")]);
    assert_eq!(value["command"], "export");
    assert_eq!(value["data"]["format"], "xlsx");
    assert_eq!(value["data"]["exported"], 2);
    assert!(path.exists());
}

#[test]
fn json_round_trip_into_fresh_database() {
    let source = TestEnv::new();
    seed(&source);
    let path = source.path().join("tasks.json");
    source.json(&["export", "-o", path.to_str().expect("utf8 path")]);

    let target = TestEnv::new();
    let report = target.json(&["import", path.to_str().expect("utf8 path")]);
    assert_eq!(report["command"], "import");
    assert_eq!(report["data"]["format"], "json");
    assert_eq!(report["data"]["imported"], 2);

    let before = source.json(&["list", "--status", "all", "--sort", "created"]);
    let after = target.json(&["list", "--status", "all", "--sort", "created"]);
    assert_eq!(before["data"]["tasks"], after["data"]["tasks"]);
}

#[test]
fn spreadsheet_round_trip_appends() {
    let env = TestEnv::new();
    seed(&env);
    let path = env.path().join("tasks.xlsx");
    env.json(&["export", "-o", path.to_str().expect("utf8 path")]);

    let report = env.json(&["import", path.to_str().expect("utf8 path")]);
    assert_eq!(report["data"]["imported"], 2);

    let list = env.json(&["list", "--status", "all", "--sort", "created"]);
    assert_eq!(
        titles(&list),
        vec!["File taxes", "Buy milk", "File taxes", "Buy milk"]
    );
    let newest = &list["data"]["tasks"][1];
    assert_eq!(newest["id"], 3);
    assert_eq!(newest["tags"], serde_json::json!(["errand", "shop"]));
    assert_eq!(newest["notes"], "whole, not skim");
}

#[test]
fn json_reimport_conflicts_and_writes_nothing() {
    let env = TestEnv::new();
    seed(&env);
    let path = env.path().join("tasks.json");
    env.json(&["export", "-o", path.to_str().expect("utf8 path")]);

    env.cmd()
        .args(["import", path.to_str().expect("utf8 path")])
        .assert()
        .code(3)
        .stderr(contains("already exists"));

    let stats = env.json(&["stats"]);
    assert_eq!(stats["data"]["total"], 2);
}

#[test]
fn csv_without_title_column_is_a_schema_error() {
    let env = TestEnv::new();
    let path = env.write_file("notes.csv", "notes,due\nsomething,2024-01-01\n");

    env.cmd()
        .args(["import", path.to_str().expect("utf8 path")])
        .assert()
        .code(2)
        .stderr(contains("title"));
}

#[test]
fn csv_import_accepts_minimal_columns() {
    let env = TestEnv::new();
    let path = env.write_file(
        "incoming.txt",
        "Title,Priority,Tags\nPay rent,high,\"Home, bills\"\n,,\nCall mom,,\n",
    );

    let report = env.json(&["import", path.to_str().expect("utf8 path"), "--format", "csv"]);
    assert_eq!(report["data"]["imported"], 2);

    let list = env.json(&["list", "--sort", "priority"]);
    assert_eq!(titles(&list), vec!["Pay rent", "Call mom"]);
    assert_eq!(
        list["data"]["tasks"][0]["tags"],
        serde_json::json!(["home", "bills"])
    );
}

#[test]
fn bad_row_aborts_the_whole_import() {
    let env = TestEnv::new();
    let path = env.write_file("tasks.csv", "title,priority\nfirst,low\nsecond,urgent\n");

    env.cmd()
        .args(["import", path.to_str().expect("utf8 path")])
        .assert()
        .code(2)
        .stderr(contains("row 3"));

    let stats = env.json(&["stats"]);
    assert_eq!(stats["data"]["total"], 0);
}

#[test]
fn malformed_json_is_a_format_error() {
    let env = TestEnv::new();
    let path = env.write_file("tasks.json", r#"{"title": "not a list"}"#);

    let output = env
        .cmd()
        .args(["import", path.to_str().expect("utf8 path"), "--json"])
        .assert()
        .code(2)
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output).expect("json");
    assert_eq!(value["error"]["kind"], "format");
}

#[test]
fn unknown_extension_needs_format_flag() {
    let env = TestEnv::new();
    let path = env.write_file("tasks.dat", "title\nx\n");
    env.cmd()
        .args(["import", path.to_str().expect("utf8 path")])
        .assert()
        .code(2)
        .stderr(contains("unsupported format"));
}

#[test]
fn edit_keeps_imported_due_text_and_warns() {
    let env = TestEnv::new();
    let path = env.write_file("tasks.csv", "title,due\nPay rent,next friday\n");
    env.json(&["import", path.to_str().expect("utf8 path")]);

    let edited = env.json(&["edit", "1", "--priority", "high"]);
    assert_eq!(edited["data"]["priority"], "high");
    assert_eq!(edited["data"]["due"], "next friday");
    assert_eq!(edited["data"]["status"], "open");
    assert_eq!(
        edited["warnings"][0],
        "task 1: due 'next friday' is not a YYYY-MM-DD date"
    );

    env.cmd()
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(contains("Warnings:"))
        .stdout(contains("due 'next friday' is not a YYYY-MM-DD date"));
}

#[test]
fn undecodable_csv_is_a_user_error() {
    let env = TestEnv::new();
    let mut bytes = b"title\nfine\n".to_vec();
    bytes.extend_from_slice(&[0xc3, 0x28, b'\n']);
    let path = env.write_file("broken.csv", bytes);

    env.cmd()
        .args(["import", path.to_str().expect("utf8 path")])
        .assert()
        .code(2)
        .stderr(contains("row 3"));

    let stats = env.json(&["stats"]);
    assert_eq!(stats["data"]["total"], 0);
}
