use chrono::NaiveDate;

use quicklist::query::{self, SortKey, StatusFilter, TaskQuery};
use quicklist::status::{classify, TaskStatus};
use quicklist::store::TaskStore;
use quicklist::task::{NewTask, Priority};
use quicklist::transfer::{self, Format};
use quicklist::Error;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("date")
}

fn open_store() -> (tempfile::TempDir, TaskStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = TaskStore::open(dir.path().join("tasks.db")).expect("store");
    (dir, store)
}

#[test]
fn past_due_errand_is_overdue_until_done() {
    let (_dir, store) = open_store();
    let id = store
        .create(NewTask {
            title: "Buy milk".to_string(),
            notes: Some(String::new()),
            due: Some(date(2024, 1, 1)),
            priority: Priority::High,
            tags: vec!["errand".to_string()],
        })
        .expect("create");

    let today = date(2024, 6, 1);
    assert_eq!(classify(&store.get(id).expect("get"), today), TaskStatus::Overdue);

    store.set_done(id, true).expect("done");
    assert_eq!(classify(&store.get(id).expect("get"), today), TaskStatus::Done);
}

#[test]
fn undated_high_priority_sorts_first_by_due() {
    let (_dir, store) = open_store();
    store
        .create(NewTask {
            priority: Priority::Low,
            ..NewTask::new("low")
        })
        .expect("low");
    store
        .create(NewTask {
            priority: Priority::High,
            ..NewTask::new("high")
        })
        .expect("high");

    let query = TaskQuery {
        status: StatusFilter::All,
        sort: SortKey::Due,
        ..TaskQuery::default()
    };
    let first = query::apply(store.list().expect("list"), &query, date(2024, 6, 1));
    let second = query::apply(store.list().expect("list"), &query, date(2024, 6, 1));
    let titles: Vec<&str> = first.iter().map(|task| task.title.as_str()).collect();
    assert_eq!(titles, vec!["high", "low"]);
    assert_eq!(first, second);
}

#[test]
fn structured_import_of_existing_id_writes_nothing() {
    let (_dir, store) = open_store();
    store.create(NewTask::new("keep me")).expect("create");

    let payload = br#"[{"id": 99, "title": "new"}, {"id": 1, "title": "clash"}]"#;
    let err = transfer::import(&store, Format::Json, payload).expect_err("conflict");
    assert!(matches!(err, Error::Conflict(1)));

    let tasks = store.list().expect("list");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "keep me");
}

#[test]
fn second_delete_is_not_found() {
    let (_dir, store) = open_store();
    let id = store.create(NewTask::new("once")).expect("create");
    store.delete(id).expect("delete");
    assert!(matches!(store.delete(id), Err(Error::NotFound(_))));
}
