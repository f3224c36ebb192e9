//! Integration tests for task commands via CLI.
//!
//! These tests verify that task commands work correctly through the CLI:
//! - `dt task add/show/update/done/undo/delete/list` all work
//! - JSON and human-readable output formats are correct
//! - Owner scoping and archival behave as documented

mod common;

use common::TestEnv;
use predicates::prelude::*;

// === Add / Show ===

#[test]
fn test_task_add_json() {
    let env = TestEnv::init();

    env.dt()
        .args(["task", "add", "Stretch", "-c", "Health", "--date", "2024-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\":\"dt-"))
        .stdout(predicate::str::contains("\"title\":\"Stretch\""))
        .stdout(predicate::str::contains("\"kind\":\"spontaneous\""));
}

#[test]
fn test_task_add_human() {
    let env = TestEnv::init();

    env.dt()
        .args(["task", "add", "Stretch", "--regular", "--date", "2024-01-01", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created regular task dt-"));
}

#[test]
fn test_task_add_rejects_invalid_points() {
    let env = TestEnv::init();

    env.dt()
        .args(["task", "add", "Stretch", "-p", "4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("points must be 1-3"));
}

#[test]
fn test_task_add_rejects_loose_dates() {
    let env = TestEnv::init();

    env.dt()
        .args(["task", "add", "Stretch", "--date", "2024-1-5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM-DD"));
}

#[test]
fn test_task_show_fields() {
    let env = TestEnv::init();
    let id = env.add_task(&[
        "Plan week", "-c", "Work", "-p", "3", "--important", "--urgent", "--date", "2024-01-01",
    ]);

    let task = env.json(&["task", "show", &id]);
    assert_eq!(task["id"], id.as_str());
    assert_eq!(task["category"], "Work");
    assert_eq!(task["points"], 3);
    assert_eq!(task["is_important"], true);
    assert_eq!(task["is_urgent"], true);
    assert_eq!(task["anchor_date"], "2024-01-01");
}

#[test]
fn test_task_show_not_found() {
    let env = TestEnv::init();

    env.dt()
        .args(["task", "show", "dt-000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_task_update() {
    let env = TestEnv::init();
    let id = env.add_task(&["Read", "--date", "2024-01-01"]);

    env.dt()
        .args(["task", "update", &id, "--title", "Read a chapter", "-p", "2", "--important", "true"])
        .assert()
        .success();

    let task = env.json(&["task", "show", &id]);
    assert_eq!(task["title"], "Read a chapter");
    assert_eq!(task["points"], 2);
    assert_eq!(task["is_important"], true);
}

// === Completion ===

#[test]
fn test_done_and_undo_regular_are_idempotent() {
    let env = TestEnv::init();
    let id = env.add_task(&["Stretch", "--regular", "--date", "2024-01-01"]);

    for _ in 0..2 {
        let done = env.json(&["task", "done", &id, "--day", "2024-01-02"]);
        assert_eq!(done["completed"], true);
    }
    let task = env.json(&["task", "show", &id]);
    assert_eq!(task["completed_dates"].as_array().unwrap().len(), 1);

    for _ in 0..2 {
        let undone = env.json(&["task", "undo", &id, "--day", "2024-01-02"]);
        assert_eq!(undone["completed"], false);
    }
    let task = env.json(&["task", "show", &id]);
    assert!(task["completed_dates"].as_array().unwrap().is_empty());
}

#[test]
fn test_done_before_anchor_is_rejected() {
    let env = TestEnv::init();
    let id = env.add_task(&["Stretch", "--regular", "--date", "2024-01-05"]);

    env.dt()
        .args(["task", "done", &id, "--day", "2024-01-04"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not active"));
}

// === List ===

#[test]
fn test_list_regular_range() {
    let env = TestEnv::init();
    let id = env.add_task(&["Stretch", "--regular", "-p", "2", "--date", "2024-01-01"]);
    env.json(&["task", "done", &id, "--day", "2024-01-02"]);

    let list = env.json(&["task", "list", "--from", "2024-01-01", "--to", "2024-01-03"]);
    assert_eq!(list["count"], 3);
    let instances = list["instances"].as_array().unwrap();
    let completed: Vec<bool> = instances
        .iter()
        .map(|i| i["completed"].as_bool().unwrap())
        .collect();
    assert_eq!(completed, vec![false, true, false]);
    assert_eq!(instances[0]["date"], "2024-01-01");
}

#[test]
fn test_list_inverted_range_fails() {
    let env = TestEnv::init();

    env.dt()
        .args(["task", "list", "--from", "2024-01-05", "--to", "2024-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid range"));
}

#[test]
fn test_list_human_groups_by_day() {
    let env = TestEnv::init();
    env.add_task(&["Water plants", "-c", "Home", "--date", "2024-01-01"]);

    env.dt()
        .args(["task", "list", "--day", "2024-01-01", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-01-01:"))
        .stdout(predicate::str::contains("[ ]"))
        .stdout(predicate::str::contains("Water plants"));
}

// === Delete / Archive ===

#[test]
fn test_delete_with_context_archives_regular() {
    let env = TestEnv::init();
    let id = env.add_task(&["Stretch", "--regular", "--date", "2024-01-01"]);

    let result = env.json(&["task", "delete", &id, "--context", "2024-01-03"]);
    assert_eq!(result["action"], "set_end_date");
    assert_eq!(result["end_date"], "2024-01-02");

    let list = env.json(&["task", "list", "--from", "2024-01-01", "--to", "2024-01-10"]);
    assert_eq!(list["count"], 2);

    // History is still there
    env.dt().args(["task", "show", &id]).assert().success();
}

#[test]
fn test_delete_on_anchor_leaves_task_inactive() {
    let env = TestEnv::init();
    let id = env.add_task(&["Stretch", "--regular", "--date", "2024-01-05"]);

    env.json(&["task", "delete", &id, "--context", "2024-01-05"]);

    let list = env.json(&["task", "list", "--from", "2024-01-01", "--to", "2024-01-31"]);
    assert_eq!(list["count"], 0);
}

#[test]
fn test_delete_without_context_hard_deletes() {
    let env = TestEnv::init();
    let id = env.add_task(&["Stretch", "--regular", "--date", "2024-01-01"]);

    let result = env.json(&["task", "delete", &id]);
    assert_eq!(result["action"], "hard_delete");

    env.dt().args(["task", "show", &id]).assert().failure();
}

// === Owner scoping ===

#[test]
fn test_tasks_are_owner_scoped() {
    let env = TestEnv::init();
    let id = env.add_task(&["Private", "--owner", "alice", "--date", "2024-01-01"]);

    env.dt()
        .args(["task", "show", &id, "--owner", "bob"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    let list = env.json(&["task", "list", "--day", "2024-01-01", "--owner", "bob"]);
    assert_eq!(list["count"], 0);

    env.dt()
        .args(["task", "show", &id])
        .env("DT_OWNER", "alice")
        .assert()
        .success();
}
