//! Integration tests for `dt journal` and `dt gratitude`.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_journal_set_and_show() {
    let env = TestEnv::init();

    let saved = env.json(&["journal", "set", "Finished the book", "--date", "2024-01-02"]);
    assert_eq!(saved["kind"], "journal");
    assert_eq!(saved["date"], "2024-01-02");
    assert_eq!(saved["content"], "Finished the book");

    env.json(&["journal", "set", "Finished the second book", "--date", "2024-01-02"]);
    let shown = env.json(&["journal", "show", "--date", "2024-01-02"]);
    assert_eq!(shown["content"], "Finished the second book");
}

#[test]
fn test_show_day_without_entry_is_empty() {
    let env = TestEnv::init();

    let shown = env.json(&["gratitude", "show", "--date", "2024-01-02"]);
    assert_eq!(shown["content"], "");
    assert!(shown.get("updated_at").is_none());

    env.dt()
        .args(["gratitude", "show", "--date", "2024-01-02", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No gratitude entry for 2024-01-02."));
}

#[test]
fn test_gratitude_range() {
    let env = TestEnv::init();
    env.json(&["gratitude", "set", "Sunny walk", "--date", "2024-01-01"]);
    env.json(&["gratitude", "set", "Old friend called", "--date", "2024-01-03"]);
    env.json(&["journal", "set", "Not gratitude", "--date", "2024-01-02"]);

    let listed = env.json(&["gratitude", "show", "--from", "2024-01-01", "--to", "2024-01-07"]);
    assert_eq!(listed["count"], 2);
    assert_eq!(listed["notes"][0]["content"], "Sunny walk");
    assert_eq!(listed["notes"][1]["date"], "2024-01-03");
}

#[test]
fn test_notes_are_owner_scoped() {
    let env = TestEnv::init();
    env.json(&["journal", "set", "Mine", "--date", "2024-01-02", "--owner", "alice"]);

    let other = env.json(&["journal", "show", "--date", "2024-01-02", "--owner", "bob"]);
    assert_eq!(other["content"], "");
}

#[test]
fn test_week_shows_notes() {
    let env = TestEnv::init();
    env.json(&["gratitude", "set", "Warm soup", "--date", "2024-01-02"]);
    env.json(&["journal", "set", "Quiet evening", "--date", "2024-01-02"]);

    let week = env.json(&["week", "--date", "2024-01-03"]);
    let notes = week["notes"].as_array().unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0]["kind"], "gratitude");
    assert_eq!(notes[1]["kind"], "journal");

    env.dt()
        .args(["week", "--date", "2024-01-03", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gratitude: Warm soup"))
        .stdout(predicate::str::contains("Journal: Quiet evening"));
}

#[test]
fn test_notes_require_init() {
    let env = TestEnv::new();

    env.dt()
        .args(["journal", "set", "Too early"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("dt system init"));
}
