//! Integration tests for `dt config` and `dt category`.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_config_show_defaults() {
    let env = TestEnv::new();

    let config = env.json(&["config", "show"]);
    assert_eq!(config["owner"]["value"], "local");
    assert_eq!(config["owner"]["source"], "default");
    assert_eq!(config["output_format"]["value"], "json");
    assert_eq!(config["default_points"]["value"], 1);
    assert_eq!(config["default_category"]["value"], "General");
}

#[test]
fn test_config_set_changes_defaults() {
    let env = TestEnv::init();
    env.json(&["config", "set", "default-points", "3"]);
    env.json(&["config", "set", "default-category", "Health"]);

    let id = env.add_task(&["Walk", "--date", "2024-01-01"]);
    let task = env.json(&["task", "show", &id]);
    assert_eq!(task["points"], 3);
    assert_eq!(task["category"], "Health");

    let config = env.json(&["config", "show"]);
    assert_eq!(config["default_points"]["source"], "data-dir");
}

#[test]
fn test_config_system_file_is_lower_precedence() {
    let env = TestEnv::init();
    std::fs::write(
        env.config_dir.path().join("config.kdl"),
        "owner \"system-owner\"\ndefault-category \"Work\"\n",
    )
    .unwrap();
    env.json(&["config", "set", "owner", "alice"]);

    let config = env.json(&["config", "show"]);
    assert_eq!(config["owner"]["value"], "alice");
    assert_eq!(config["owner"]["source"], "data-dir");
    assert_eq!(config["default_category"]["value"], "Work");
    assert_eq!(config["default_category"]["source"], "system");

    let config = env.json(&["config", "show", "--owner", "bob"]);
    assert_eq!(config["owner"]["value"], "bob");
    assert_eq!(config["owner"]["source"], "cli");
}

#[test]
fn test_config_output_format_human() {
    let env = TestEnv::init();
    env.dt()
        .args(["config", "set", "output-format", "human"])
        .assert()
        .success();

    env.dt()
        .args(["category", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No categories."));
}

#[test]
fn test_config_set_unknown_key() {
    let env = TestEnv::new();

    env.dt()
        .args(["config", "set", "editor", "vim"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_category_add_is_case_insensitive() {
    let env = TestEnv::init();

    let first = env.json(&["category", "add", "Health", "--color", "#10B981"]);
    assert_eq!(first["created"], true);
    let again = env.json(&["category", "add", "health"]);
    assert_eq!(again["created"], false);
    assert_eq!(again["name"], "Health");

    env.add_task(&["Groceries", "-c", "Errands", "--date", "2024-01-01"]);
    let list = env.json(&["category", "list"]);
    assert_eq!(list["count"], 2);
    assert_eq!(list["categories"][0]["name"], "Errands");
}
