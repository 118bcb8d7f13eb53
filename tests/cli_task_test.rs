//! Integration tests for task and session commands via CLI.
//!
//! These tests verify that:
//! - `negentropy task create/list/delete` work against an isolated store
//! - `negentropy session list` reports recorded sessions
//! - JSON and human-readable output formats are correct
//! - failures exit non-zero with the error on stderr

mod common;

use common::TestEnv;
use negentropy::storage::{Storage, TaskStore};
use predicates::prelude::*;

// === Task Create Tests ===

#[test]
fn test_task_create_json() {
    let env = TestEnv::new();

    env.negentropy()
        .args(["task", "create", "Deep work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\":1"))
        .stdout(predicate::str::contains("\"name\":\"Deep work\""))
        .stdout(predicate::str::contains("\"color\":\"blue\""))
        .stdout(predicate::str::contains("\"daily_target_minutes\":60"));
}

#[test]
fn test_task_create_human_with_options() {
    let env = TestEnv::new();

    env.negentropy()
        .args([
            "task",
            "create",
            "Reading",
            "--color",
            "green",
            "--daily-target-minutes",
            "30",
            "-H",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Created task 1 \"Reading\" (green, 30 min/day)",
        ));
}

#[test]
fn test_task_create_duplicate_fails() {
    let env = TestEnv::new();
    env.create_task("Focus");

    env.negentropy()
        .args(["task", "create", "Focus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"error\""))
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn test_task_create_blank_name_fails_human() {
    let env = TestEnv::new();

    env.negentropy()
        .args(["task", "create", "   ", "-H"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: Invalid input"));
}

// === Task List Tests ===

#[test]
fn test_task_list_empty() {
    let env = TestEnv::new();

    env.negentropy()
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\":0"));

    env.negentropy()
        .args(["task", "list", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks."));
}

#[test]
fn test_task_list_in_creation_order() {
    let env = TestEnv::new();
    env.create_task("Alpha");
    env.create_task("Beta");

    env.negentropy()
        .args(["task", "list", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 task(s):"))
        .stdout(predicate::str::is_match(r"(?s)\[1\] Alpha.*\[2\] Beta").unwrap());
}

// === Task Delete Tests ===

#[test]
fn test_task_delete_hides_task() {
    let env = TestEnv::new();
    let id = env.create_task("Chores");

    env.negentropy()
        .args(["task", "delete", &id.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"deleted\":true"));

    env.negentropy()
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\":0"));
}

#[test]
fn test_task_delete_unknown_fails() {
    let env = TestEnv::new();

    env.negentropy()
        .args(["task", "delete", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not found"));
}

#[test]
fn test_recreating_deleted_task_reactivates_it() {
    let env = TestEnv::new();
    let id = env.create_task("Chores");
    env.negentropy()
        .args(["task", "delete", &id.to_string()])
        .assert()
        .success();

    assert_eq!(env.create_task("Chores"), id);
}

// === Session List Tests ===

#[test]
fn test_session_list_reports_entropy() {
    let env = TestEnv::new();
    let id = env.create_task("Focus");

    {
        let mut store = Storage::open_in_dir(env.data_path()).unwrap();
        let start = chrono::Utc::now() - chrono::Duration::minutes(10);
        store.start_session(id, start).unwrap();
        store
            .end_session_as_entropy(id, start + chrono::Duration::minutes(2))
            .unwrap();
    }

    env.negentropy()
        .args(["session", "list", &id.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\":1"))
        .stdout(predicate::str::contains("\"entropy\":true"));

    env.negentropy()
        .args(["session", "list", &id.to_string(), "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("00:02:00  (entropy)"));
}

#[test]
fn test_session_list_without_sessions() {
    let env = TestEnv::new();
    let id = env.create_task("Focus");

    env.negentropy()
        .args(["session", "list", &id.to_string(), "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No sessions for task"));
}

// === Startup Tests ===

#[test]
fn test_log_file_written_to_data_dir() {
    let env = TestEnv::new();
    env.create_task("Focus");
    assert!(env.data_path().join("negentropy.db").exists());
    assert!(env.data_path().join("negentropy.log").exists());
}

#[test]
fn test_unusable_data_dir_is_fatal() {
    let env = TestEnv::new();
    let file = env.data_path().join("not-a-dir");
    std::fs::write(&file, "").unwrap();

    env.negentropy()
        .args(["task", "list", "-H"])
        .env("NEGENTROPY_DATA_DIR", &file)
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn test_version_includes_build_info() {
    let env = TestEnv::new();

    env.negentropy()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("negentropy"));
}
