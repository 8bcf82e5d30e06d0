use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn nudge(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("nudge").unwrap();
    cmd.env("NUDGE_HOME", home).env_remove("RUST_LOG");
    cmd
}

fn stored(home: &Path) -> serde_json::Value {
    let raw = std::fs::read_to_string(home.join("reminders.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn add_then_list() {
    let temp_dir = tempfile::tempdir().unwrap();

    nudge(temp_dir.path())
        .args(["add", "Buy", "milk", "--priority", "urgent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reminder added (urgent): Buy milk"));

    nudge(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Buy milk"));

    let data = stored(temp_dir.path());
    let list = data.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["text"], "Buy milk");
    assert_eq!(list[0]["priority"], "urgent");
    assert_eq!(list[0]["done"], false);
    assert!(list[0]["notificationId"].is_string());
}

#[test]
fn naked_run_lists_sorted_by_priority() {
    let temp_dir = tempfile::tempdir().unwrap();
    nudge(temp_dir.path())
        .args(["add", "later", "-p", "urgent"])
        .assert()
        .success();
    nudge(temp_dir.path())
        .args(["add", "first", "-p", "very_urgent"])
        .assert()
        .success();

    let output = nudge(temp_dir.path()).output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let first = stdout.find("first").unwrap();
    let later = stdout.find("later").unwrap();
    assert!(first < later, "unexpected order:\n{}", stdout);
}

#[test]
fn urgent_mode_hides_normal() {
    let temp_dir = tempfile::tempdir().unwrap();
    nudge(temp_dir.path()).args(["add", "calm"]).assert().success();
    nudge(temp_dir.path())
        .args(["add", "hurry", "-p", "very-urgent"])
        .assert()
        .success();

    nudge(temp_dir.path())
        .args(["ls", "--mode", "urgent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hurry").and(predicate::str::contains("calm").not()));
}

#[test]
fn blank_text_is_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    nudge(temp_dir.path())
        .args(["add", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Reminder text cannot be empty"));
    assert!(!temp_dir.path().join("reminders.json").exists());
}

#[test]
fn denied_permission_creates_nothing() {
    let temp_dir = tempfile::tempdir().unwrap();
    nudge(temp_dir.path())
        .args(["config", "notifications", "false"])
        .assert()
        .success();

    nudge(temp_dir.path())
        .args(["add", "Buy milk"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Permission for notifications not granted"));
    assert!(!temp_dir.path().join("reminders.json").exists());
}

#[test]
fn done_without_undo_deletes_and_cancels_notification() {
    let temp_dir = tempfile::tempdir().unwrap();
    nudge(temp_dir.path()).args(["add", "Buy milk"]).assert().success();
    nudge(temp_dir.path()).args(["add", "Walk dog"]).assert().success();

    nudge(temp_dir.path())
        .args(["done", "1", "--mode", "all", "--no-undo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reminder completed: Buy milk"))
        .stdout(predicate::str::contains("Reminder deleted: Buy milk"));

    let data = stored(temp_dir.path());
    let list = data.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["text"], "Walk dog");

    let raw = std::fs::read_to_string(temp_dir.path().join("notifications.json")).unwrap();
    let notifications: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(notifications.as_array().unwrap().len(), 1);
}

#[test]
fn done_waits_out_the_grace_period() {
    let temp_dir = tempfile::tempdir().unwrap();
    nudge(temp_dir.path())
        .args(["config", "grace-period-ms", "200"])
        .assert()
        .success();
    nudge(temp_dir.path()).args(["add", "Buy milk"]).assert().success();

    nudge(temp_dir.path())
        .args(["done", "1"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Press Enter"))
        .stdout(predicate::str::contains("Reminder deleted: Buy milk"));

    assert_eq!(stored(temp_dir.path()).as_array().unwrap().len(), 0);
}

#[test]
fn enter_during_grace_period_undoes() {
    let temp_dir = tempfile::tempdir().unwrap();
    nudge(temp_dir.path())
        .args(["config", "grace-period-ms", "5000"])
        .assert()
        .success();
    nudge(temp_dir.path()).args(["add", "Buy milk"]).assert().success();

    nudge(temp_dir.path())
        .args(["done", "1"])
        .write_stdin("\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Reminder restored: Buy milk"));

    let data = stored(temp_dir.path());
    let list = data.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["done"], false);
}

#[test]
fn done_with_unknown_selector_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    nudge(temp_dir.path())
        .args(["done", "3", "--no-undo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Reminder not found: 3"));
}

#[test]
fn toggle_flips_done_flag() {
    let temp_dir = tempfile::tempdir().unwrap();
    nudge(temp_dir.path()).args(["add", "Buy milk"]).assert().success();

    nudge(temp_dir.path())
        .args(["toggle", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marked done: Buy milk"));
    assert_eq!(stored(temp_dir.path())[0]["done"], true);
}

#[test]
fn clear_requires_confirmation() {
    let temp_dir = tempfile::tempdir().unwrap();
    nudge(temp_dir.path()).args(["add", "Buy milk"]).assert().success();

    nudge(temp_dir.path())
        .arg("clear")
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Operation cancelled."));
    assert!(temp_dir.path().join("reminders.json").exists());

    nudge(temp_dir.path())
        .args(["clear", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 reminder."));
    assert!(!temp_dir.path().join("reminders.json").exists());
}

#[test]
fn interval_and_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    nudge(temp_dir.path())
        .args(["interval", "urgent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("every 43200 seconds"));

    nudge(temp_dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("grace-period-ms = 5000"))
        .stdout(predicate::str::contains("sort-by = severity"));

    nudge(temp_dir.path())
        .args(["config", "view", "all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("view set to all"));

    nudge(temp_dir.path())
        .args(["config", "view"])
        .assert()
        .success()
        .stdout(predicate::str::contains("all"));
}

#[test]
fn custom_namespace_uses_its_own_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    nudge(temp_dir.path())
        .args(["config", "namespace", "work"])
        .assert()
        .success();
    nudge(temp_dir.path()).args(["add", "Ship it"]).assert().success();

    assert!(temp_dir.path().join("work.json").exists());
    assert!(!temp_dir.path().join("reminders.json").exists());
}

#[test]
fn corrupt_data_lists_empty_and_logs() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(temp_dir.path().join("reminders.json"), "{broken").unwrap();

    nudge(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No reminders yet"))
        .stderr(predicate::str::contains("Failed to load reminders"));
}

#[test]
fn reserved_namespace_is_rejected_and_config_survives() {
    let temp_dir = tempfile::tempdir().unwrap();
    nudge(temp_dir.path())
        .args(["config", "namespace", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reserved"));
    nudge(temp_dir.path()).args(["add", "x"]).assert().success();

    nudge(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("x"));
    assert_eq!(stored(temp_dir.path()).as_array().unwrap().len(), 1);
}

#[test]
fn hand_edited_reserved_namespace_falls_back_to_default() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(
        temp_dir.path().join("config.json"),
        r#"{"namespace":"config"}"#,
    )
    .unwrap();

    nudge(temp_dir.path()).args(["add", "x"]).assert().success();
    nudge(temp_dir.path())
        .args(["config", "namespace", "reminders"])
        .assert()
        .success()
        .stdout(predicate::str::contains("namespace set to reminders"));
    assert_eq!(stored(temp_dir.path()).as_array().unwrap().len(), 1);
}
