//! End-to-end checks that spawn the built binary against a temporary
//! data directory.

use std::process::{Command, Output};

use tempfile::TempDir;

fn run_cli(data_dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pomo"))
        .args(args)
        .env("POMO_DATA_DIR", data_dir.path())
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_help_exits_zero() {
    let dir = TempDir::new().unwrap();
    let output = run_cli(&dir, &["--help"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("pomodoro"));
}

#[test]
fn test_rejects_out_of_range_durations() {
    let dir = TempDir::new().unwrap();
    assert!(!run_cli(&dir, &["--work", "0"]).status.success());
    assert!(!run_cli(&dir, &["--work", "200"]).status.success());
    assert!(!run_cli(&dir, &["--count", "11"]).status.success());
}

#[test]
fn test_report_on_empty_store() {
    let dir = TempDir::new().unwrap();
    let output = run_cli(&dir, &["report"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No sessions"));
}

#[test]
fn test_report_all_periods_on_empty_store() {
    let dir = TempDir::new().unwrap();
    for flag in ["--today", "--week", "--month", "--year", "--all"] {
        let output = run_cli(&dir, &["report", flag]);
        assert!(output.status.success(), "report {flag} failed");
    }
}

#[test]
fn test_goals_set_requires_a_flag() {
    let dir = TempDir::new().unwrap();
    let output = run_cli(&dir, &["goals", "set"]);
    assert!(!output.status.success());
}

#[test]
fn test_goals_set_and_show() {
    let dir = TempDir::new().unwrap();

    let output = run_cli(&dir, &["goals", "set", "--daily", "8", "--weekly", "40"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("8 pomodoros"));

    let output = run_cli(&dir, &["goals", "show"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("8 pomodoros"));
    assert!(text.contains("40 pomodoros"));
}

#[test]
fn test_goals_show_without_goals() {
    let dir = TempDir::new().unwrap();
    let output = run_cli(&dir, &["goals", "show"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No goals set"));
}

#[test]
fn test_goals_progress_and_clear() {
    let dir = TempDir::new().unwrap();

    run_cli(&dir, &["goals", "set", "--daily", "4"]);
    let output = run_cli(&dir, &["goals", "progress"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Goal Progress"));

    let output = run_cli(&dir, &["goals", "clear"]);
    assert!(output.status.success());

    let output = run_cli(&dir, &["goals", "show"]);
    assert!(stdout(&output).contains("No goals set"));
}

#[test]
fn test_goals_progress_hides_unconfigured_goal() {
    let dir = TempDir::new().unwrap();

    run_cli(&dir, &["goals", "set", "--weekly", "40"]);
    let output = run_cli(&dir, &["goals", "progress", "--daily"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(!text.contains("Daily Goal"));
    assert!(!text.contains("Goal achieved"));
}

#[test]
fn test_analyze_commands_on_empty_store() {
    let dir = TempDir::new().unwrap();
    for args in [
        vec!["analyze", "streak"],
        vec!["analyze", "insights"],
        vec!["analyze", "time", "--month"],
        vec!["analyze", "days", "--all"],
        vec!["analyze", "compare"],
        vec!["analyze", "compare", "--months"],
    ] {
        let output = run_cli(&dir, &args);
        assert!(output.status.success(), "{args:?} failed");
    }
}

#[test]
fn test_analyze_streak_reports_no_streak() {
    let dir = TempDir::new().unwrap();
    let output = run_cli(&dir, &["analyze", "streak"]);
    assert!(stdout(&output).contains("No active streak"));
}
