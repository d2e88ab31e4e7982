use std::process::Command;

use tempfile::TempDir;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_daybook"))
}

fn daily(home: &std::path::Path, task_type: &str, data: Option<&str>) -> String {
    let mut command = bin();
    command.arg("--home").arg(home).arg("daily").arg(task_type);
    if let Some(data) = data {
        command.arg(data);
    }
    let output = command.output().expect("run daybook");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    String::from_utf8(output.stdout).expect("utf8").trim_end().to_string()
}

#[test]
fn schedule_add_then_show() {
    let temp = TempDir::new().expect("tempdir");
    assert_eq!(
        daily(temp.path(), "schedule", None),
        "No tasks scheduled for today"
    );

    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let added = daily(
        temp.path(),
        "schedule",
        Some(r#"{"action": "add", "title": "Water plants", "time": "07:15"}"#),
    );
    assert_eq!(
        added,
        format!("Task 'Water plants' scheduled for 07:15 on {today}")
    );

    assert_eq!(
        daily(temp.path(), "schedule", None),
        "Today's Schedule:\n○ 07:15 - Water plants"
    );

    let raw = std::fs::read_to_string(temp.path().join("schedule.json")).expect("schedule.json");
    let doc: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(doc["tasks"][0]["id"], "1");
    assert_eq!(doc["tasks"][0]["completed"], false);
}

#[test]
fn notes_accept_plain_text() {
    let temp = TempDir::new().expect("tempdir");
    assert_eq!(
        daily(temp.path(), "note", Some("pick up dry cleaning")),
        "Note saved successfully"
    );
    let shown = daily(temp.path(), "note", None);
    assert!(shown.starts_with("Recent Notes:\n["), "{shown}");
    assert!(shown.ends_with("] pick up dry cleaning..."), "{shown}");
}

#[test]
fn unknown_task_type_prints_usage_hint() {
    let temp = TempDir::new().expect("tempdir");
    assert_eq!(
        daily(temp.path(), "weather", None),
        "Unknown task type: weather. Available: schedule, reminder, note, habit, focus, summary"
    );
}

#[test]
fn version_prints_package_version() {
    let output = bin().arg("version").output().expect("run daybook");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert_eq!(stdout.trim(), format!("daybook {}", env!("CARGO_PKG_VERSION")));
}
