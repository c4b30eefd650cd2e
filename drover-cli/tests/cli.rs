use assert_cmd::Command;
use predicates::prelude::*;

fn drover() -> Command {
    let mut cmd = Command::cargo_bin("drover").expect("drover binary");
    cmd.env_remove("DROVER_CONFIG")
        .env_remove("DROVER_NO_PROGRESS")
        .env_remove("DROVER_OUTPUT")
        .env_remove("DROVER_PROGRESS_EVENTS")
        .env_remove("RUST_LOG");
    cmd
}

fn json_lines(raw: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(raw)
        .lines()
        .filter(|l| l.starts_with('{'))
        .map(|l| serde_json::from_str(l).expect("valid JSON line"))
        .collect()
}

#[test]
fn json_output_without_streaming_keeps_stderr_clean() {
    let output = drover()
        .args(["--output", "json", "demo", "--items", "5", "--item-ms", "1"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(output.stderr.is_empty(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let results = json_lines(&output.stdout);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["items"], 5);
    assert_eq!(results[0]["renderer"], "noop");
}

#[test]
fn json_streaming_writes_events_to_stderr() {
    let output = drover()
        .args([
            "--output",
            "json",
            "--progress-events",
            "--progress-throttle-ms",
            "0",
            "demo",
            "--items",
            "4",
            "--item-ms",
            "1",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let events = json_lines(&output.stderr);
    assert_eq!(events.first().unwrap()["type"], "progress_start");
    assert_eq!(events.last().unwrap()["type"], "progress_end");
    assert!(events.last().unwrap()["duration_ms"].is_u64());
    assert_eq!(events.len(), 6);

    let results = json_lines(&output.stdout);
    assert_eq!(results[0]["renderer"], "json-stream");
}

#[test]
fn piped_text_uses_line_log() {
    drover()
        .args(["demo", "--items", "10", "--item-ms", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("with the log renderer"))
        .stderr(predicate::str::contains("[progress] Processing items: started"))
        .stderr(predicate::str::contains("[progress] item 5/10: 50%"))
        .stderr(predicate::str::contains("done in"));
}

#[test]
fn env_disables_progress() {
    drover()
        .env("DROVER_NO_PROGRESS", "1")
        .args(["demo", "--items", "3", "--item-ms", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("noop"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn env_enables_event_stream() {
    let output = drover()
        .env("DROVER_OUTPUT", "json")
        .env("DROVER_PROGRESS_EVENTS", "1")
        .args(["demo", "--items", "2", "--item-ms", "1"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let events = json_lines(&output.stderr);
    assert_eq!(events.first().unwrap()["type"], "progress_start");
    assert_eq!(events.last().unwrap()["type"], "progress_end");
    assert_eq!(json_lines(&output.stdout)[0]["renderer"], "json-stream");
}

#[test]
fn env_switches_accept_false() {
    drover()
        .env("DROVER_NO_PROGRESS", "0")
        .args(["demo", "--items", "2", "--item-ms", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("with the log renderer"));
}

#[test]
fn restore_without_estimate_spins() {
    drover()
        .args(["restore", "--database", "orders", "--work-secs", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Database orders restored in 0s"))
        .stderr(predicate::str::contains("[progress] Restoring orders: started"))
        .stderr(predicate::str::contains("[progress] Restoring orders: done in"));
}

#[test]
fn restore_reports_json_result() {
    let output = drover()
        .args(["--output", "json", "restore", "--work-secs", "0"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let results = json_lines(&output.stdout);
    assert_eq!(results[0]["database"], "main");
    assert_eq!(results[0]["status"], "restored");
}

#[test]
fn unknown_output_format_is_rejected() {
    drover()
        .args(["--output", "yaml", "demo"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn config_file_is_honoured() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drover.toml");
    std::fs::write(&path, "[progress]\ndisabled = true\n").unwrap();

    drover()
        .arg("--config")
        .arg(&path)
        .args(["demo", "--items", "2", "--item-ms", "1"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}
