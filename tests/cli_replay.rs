//! Integration test: replay scripts through the hcon binary.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

const ENV_VARS: [&str; 4] = [
    "HISTORICAL_CONSOLE_CONFIG",
    "HISTORICAL_CONSOLE_ADD_CALLER",
    "HISTORICAL_CONSOLE_SNIPPET_LENGTH",
    "HCON_LOG",
];

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("hcon_cli_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("Failed to create scratch dir");
    dir
}

fn hcon(dir: &PathBuf) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_hcon"));
    for var in ENV_VARS {
        command.env_remove(var);
    }
    command
        .arg("--config")
        .arg(dir.join("absent.toml"))
        .arg("--log-file")
        .arg(dir.join("logs").join("hcon.log"));
    command
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "hcon failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn replays_script_file_and_prints_history() {
    let dir = scratch_dir("file");
    let script = dir.join("calls.jsonl");
    std::fs::write(
        &script,
        "[\"count\", \"x\"]\n[\"count\", \"x\"]\n\n[\"log\", \"hi\", 2]\n",
    )
    .unwrap();

    let output = hcon(&dir).arg(&script).output().expect("Failed to run hcon");

    assert_eq!(
        stdout_json(&output),
        serde_json::json!([
            ["count", "x 1", "caller:replay"],
            ["count", "x 2", "caller:replay"],
            ["log", "hi", 2, "caller:replay"]
        ])
    );
    assert!(dir.join("logs").join("hcon.log").exists());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn no_caller_flag_drops_caller_labels() {
    let dir = scratch_dir("no_caller");
    let script = dir.join("calls.jsonl");
    std::fs::write(&script, "[\"assert\", false, \"sum\"]\n").unwrap();

    let output = hcon(&dir)
        .arg("--no-caller")
        .arg(&script)
        .output()
        .expect("Failed to run hcon");

    assert_eq!(
        stdout_json(&output),
        serde_json::json!([["assert", "Assertion failed: sum"]])
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn reads_script_from_piped_stdin() {
    let dir = scratch_dir("stdin");

    let mut child = hcon(&dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn hcon");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(b"[\"warn\", \"careful\"]\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert_eq!(
        stdout_json(&output),
        serde_json::json!([["warn", "careful", "caller:replay"]])
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn malformed_script_fails_with_line_number() {
    let dir = scratch_dir("malformed");
    let script = dir.join("calls.jsonl");
    std::fs::write(&script, "[\"log\", 1]\n[\"shout\"]\n").unwrap();

    let output = hcon(&dir).arg(&script).output().expect("Failed to run hcon");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line: 2"), "stderr: {stderr}");
    assert!(output.stdout.is_empty());

    let _ = std::fs::remove_dir_all(&dir);
}
