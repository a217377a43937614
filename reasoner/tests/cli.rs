//! CLI tests for `reasoner init` and `reasoner show`.
//!
//! Spawns the reasoner binary and verifies written files, printed outlines
//! and exit codes.

use std::fs;
use std::process::Command;

use reasoner::core::navigator::Navigator;
use reasoner::exit_codes;
use reasoner::io::config::{CONFIG_FILE, ReasonerConfig, load_config};
use reasoner::io::session::Session;
use reasoner::io::snapshot::write_snapshot;
use reasoner::test_support::branching_navigator;

fn reasoner() -> Command {
    Command::new(env!("CARGO_BIN_EXE_reasoner"))
}

#[test]
fn init_writes_default_config() {
    let temp = tempfile::tempdir().expect("tempdir");

    let status = reasoner()
        .current_dir(temp.path())
        .arg("init")
        .status()
        .expect("reasoner init");

    assert_eq!(status.code(), Some(exit_codes::OK));
    let cfg = load_config(&temp.path().join(CONFIG_FILE)).expect("load config");
    assert_eq!(cfg, ReasonerConfig::default());
}

#[test]
fn init_keeps_existing_config_without_force() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join(CONFIG_FILE);
    fs::write(&path, "max_iterations = 7\n").expect("write config");

    let status = reasoner()
        .current_dir(temp.path())
        .arg("init")
        .status()
        .expect("reasoner init");

    assert_eq!(status.code(), Some(exit_codes::OK));
    assert_eq!(
        fs::read_to_string(&path).expect("read config"),
        "max_iterations = 7\n"
    );
}

#[test]
fn show_prints_outline_of_latest_snapshot() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("tree_snapshots");
    let session = Session::create(&root, Some("demo")).expect("session");
    write_snapshot(&session.snapshot_path(0), &Navigator::new().render()).expect("0.json");
    let nav = branching_navigator();
    write_snapshot(&session.snapshot_path(nav.size()), &nav.render()).expect("3.json");

    let output = reasoner()
        .current_dir(temp.path())
        .args(["show", "demo", "--root"])
        .arg(&root)
        .output()
        .expect("reasoner show");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim_end(),
        "-*0: (root)\n  - 1: a\n    - 2: b\n  -*3: c"
    );
}

#[test]
fn show_without_snapshots_fails() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("tree_snapshots");
    Session::create(&root, Some("empty")).expect("session");

    let output = reasoner()
        .current_dir(temp.path())
        .args(["show", "empty", "--root"])
        .arg(&root)
        .output()
        .expect("reasoner show");

    assert_eq!(output.status.code(), Some(exit_codes::ERROR));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no snapshots"));
}

#[test]
fn run_refuses_session_with_leftover_artifacts() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path().join("tree_snapshots/old");
    fs::create_dir_all(&dir).expect("session dir");
    fs::write(dir.join("9.json"), "{}").expect("leftover snapshot");

    let output = reasoner()
        .current_dir(temp.path())
        .args(["run", "task", "--session", "old"])
        .output()
        .expect("reasoner run");

    assert_eq!(output.status.code(), Some(exit_codes::ERROR));
    assert!(String::from_utf8_lossy(&output.stderr).contains("already exists"));
    assert!(!dir.join("actions.log").exists());
}
