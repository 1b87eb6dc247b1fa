// Tests for the sync executor

use savesync::config::RunContext;
use savesync::merge::executor;
use savesync::merge::planner::{ActionReason, SyncAction};
use std::fs;
use std::path::Path;

fn ctx(dry_run: bool) -> RunContext {
    RunContext {
        dry_run,
        verbose: false,
        policy: Default::default(),
    }
}

fn action(source: &Path, target: &Path, reason: ActionReason) -> SyncAction {
    SyncAction {
        source: source.to_path_buf(),
        target: target.to_path_buf(),
        relative_path: target.file_name().unwrap().to_string_lossy().into_owned(),
        reason,
        target_host: None,
    }
}

#[test]
fn empty_plan_is_a_noop() {
    let stats = executor::execute(&[], &ctx(false));
    assert_eq!(stats.succeeded, 0);
    assert_eq!(stats.failed, 0);
}

#[test]
fn copies_and_creates_intermediate_directories() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("save.dat");
    fs::write(&source, b"payload").unwrap();
    let target = dir.path().join("deep").join("nested").join("save.dat");

    let stats = executor::execute(
        &[action(&source, &target, ActionReason::TargetMissing)],
        &ctx(false),
    );

    assert_eq!(stats.succeeded, 1);
    assert_eq!(stats.failed, 0);
    assert_eq!(fs::read(&target).unwrap(), b"payload");
}

#[test]
fn overwrites_an_existing_stale_target() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("new.dat");
    let target = dir.path().join("old.dat");
    fs::write(&source, b"fresh").unwrap();
    fs::write(&target, b"stale").unwrap();

    let stats = executor::execute(
        &[action(&source, &target, ActionReason::TargetStale)],
        &ctx(false),
    );

    assert_eq!(stats.succeeded, 1);
    assert_eq!(fs::read(&target).unwrap(), b"fresh");
}

#[test]
fn dry_run_counts_without_copying() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("save.dat");
    fs::write(&source, b"payload").unwrap();
    let target = dir.path().join("copy.dat");

    let stats = executor::execute(
        &[action(&source, &target, ActionReason::TargetMissing)],
        &ctx(true),
    );

    assert_eq!(stats.succeeded, 1);
    assert!(!target.exists());
}

#[test]
fn one_failed_action_does_not_stop_the_queue() {
    let dir = tempfile::tempdir().unwrap();
    let missing_source = dir.path().join("vanished.dat");
    let good_source = dir.path().join("good.dat");
    fs::write(&good_source, b"ok").unwrap();

    let actions = vec![
        action(&missing_source, &dir.path().join("a.dat"), ActionReason::TargetMissing),
        action(&good_source, &dir.path().join("b.dat"), ActionReason::TargetMissing),
    ];

    let stats = executor::execute(&actions, &ctx(false));

    assert_eq!(stats.failed, 1);
    assert_eq!(stats.succeeded, 1);
    assert_eq!(fs::read(dir.path().join("b.dat")).unwrap(), b"ok");
}
