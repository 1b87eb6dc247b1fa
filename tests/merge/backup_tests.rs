// Tests for the backup archiver

use savesync::config::RunContext;
use savesync::merge::{backup, inventory, Location};
use std::fs;
use std::path::Path;

fn location(root: &Path) -> Location {
    Location::parse(&root.to_string_lossy())
}

fn ctx(dry_run: bool) -> RunContext {
    RunContext {
        dry_run,
        verbose: false,
        policy: Default::default(),
    }
}

#[test]
fn snapshot_contains_every_file_byte_identical() {
    let source = tempfile::tempdir().unwrap();
    let archive = tempfile::tempdir().unwrap();

    fs::create_dir_all(source.path().join("zelda")).unwrap();
    fs::write(source.path().join("zelda").join("slot0.sav"), b"triforce").unwrap();
    fs::write(source.path().join("metroid.sav"), b"varia suit").unwrap();
    fs::write(source.path().join("empty.sav"), b"").unwrap();

    let loc = location(source.path());
    let files = inventory::build(&loc, None).unwrap();
    let stats = backup::snapshot(&files, &loc, archive.path(), "20240101-120000", &ctx(false)).unwrap();

    assert_eq!(stats.files_copied, 3);
    assert_eq!(stats.files_failed, 0);

    for record in files.values() {
        let copied = inventory::native_path(&stats.backup_dir, &record.relative_path);
        assert_eq!(
            fs::read(&copied).unwrap(),
            fs::read(&record.absolute_path).unwrap(),
            "backup of {} must be byte-identical",
            record.relative_path
        );
    }
}

#[test]
fn snapshot_name_derives_from_address_and_stamp() {
    let archive = tempfile::tempdir().unwrap();

    let loc = Location::parse("\\\\deck\\saves");
    let files = Default::default();
    let stats = backup::snapshot(&files, &loc, archive.path(), "20240101-120000", &ctx(true)).unwrap();

    assert_eq!(
        stats.backup_dir,
        archive.path().join("deck_saves-20240101-120000")
    );
}

#[test]
fn dry_run_touches_nothing() {
    let source = tempfile::tempdir().unwrap();
    let archive = tempfile::tempdir().unwrap();
    fs::write(source.path().join("save.dat"), b"data").unwrap();

    let loc = location(source.path());
    let files = inventory::build(&loc, None).unwrap();
    let stats = backup::snapshot(&files, &loc, archive.path(), "20240101-120000", &ctx(true)).unwrap();

    assert_eq!(stats.files_copied, 0);
    assert!(!stats.backup_dir.exists());
    assert!(fs::read_dir(archive.path()).unwrap().next().is_none());
}

#[test]
fn empty_inventory_still_creates_the_snapshot_directory() {
    let source = tempfile::tempdir().unwrap();
    let archive = tempfile::tempdir().unwrap();

    let loc = location(source.path());
    let stats = backup::snapshot(
        &Default::default(),
        &loc,
        archive.path(),
        "20240101-120000",
        &ctx(false),
    )
    .unwrap();

    assert!(stats.backup_dir.is_dir());
    assert_eq!(stats.files_copied, 0);
}

#[test]
fn one_unreadable_file_does_not_abort_the_batch() {
    let source = tempfile::tempdir().unwrap();
    let archive = tempfile::tempdir().unwrap();
    fs::write(source.path().join("good.sav"), b"fine").unwrap();

    let loc = location(source.path());
    let mut files = inventory::build(&loc, None).unwrap();
    // Simulate a file that vanished between scan and backup.
    fs::write(source.path().join("gone.sav"), b"brief").unwrap();
    let gone = inventory::build(&loc, None).unwrap()["gone.sav"].clone();
    fs::remove_file(source.path().join("gone.sav")).unwrap();
    files.insert("gone.sav".to_string(), gone);

    let stats = backup::snapshot(&files, &loc, archive.path(), "20240101-120000", &ctx(false)).unwrap();

    assert_eq!(stats.files_copied, 1);
    assert_eq!(stats.files_failed, 1);
}
