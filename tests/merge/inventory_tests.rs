// Tests for inventory building and path normalization

use savesync::merge::{inventory, Location};
use std::fs;
use std::path::Path;

fn location(root: &Path) -> Location {
    Location::parse(&root.to_string_lossy())
}

#[test]
fn nested_scan_uses_forward_slash_keys() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("saves").join("slot1")).unwrap();
    fs::write(dir.path().join("config.ini"), b"x").unwrap();
    fs::write(dir.path().join("saves").join("slot1").join("game.sav"), b"abc").unwrap();

    let files = inventory::build(&location(dir.path()), None).unwrap();

    assert_eq!(files.len(), 2);
    assert!(files.contains_key("config.ini"));
    let record = &files["saves/slot1/game.sav"];
    assert_eq!(record.len, 3);
    assert_eq!(record.relative_path, "saves/slot1/game.sav");
    assert!(record.hash.is_none(), "hashes must stay lazy during the scan");
}

#[test]
fn empty_directory_yields_empty_inventory() {
    let dir = tempfile::tempdir().unwrap();
    let files = inventory::build(&location(dir.path()), None).unwrap();
    assert!(files.is_empty());
}

#[test]
fn missing_root_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let gone = dir.path().join("nope");
    assert!(inventory::build(&location(&gone), None).is_err());
}

#[test]
fn archive_subtree_is_excluded_from_the_scan() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("game.sav"), b"abc").unwrap();
    let archive = dir.path().join("backups");
    fs::create_dir_all(archive.join("old")).unwrap();
    fs::write(archive.join("old").join("game.sav"), b"abc").unwrap();

    let files = inventory::build(&location(dir.path()), Some(&archive)).unwrap();

    assert_eq!(files.len(), 1);
    assert!(files.contains_key("game.sav"));
}

#[cfg(unix)]
#[test]
fn symlinks_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("real.sav"), b"abc").unwrap();
    std::os::unix::fs::symlink(dir.path().join("real.sav"), dir.path().join("link.sav")).unwrap();
    // Directory symlink pointing back up: must not recurse into it.
    std::os::unix::fs::symlink(dir.path(), dir.path().join("loop")).unwrap();

    let files = inventory::build(&location(dir.path()), None).unwrap();

    assert_eq!(files.len(), 1);
    assert!(files.contains_key("real.sav"));
}

#[test]
fn native_path_rebuilds_from_normalized_key() {
    let root = Path::new("root");
    assert_eq!(
        inventory::native_path(root, "a/b/c.sav"),
        root.join("a").join("b").join("c.sav")
    );
}
