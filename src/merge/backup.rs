//! Backup archiving: a full snapshot of one location's inventory before any
//! mutation. Write-once; nothing in this tool ever reads a snapshot back.

use super::error::SyncError;
use super::inventory;
use super::location::Location;
use super::record::FileRecord;
use crate::config::RunContext;
use crate::console;
use humansize::{format_size, DECIMAL};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// What one snapshot did.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BackupStats {
    pub location: String,
    pub backup_dir: PathBuf,
    pub files_copied: usize,
    pub files_failed: usize,
    pub bytes_copied: u64,
}

/// Snapshot one inventory under the archive root.
///
/// The directory name is the sanitized location address plus the run stamp,
/// so two source locations never collide; re-runs within the same second
/// last-write-win, which is accepted. An empty inventory still creates the
/// directory so the archive trail shows the location took part in the run.
///
/// Per-file copy failures are warned and counted, never fatal. Dry-run
/// computes and returns the intended path without touching the filesystem.
pub fn snapshot(
    inventory: &BTreeMap<String, FileRecord>,
    location: &Location,
    archive_root: &Path,
    run_stamp: &str,
    ctx: &RunContext,
) -> Result<BackupStats, SyncError> {
    let backup_dir = archive_root.join(format!("{}-{}", location.sanitized_name(), run_stamp));
    let mut stats = BackupStats {
        location: location.address.clone(),
        backup_dir: backup_dir.clone(),
        files_copied: 0,
        files_failed: 0,
        bytes_copied: 0,
    };

    if ctx.dry_run {
        console::info(format!(
            "dry-run: would back up {} files from {} to {}",
            inventory.len(),
            location.address,
            backup_dir.display()
        ));
        return Ok(stats);
    }

    fs::create_dir_all(&backup_dir).map_err(|e| {
        SyncError::from_io_error(e, "creating backup directory", Some(backup_dir.clone()))
    })?;

    let pb = ProgressBar::new(inventory.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files | backing up {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );
    pb.set_message(location.address.clone());

    for record in inventory.values() {
        let target = inventory::native_path(&backup_dir, &record.relative_path);

        if let Some(parent) = target.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                console::warn(format!(
                    "backup of {} failed: cannot create {}: {}",
                    record.absolute_path.display(),
                    parent.display(),
                    err
                ));
                stats.files_failed += 1;
                pb.inc(1);
                continue;
            }
        }

        match fs::copy(&record.absolute_path, &target) {
            Ok(bytes) => {
                stats.files_copied += 1;
                stats.bytes_copied += bytes;
            }
            Err(err) => {
                console::warn(format!(
                    "backup of {} failed: {}",
                    record.absolute_path.display(),
                    err
                ));
                stats.files_failed += 1;
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    console::status(
        "backup",
        format!(
            "{} -> {} ({} files, {})",
            location.address,
            stats.backup_dir.display(),
            stats.files_copied,
            format_size(stats.bytes_copied, DECIMAL)
        ),
    );

    Ok(stats)
}
