// Inventory building: recursive scan of one location into a path-keyed map
// BTreeMap keys give the planner a deterministic iteration order.

use super::error::SyncError;
use super::location::Location;
use super::record::FileRecord;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

// Cycle insurance for junction/symlink loops the type checks miss.
const MAX_DEPTH: usize = 64;

/// Scan a location recursively into a map of relative path to [`FileRecord`].
///
/// Regular files only; symlinks and special files are skipped. `exclude`
/// names a subtree (the archive root) left out of the scan so backups never
/// feed back into inventories.
pub fn build(
    location: &Location,
    exclude: Option<&Path>,
) -> Result<BTreeMap<String, FileRecord>, SyncError> {
    let mut files = BTreeMap::new();
    let exclude = exclude.map(|p| p.canonicalize().unwrap_or_else(|_| p.to_path_buf()));
    collect_recursive(&location.root, &location.root, exclude.as_deref(), 0, &mut files)?;
    Ok(files)
}

fn collect_recursive(
    root: &Path,
    dir: &Path,
    exclude: Option<&Path>,
    depth: usize,
    files: &mut BTreeMap<String, FileRecord>,
) -> Result<(), SyncError> {
    if depth > MAX_DEPTH {
        return Ok(());
    }

    let entries = fs::read_dir(dir)
        .map_err(|e| SyncError::from_io_error(e, "scanning directory", Some(dir.to_path_buf())))?;

    for entry_result in entries {
        let entry = entry_result
            .map_err(|e| SyncError::from_io_error(e, "scanning directory", Some(dir.to_path_buf())))?;
        let path = entry.path();

        if let Some(exclude) = exclude {
            let matches = path == exclude
                || path
                    .canonicalize()
                    .map(|canonical| canonical == exclude)
                    .unwrap_or(false);
            if matches {
                continue;
            }
        }

        // DirEntry::metadata does not traverse symlinks, so links report as
        // neither file nor directory and fall through both branches below.
        let metadata = entry.metadata().map_err(|e| {
            SyncError::from_io_error(e, "reading metadata of", Some(path.clone()))
        })?;

        if metadata.is_file() {
            if let Some(key) = relative_key(root, &path) {
                let record = FileRecord::from_metadata(key.clone(), path, &metadata)?;
                files.insert(key, record);
            }
        } else if metadata.is_dir() {
            collect_recursive(root, &path, exclude, depth + 1, files)?;
        }
    }

    Ok(())
}

/// Relative path of `path` under `root`, separators normalized to `/`,
/// so the same logical file compares equal across differently-spelled roots.
pub fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Rebuild a native path from a normalized relative key.
pub fn native_path(root: &Path, relative: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for part in relative.split('/') {
        path.push(part);
    }
    path
}
