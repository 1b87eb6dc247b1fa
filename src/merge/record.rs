//! File records: the per-file metadata the resolver and planner work on.

use super::error::SyncError;
use super::hasher;
use chrono::{DateTime, Utc};
use humansize::{format_size, DECIMAL};
use std::fs::Metadata;
use std::path::PathBuf;

/// One file inside one location's inventory.
///
/// The content hash is lazy: it is only computed once two locations hold the
/// same relative path and equality has to be settled.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Relative path within the location, separators normalized to `/`.
    pub relative_path: String,
    /// Absolute path of the file on disk.
    pub absolute_path: PathBuf,
    /// Last modification time.
    pub modified: DateTime<Utc>,
    /// File length in bytes.
    pub len: u64,
    /// MD5 content hash, computed on demand.
    pub hash: Option<String>,
}

impl FileRecord {
    pub fn new(
        relative_path: impl Into<String>,
        absolute_path: impl Into<PathBuf>,
        modified: DateTime<Utc>,
        len: u64,
    ) -> Self {
        Self {
            relative_path: relative_path.into(),
            absolute_path: absolute_path.into(),
            modified,
            len,
            hash: None,
        }
    }

    /// Build a record from scan metadata.
    pub fn from_metadata(
        relative_path: String,
        absolute_path: PathBuf,
        metadata: &Metadata,
    ) -> Result<Self, SyncError> {
        let modified = metadata
            .modified()
            .map_err(|e| SyncError::from_io_error(e, "reading metadata of", Some(absolute_path.clone())))?;
        Ok(Self {
            relative_path,
            absolute_path,
            modified: DateTime::<Utc>::from(modified),
            len: metadata.len(),
            hash: None,
        })
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    /// Compute and cache the content hash if it is not already known.
    pub fn ensure_hash(&mut self) -> Result<(), SyncError> {
        if self.hash.is_none() {
            self.hash = Some(hasher::hash_file(&self.absolute_path)?);
        }
        Ok(())
    }

    /// One-line description for conflict logs and manual prompts.
    pub fn describe(&self) -> String {
        format!(
            "{} ({}, modified {}, md5 {})",
            self.absolute_path.display(),
            format_size(self.len, DECIMAL),
            self.modified.format("%Y-%m-%d %H:%M:%S"),
            self.hash.as_deref().unwrap_or("-"),
        )
    }
}
