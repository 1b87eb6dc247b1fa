// Centralized error handling for the merge engine
// Provides context-rich error types for all location and file operations

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Main error type for the merge engine
/// Carries file paths and the operation that failed
#[derive(Debug)]
pub enum SyncError {
    /// Location errors
    LocationUnreachable { address: String, reason: String },
    NoLocationsReachable,

    /// File system errors with context
    FileNotFound { path: PathBuf },
    DirectoryNotFound { path: PathBuf },
    PermissionDenied { path: PathBuf, operation: String },
    IoError { path: Option<PathBuf>, operation: String, source: io::Error },

    /// Content hashing errors
    HashFailed { path: PathBuf, reason: String },
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            // Location errors
            SyncError::LocationUnreachable { address, reason } => {
                write!(f, "Location unreachable: {} ({})\n", address, reason)?;
                write!(f, "Suggestion: Check that the host is powered on and the share is exported")
            }
            SyncError::NoLocationsReachable => {
                write!(f, "None of the configured locations are reachable\n")?;
                write!(f, "Suggestion: Check the network and the configured location addresses")
            }

            // File system errors
            SyncError::FileNotFound { path } => {
                write!(f, "File not found: {}\n", path.display())?;
                write!(f, "Suggestion: Check that the file path is correct and the file exists")
            }
            SyncError::DirectoryNotFound { path } => {
                write!(f, "Directory not found: {}\n", path.display())?;
                write!(f, "Suggestion: Check that the directory path is correct and the directory exists")
            }
            SyncError::PermissionDenied { path, operation } => {
                write!(f, "Permission denied while {} {}\n", operation, path.display())?;
                write!(f, "Suggestion: Check file permissions or run with appropriate privileges")
            }
            SyncError::IoError { path, operation, source } => {
                if let Some(p) = path {
                    write!(f, "I/O error while {} {}: {}\n", operation, p.display(), source)?;
                } else {
                    write!(f, "I/O error while {}: {}\n", operation, source)?;
                }
                write!(f, "Suggestion: Check file permissions and disk space")
            }

            // Hashing errors
            SyncError::HashFailed { path, reason } => {
                write!(f, "Failed to hash {}: {}\n", path.display(), reason)?;
                write!(f, "Suggestion: Check that the file is readable and not locked by another process")
            }
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::IoError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl SyncError {
    /// Create an IoError with context about the operation and optional path
    pub fn from_io_error(err: io::Error, operation: &str, path: Option<PathBuf>) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => {
                if let Some(p) = path {
                    if operation.contains("directory") || operation.contains("scanning") {
                        SyncError::DirectoryNotFound { path: p }
                    } else {
                        SyncError::FileNotFound { path: p }
                    }
                } else {
                    SyncError::IoError {
                        path: None,
                        operation: operation.to_string(),
                        source: err,
                    }
                }
            }
            io::ErrorKind::PermissionDenied => {
                if let Some(p) = path {
                    SyncError::PermissionDenied {
                        path: p,
                        operation: operation.to_string(),
                    }
                } else {
                    SyncError::IoError {
                        path: None,
                        operation: operation.to_string(),
                        source: err,
                    }
                }
            }
            _ => SyncError::IoError {
                path,
                operation: operation.to_string(),
                source: err,
            },
        }
    }
}

// Default From implementation for io::Error (without context)
impl From<io::Error> for SyncError {
    fn from(err: io::Error) -> Self {
        SyncError::from_io_error(err, "unknown operation", None)
    }
}
