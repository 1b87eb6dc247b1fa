// MD5 content hashing for equality checks
// MD5 is fine here: the hash is a content-identity test, not a security control.

use super::error::SyncError;
use md5::{Digest, Md5};
use memmap2::Mmap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

// Save files are usually small; map anything under this and stream the rest.
const MMAP_THRESHOLD: u64 = 64 * 1024 * 1024; // 64MB
const BUFFER_SIZE: usize = 1024 * 1024; // 1MB

/// Compute the MD5 hex digest of a file's full contents.
///
/// Files below the mmap threshold are memory mapped to avoid the
/// kernel-to-userspace copy; larger files are read through a 1MB buffer.
pub fn hash_file(path: &Path) -> Result<String, SyncError> {
    let file = File::open(path)
        .map_err(|e| SyncError::from_io_error(e, "reading", Some(path.to_path_buf())))?;

    let file_size = file
        .metadata()
        .map_err(|e| SyncError::from_io_error(e, "reading metadata of", Some(path.to_path_buf())))?
        .len();

    let mut hasher = Md5::new();

    if file_size > 0 && file_size < MMAP_THRESHOLD {
        match unsafe { Mmap::map(&file) } {
            Ok(mmap) => hasher.update(&mmap[..]),
            Err(_) => {
                // Fall back to buffered reading if mmap fails
                hash_with_buffered_io(&mut hasher, file, path)?;
            }
        }
    } else {
        hash_with_buffered_io(&mut hasher, file, path)?;
    }

    Ok(bytes_to_hex(hasher.finalize().as_slice()))
}

fn hash_with_buffered_io(hasher: &mut Md5, mut file: File, path: &Path) -> Result<(), SyncError> {
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = file
            .read(&mut buffer)
            .map_err(|e| SyncError::from_io_error(e, "reading", Some(path.to_path_buf())))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(())
}

/// Convert bytes to hexadecimal string
fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}
