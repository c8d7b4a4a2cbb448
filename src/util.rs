//! Shared file helpers.

use std::fs;
use std::path::Path;

use crate::error::{ExpanseError, Result};

/// Largest catalog or vocabulary file we are willing to load (10 MB).
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Read a file into a string, refusing anything over [`MAX_FILE_SIZE`].
pub fn read_to_string_limited(path: &Path) -> Result<String> {
    read_to_string_with_limit(path, MAX_FILE_SIZE)
}

/// Read a file into a string, refusing anything over `max_size` bytes.
///
/// # Errors
///
/// Returns a storage error if the file is missing or unreadable, and a
/// config error if it exceeds the limit.
pub fn read_to_string_with_limit(path: &Path, max_size: u64) -> Result<String> {
    let size = fs::metadata(path)
        .map_err(|e| ExpanseError::storage(path, e))?
        .len();

    if size > max_size {
        return Err(ExpanseError::config(format!(
            "{} is too large ({} bytes, max {} bytes)",
            path.display(),
            size,
            max_size
        )));
    }

    fs::read_to_string(path).map_err(|e| ExpanseError::storage(path, e))
}
