//! File system adapter trait.

use crate::error::Result;
use std::path::Path;

/// File system adapter trait.
///
/// Defines the small set of file operations Policy360 needs for its workspace
/// directory. Implementations can be real (using `std::fs`) or in-memory.
pub trait FsAdapter: Send + Sync {
    /// Reads the contents of a file as a string.
    ///
    /// # Errors
    ///
    /// Returns `Policy360Error::PathNotFound` if the file doesn't exist and
    /// `Policy360Error::FileReadError` if reading fails.
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Writes a string to a file, creating it and any missing parent
    /// directories.
    ///
    /// # Errors
    ///
    /// Returns `Policy360Error::FileWriteError` if writing fails or
    /// `Policy360Error::PermissionDenied` if lacking write permissions.
    fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// Removes a file. Removing a missing file is not an error.
    fn remove_file(&self, path: &Path) -> Result<()>;

    /// Checks if a path exists (file or directory).
    fn exists(&self, path: &Path) -> bool;

    /// Creates a directory and all missing parent directories.
    fn create_dir_all(&self, path: &Path) -> Result<()>;
}
