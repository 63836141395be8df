//! In-memory file system adapter.
//!
//! Used by tests and by hosts that want a throwaway workspace. Clones share
//! the same storage.

use crate::error::{Policy360Error, Result};
use crate::tools::fs::FsAdapter;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// In-memory file system adapter.
///
/// # Examples
///
/// ```
/// use policy360_core::tools::{FsAdapter, MockFsAdapter};
/// use std::path::Path;
///
/// let fs = MockFsAdapter::new();
/// fs.write(Path::new("/ws/state.toml"), "active_index = 1").unwrap();
/// assert!(fs.exists(Path::new("/ws")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockFsAdapter {
    files: Arc<Mutex<HashMap<PathBuf, String>>>,
    dirs: Arc<Mutex<BTreeSet<PathBuf>>>,
}

impl MockFsAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates the mock with files.
    pub fn with_files(files: HashMap<PathBuf, String>) -> Self {
        let mock = Self::new();
        for path in files.keys() {
            mock.register_parents(path);
        }
        *mock.files() = files;
        mock
    }

    /// Returns a copy of every stored file.
    pub fn get_all_files(&self) -> HashMap<PathBuf, String> {
        self.files().clone()
    }

    fn files(&self) -> MutexGuard<'_, HashMap<PathBuf, String>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dirs(&self) -> MutexGuard<'_, BTreeSet<PathBuf>> {
        self.dirs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn register_parents(&self, path: &Path) {
        let mut dirs = self.dirs();
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() || ancestor == Path::new("/") {
                break;
            }
            dirs.insert(ancestor.to_path_buf());
        }
    }
}

impl FsAdapter for MockFsAdapter {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.files()
            .get(path)
            .cloned()
            .ok_or_else(|| Policy360Error::PathNotFound(path.to_path_buf()))
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        if self.dirs().contains(path) {
            return Err(Policy360Error::FileWriteError(format!(
                "{}: is a directory",
                path.display()
            )));
        }
        self.register_parents(path);
        self.files().insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.files().remove(path);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files().contains_key(path) || self.dirs().contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.register_parents(path);
        self.dirs().insert(path.to_path_buf());
        Ok(())
    }
}
