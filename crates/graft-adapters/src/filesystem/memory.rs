//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeSet, HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use graft_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, WalkEntry},
    },
    error::GraftResult,
};

/// In-memory filesystem for testing.
///
/// Supports failure injection through [`MemoryFilesystem::deny_read`] and
/// [`MemoryFilesystem::deny_write`].
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: HashMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    executables: HashSet<PathBuf>,
    unreadable: HashSet<PathBuf>,
    unwritable: HashSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn insert_dirs(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn parent_exists(&self, path: &Path) -> bool {
        match path.parent() {
            Some(parent) => parent.as_os_str().is_empty() || self.directories.contains(parent),
            None => true,
        }
    }
}

fn fs_error(path: &Path, reason: &str) -> ApplicationError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Add a file, creating its parent directories (testing helper).
    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) -> &Self {
        let path = path.as_ref();
        if let Ok(mut inner) = self.inner.write() {
            if let Some(parent) = path.parent() {
                inner.insert_dirs(parent);
            }
            inner.files.insert(path.to_path_buf(), content.to_string());
        }
        self
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// Mark a file executable (testing helper).
    pub fn set_executable(&self, path: &Path) {
        if let Ok(mut inner) = self.inner.write() {
            inner.executables.insert(path.to_path_buf());
        }
    }

    /// Check if a file is marked executable.
    pub fn is_executable(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.executables.contains(path))
            .unwrap_or(false)
    }

    /// Make every read of `path` fail.
    pub fn deny_read(&self, path: &Path) {
        if let Ok(mut inner) = self.inner.write() {
            inner.unreadable.insert(path.to_path_buf());
        }
    }

    /// Make every write to `path` fail.
    pub fn deny_write(&self, path: &Path) {
        if let Ok(mut inner) = self.inner.write() {
            inner.unwritable.insert(path.to_path_buf());
        }
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn create_dir_all(&self, path: &Path) -> GraftResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.insert_dirs(path);
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> GraftResult<String> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if inner.unreadable.contains(path) {
            return Err(fs_error(path, "Failed to read file: permission denied").into());
        }
        inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| fs_error(path, "Failed to read file: not found").into())
    }

    fn write_file(&self, path: &Path, content: &str) -> GraftResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if inner.unwritable.contains(path) {
            return Err(fs_error(path, "Failed to write file: permission denied").into());
        }
        if !inner.parent_exists(path) {
            return Err(fs_error(path, "Parent directory does not exist").into());
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> GraftResult<()> {
        let content = self.read_to_string(from)?;
        self.write_file(to, &content)?;

        if self.is_executable(from) {
            self.set_executable(to);
        }
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> GraftResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if !inner.directories.contains(path) {
            return Err(fs_error(path, "Failed to remove directory: not found").into());
        }

        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        inner.executables.retain(|p| !p.starts_with(path));

        Ok(())
    }

    fn remove_file(&self, path: &Path) -> GraftResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if inner.files.remove(path).is_none() {
            return Err(fs_error(path, "Failed to remove file: not found").into());
        }
        inner.executables.remove(path);
        Ok(())
    }

    fn walk(&self, root: &Path, prune: &dyn Fn(&str) -> bool) -> GraftResult<Vec<WalkEntry>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if !inner.directories.contains(root) {
            return Err(fs_error(root, "Failed to walk: not a directory").into());
        }

        let mut entries: Vec<WalkEntry> = inner
            .directories
            .iter()
            .map(|p| (p, true))
            .chain(inner.files.keys().map(|p| (p, false)))
            .filter(|(path, _)| path.starts_with(root) && path.as_path() != root)
            .filter_map(|(path, is_dir)| {
                let relative = path.strip_prefix(root).ok()?;
                let mut ancestors: Vec<_> = relative.components().collect();
                ancestors.pop();
                let pruned = ancestors
                    .iter()
                    .any(|c| prune(&c.as_os_str().to_string_lossy()));

                (!pruned).then(|| WalkEntry {
                    path: path.clone(),
                    relative: relative.to_path_buf(),
                    is_dir,
                })
            })
            .collect();

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }
}
