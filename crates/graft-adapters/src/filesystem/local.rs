//! Local filesystem adapter using std::fs and walkdir.

use std::io;
use std::path::Path;

use walkdir::WalkDir;

use graft_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, WalkEntry},
    },
    error::{GraftError, GraftResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> GraftResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn read_to_string(&self, path: &Path) -> GraftResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write_file(&self, path: &Path, content: &str) -> GraftResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> GraftResult<()> {
        // std::fs::copy carries the permission bits over.
        std::fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| map_io_error(from, e, &format!("copy to {}", to.display())))
    }

    fn remove_dir_all(&self, path: &Path) -> GraftResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }

    fn remove_file(&self, path: &Path) -> GraftResult<()> {
        std::fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn walk(&self, root: &Path, prune: &dyn Fn(&str) -> bool) -> GraftResult<Vec<WalkEntry>> {
        if !root.is_dir() {
            return Err(ApplicationError::FilesystemError {
                path: root.to_path_buf(),
                reason: "Failed to walk: not a directory".into(),
            }
            .into());
        }

        let mut entries = Vec::new();
        let mut walker = WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                GraftError::from(ApplicationError::FilesystemError {
                    path,
                    reason: format!("Failed to walk: {e}"),
                })
            })?;

            let is_dir = entry.file_type().is_dir();
            if is_dir && prune(&entry.file_name().to_string_lossy()) {
                walker.skip_current_dir();
            }

            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .to_path_buf();

            entries.push(WalkEntry {
                path: entry.path().to_path_buf(),
                relative,
                is_dir,
            });
        }

        Ok(entries)
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> GraftError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
