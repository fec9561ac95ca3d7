//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `graft-adapters` crate provides implementations.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use crate::domain::{CacheEntry, Credential, TemplateDescriptor, TemplateKey};
use crate::error::GraftResult;

/// One entry produced by [`Filesystem::walk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Full path of the entry.
    pub path: PathBuf,
    /// Path relative to the walk root.
    pub relative: PathBuf,
    pub is_dir: bool,
}

impl WalkEntry {
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `graft_adapters::filesystem::LocalFilesystem` (production)
/// - `graft_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> GraftResult<()>;

    /// Read a UTF-8 file.
    fn read_to_string(&self, path: &Path) -> GraftResult<String>;

    /// Overwrite an existing file, keeping its permissions; creates it otherwise.
    fn write_file(&self, path: &Path, content: &str) -> GraftResult<()>;

    /// Copy a file's bytes and permission bits. The parent of `to` must exist.
    fn copy_file(&self, from: &Path, to: &Path) -> GraftResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> GraftResult<()>;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> GraftResult<()>;

    /// Depth-first walk below `root` (the root itself is not yielded).
    ///
    /// Directories for which `prune` returns `true` are yielded but never
    /// descended into. Any unreadable directory aborts the walk.
    fn walk(&self, root: &Path, prune: &dyn Fn(&str) -> bool) -> GraftResult<Vec<WalkEntry>>;
}

/// Port for template freshness bookkeeping.
///
/// Implemented by:
/// - `graft_adapters::cache_store::JsonCacheStore` (single JSON document)
#[cfg_attr(test, mockall::automock)]
pub trait CacheStore: Send + Sync {
    /// Whether `key` has an entry younger than the TTL at `now`.
    ///
    /// Never fails: unreadable bookkeeping counts as "no entry".
    fn is_fresh_at(&self, key: &TemplateKey, now: DateTime<Utc>) -> bool;

    /// [`Self::is_fresh_at`] against the wall clock.
    fn is_fresh(&self, key: &TemplateKey) -> bool {
        self.is_fresh_at(key, Utc::now())
    }

    /// The recorded entry for `key`, if any.
    fn entry(&self, key: &TemplateKey) -> Option<CacheEntry>;

    /// Record a successful fetch of `key` now.
    fn touch(&self, key: &TemplateKey) -> GraftResult<CacheEntry>;

    /// Drop the entry and its storage directory.
    fn invalidate(&self, key: &TemplateKey) -> GraftResult<()>;

    /// Drop every entry and storage directory.
    fn invalidate_all(&self) -> GraftResult<()>;

    /// Storage directory for `key`; deterministic.
    fn storage_path(&self, key: &TemplateKey) -> PathBuf;
}

/// Port for retrieving template repositories.
///
/// Implemented by:
/// - `graft_adapters::fetcher::GitFetcher` (`git` subprocess)
#[cfg_attr(test, mockall::automock)]
pub trait RepositoryFetcher: Send + Sync {
    /// Update an existing checkout in `dir` in place.
    fn refresh(
        &self,
        descriptor: &TemplateDescriptor,
        dir: &Path,
        credential: Option<Credential>,
    ) -> GraftResult<()>;

    /// Shallow clone the descriptor's ref into `dir`, which must not exist.
    fn shallow_clone(
        &self,
        descriptor: &TemplateDescriptor,
        dir: &Path,
        credential: Option<Credential>,
    ) -> GraftResult<()>;
}
