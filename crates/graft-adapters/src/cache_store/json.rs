//! Cache store backed by a single JSON metadata document.
//!
//! Layout under the cache root:
//!
//! ```text
//! <root>/
//!   cache-metadata.json      {"templates": {"<key>": {cached_at, last_checked, path}}}
//!   <key>/                   cached template tree
//! ```
//!
//! The document is read on every query and rewritten whole on every mutation.
//! There is no locking; one writer at a time is assumed.

use chrono::{DateTime, Duration, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use graft_core::{
    application::{ApplicationError, ports::CacheStore},
    domain::{CacheEntry, CacheMetadata, TemplateKey, storage_path},
    error::{GraftError, GraftResult},
};

/// File name of the metadata document.
pub const METADATA_FILE: &str = "cache-metadata.json";

/// JSON-document cache store rooted at a directory.
#[derive(Debug, Clone)]
pub struct JsonCacheStore {
    root: PathBuf,
}

impl JsonCacheStore {
    /// Create a new cache store.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<platform cache dir>/graft`, if the platform has one.
    pub fn default_root() -> Option<PathBuf> {
        dirs::cache_dir().map(|dir| dir.join("graft"))
    }

    /// Get the cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.root.join(METADATA_FILE)
    }

    /// Load the metadata document; missing or unparsable means empty.
    pub fn load(&self) -> CacheMetadata {
        let path = self.metadata_path();

        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return CacheMetadata::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cache metadata unreadable, treating cache as empty");
                return CacheMetadata::default();
            }
        };

        serde_json::from_str(&json).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Cache metadata corrupt, treating cache as empty");
            CacheMetadata::default()
        })
    }

    fn save(&self, metadata: &CacheMetadata) -> GraftResult<()> {
        let path = self.metadata_path();
        let metadata_error = |reason: String| -> GraftError {
            ApplicationError::CacheMetadata {
                path: path.clone(),
                reason,
            }
            .into()
        };

        fs::create_dir_all(&self.root).map_err(|e| metadata_error(e.to_string()))?;
        let json =
            serde_json::to_string_pretty(metadata).map_err(|e| metadata_error(e.to_string()))?;
        fs::write(&path, json).map_err(|e| metadata_error(e.to_string()))?;

        debug!(path = %path.display(), entries = metadata.len(), "Cache metadata written");
        Ok(())
    }

    /// Record a fetch of `key` at `now`.
    pub fn touch_at(&self, key: &TemplateKey, now: DateTime<Utc>) -> GraftResult<CacheEntry> {
        let mut metadata = self.load();
        let entry = CacheEntry::fetched_at(now, self.storage_path(key));

        metadata.upsert(key, entry.clone());
        self.save(&metadata)?;
        Ok(entry)
    }

    /// Every recorded entry, by key.
    pub fn entries(&self) -> Vec<(String, CacheEntry)> {
        self.load().templates.into_iter().collect()
    }

    /// How long ago `key` was fetched.
    pub fn age(&self, key: &TemplateKey) -> Option<Duration> {
        self.entry(key).map(|e| e.age_at(Utc::now()))
    }

    /// Total bytes of every file under the cache root.
    pub fn size_bytes(&self) -> GraftResult<u64> {
        if !self.root.exists() {
            return Ok(0);
        }

        let mut total = 0;
        for entry in WalkDir::new(&self.root) {
            let entry = entry.map_err(|e| ApplicationError::FilesystemError {
                path: self.root.clone(),
                reason: format!("Failed to measure cache: {e}"),
            })?;
            if entry.file_type().is_file() {
                total += entry.metadata().map(|m| m.len()).unwrap_or(0);
            }
        }
        Ok(total)
    }

    fn remove_tree(&self, path: &Path) -> GraftResult<()> {
        match fs::remove_dir_all(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: format!("Failed to remove directory: {e}"),
            }
            .into()),
        }
    }
}

impl CacheStore for JsonCacheStore {
    fn is_fresh_at(&self, key: &TemplateKey, now: DateTime<Utc>) -> bool {
        self.load()
            .get(key)
            .is_some_and(|entry| entry.is_fresh_at(now))
    }

    fn entry(&self, key: &TemplateKey) -> Option<CacheEntry> {
        self.load().get(key).cloned()
    }

    fn touch(&self, key: &TemplateKey) -> GraftResult<CacheEntry> {
        self.touch_at(key, Utc::now())
    }

    fn invalidate(&self, key: &TemplateKey) -> GraftResult<()> {
        self.remove_tree(&self.storage_path(key))?;

        let mut metadata = self.load();
        if metadata.remove(key).is_some() {
            self.save(&metadata)?;
        }
        Ok(())
    }

    fn invalidate_all(&self) -> GraftResult<()> {
        if !self.root.exists() {
            return Ok(());
        }

        let children = fs::read_dir(&self.root).map_err(|e| ApplicationError::FilesystemError {
            path: self.root.clone(),
            reason: format!("Failed to list cache: {e}"),
        })?;
        for child in children.flatten() {
            let path = child.path();
            if path.is_dir() {
                self.remove_tree(&path)?;
            }
        }

        self.save(&CacheMetadata::default())
    }

    fn storage_path(&self, key: &TemplateKey) -> PathBuf {
        storage_path(&self.root, key)
    }
}
