//! Template Service - keeps the local template cache usable.
//!
//! Resolves template keys through the registry, decides whether a fetch is
//! needed, and drives the fetcher through the missing/stale fallback.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{CacheStore, Filesystem, RepositoryFetcher},
        services::tree_copier::{CopySummary, TreeCopier},
    },
    domain::{Credential, TemplateDescriptor, TemplateKey, TemplateRegistry, source_rules::is_vcs_dir},
    error::{GraftError, GraftResult},
};

/// What a fetch has to do for a storage directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPlan {
    /// No directory yet: clone straight into it.
    Missing,
    /// A directory exists: try an in-place refresh, else delete and clone.
    Stale,
}

/// Information about a template for display purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInfo {
    pub key: TemplateKey,
    pub name: String,
    pub description: String,
    pub repository: String,
    pub git_ref: Option<String>,
    pub cached_at: Option<DateTime<Utc>>,
    pub fresh: bool,
}

/// Outcome of refreshing several templates.
#[derive(Debug, Default)]
pub struct UpdateReport {
    pub updated: Vec<TemplateKey>,
    pub failed: Vec<(TemplateKey, GraftError)>,
}

impl UpdateReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Template cache orchestration.
pub struct TemplateService {
    registry: Arc<TemplateRegistry>,
    cache: Box<dyn CacheStore>,
    fetcher: Box<dyn RepositoryFetcher>,
    filesystem: Arc<dyn Filesystem>,
}

impl TemplateService {
    pub fn new(
        registry: Arc<TemplateRegistry>,
        cache: Box<dyn CacheStore>,
        fetcher: Box<dyn RepositoryFetcher>,
        filesystem: Arc<dyn Filesystem>,
    ) -> Self {
        Self {
            registry,
            cache,
            fetcher,
            filesystem,
        }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn get(&self, key: &TemplateKey) -> GraftResult<&TemplateDescriptor> {
        Ok(self.registry.get(key)?)
    }

    /// Every registered template with its cache status.
    pub fn list(&self) -> Vec<TemplateInfo> {
        self.registry
            .iter()
            .map(|d| TemplateInfo {
                key: d.key.clone(),
                name: d.name.clone(),
                description: d.description.clone(),
                repository: d.repository.clone(),
                git_ref: d.git_ref.clone(),
                cached_at: self.cache.entry(&d.key).map(|e| e.cached_at),
                fresh: self.cache.is_fresh(&d.key),
            })
            .collect()
    }

    /// Make sure `key` has a fresh cached tree; returns its storage path.
    #[instrument(skip_all, fields(template = %key))]
    pub fn ensure_cached(
        &self,
        key: &TemplateKey,
        credential: Option<&Credential>,
    ) -> GraftResult<PathBuf> {
        self.registry.get(key)?;

        let dir = self.cache.storage_path(key);
        if self.cache.is_fresh(key) && self.filesystem.exists(&dir) {
            debug!("Cache entry is fresh");
            return Ok(dir);
        }

        self.fetch(key, credential)
    }

    /// Fetch `key` regardless of freshness.
    #[instrument(skip_all, fields(template = %key))]
    pub fn fetch(&self, key: &TemplateKey, credential: Option<&Credential>) -> GraftResult<PathBuf> {
        let descriptor = self.registry.get(key)?;
        let dir = self.cache.storage_path(key);

        match self.plan_fetch(&dir) {
            FetchPlan::Missing => {
                debug!(path = %dir.display(), "No cached tree, cloning");
                self.clone_into(descriptor, &dir, credential)?;
            }
            FetchPlan::Stale => {
                match self
                    .fetcher
                    .refresh(descriptor, &dir, credential.cloned())
                {
                    Ok(()) => debug!(path = %dir.display(), "Refreshed in place"),
                    Err(err) => {
                        // Expected: VCS metadata is stripped after every fetch.
                        debug!(error = %err, "In-place refresh unavailable, re-cloning");
                        self.filesystem.remove_dir_all(&dir)?;
                        self.clone_into(descriptor, &dir, credential)?;
                    }
                }
            }
        }

        self.strip_vcs_metadata(&dir)?;
        self.cache.touch(key)?;

        info!(path = %dir.display(), "Template cached");
        Ok(dir)
    }

    pub fn plan_fetch(&self, dir: &Path) -> FetchPlan {
        if self.filesystem.exists(dir) {
            FetchPlan::Stale
        } else {
            FetchPlan::Missing
        }
    }

    /// Fetch every registered template; failures are collected, not fatal.
    #[instrument(skip_all)]
    pub fn update_all(&self, credential: Option<&Credential>) -> UpdateReport {
        let mut report = UpdateReport::default();

        for key in self.registry.keys() {
            match self.fetch(key, credential) {
                Ok(_) => report.updated.push(key.clone()),
                Err(err) => {
                    warn!(template = %key, error = %err, "Template update failed");
                    report.failed.push((key.clone(), err));
                }
            }
        }

        report
    }

    /// Storage path of a fresh cached tree.
    pub fn cached_path(&self, key: &TemplateKey) -> GraftResult<PathBuf> {
        self.registry.get(key)?;

        let dir = self.cache.storage_path(key);
        if !self.cache.is_fresh(key) || !self.filesystem.exists(&dir) {
            return Err(ApplicationError::NotCached {
                template: key.to_string(),
            }
            .into());
        }
        Ok(dir)
    }

    /// Files of a cached tree, relative to its root.
    pub fn cached_files(&self, key: &TemplateKey) -> GraftResult<Vec<PathBuf>> {
        let dir = self.cached_path(key)?;

        Ok(self
            .filesystem
            .walk(&dir, &is_vcs_dir)?
            .into_iter()
            .filter(|e| !e.is_dir)
            .map(|e| e.relative)
            .collect())
    }

    /// Materialize the cached tree of `key` into `destination`.
    pub fn copy_tree(&self, key: &TemplateKey, destination: &Path) -> GraftResult<CopySummary> {
        let source = self.cached_path(key)?;
        TreeCopier::new(Arc::clone(&self.filesystem)).copy_tree(&source, destination)
    }

    #[instrument(skip_all, fields(template = %key))]
    pub fn clear(&self, key: &TemplateKey) -> GraftResult<()> {
        self.registry.get(key)?;
        self.cache.invalidate(key)?;
        info!("Cache entry cleared");
        Ok(())
    }

    #[instrument(skip_all)]
    pub fn clear_all(&self) -> GraftResult<()> {
        self.cache.invalidate_all()?;
        info!("Cache cleared");
        Ok(())
    }

    fn clone_into(
        &self,
        descriptor: &TemplateDescriptor,
        dir: &Path,
        credential: Option<&Credential>,
    ) -> GraftResult<()> {
        if let Some(parent) = dir.parent() {
            self.filesystem.create_dir_all(parent)?;
        }
        self.fetcher
            .shallow_clone(descriptor, dir, credential.cloned())
    }

    /// Remove every VCS entry below `dir`, directory or gitlink file.
    fn strip_vcs_metadata(&self, dir: &Path) -> GraftResult<()> {
        let vcs_entries: Vec<_> = self
            .filesystem
            .walk(dir, &is_vcs_dir)?
            .into_iter()
            .filter(|e| is_vcs_dir(e.file_name()))
            .collect();

        for entry in vcs_entries {
            debug!(path = %entry.path.display(), "Removing VCS metadata");
            if entry.is_dir {
                self.filesystem.remove_dir_all(&entry.path)?;
            } else {
                self.filesystem.remove_file(&entry.path)?;
            }
        }
        Ok(())
    }
}
