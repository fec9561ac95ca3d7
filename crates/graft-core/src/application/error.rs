//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not business
//! rules. Business rule errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// No fresh cache entry exists for the template.
    #[error("Template not cached: {template}")]
    NotCached { template: String },

    /// Cloning the template repository failed, after any delete-and-retry.
    #[error("Failed to fetch template '{template}': {reason}")]
    FetchFailed { template: String, reason: String },

    /// Incremental refresh is not possible for a cached template directory.
    #[error("Cannot refresh {path}: {reason}")]
    RefreshUnavailable { path: PathBuf, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Cache metadata could not be written.
    #[error("Cache metadata error at {path}: {reason}")]
    CacheMetadata { path: PathBuf, reason: String },

    /// Project already exists at target location.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// The tree copy stopped partway; files already copied remain.
    #[error("Copy into {destination} stopped partway: {reason}")]
    PartialCopy { destination: PathBuf, reason: String },

    /// The template tree has no manifest.
    #[error("Manifest not found: {path}")]
    ManifestMissing { path: PathBuf },

    /// The manifest exists but has no usable declaration.
    #[error("Invalid manifest {path}: {reason}")]
    InvalidManifest { path: PathBuf, reason: String },

    /// A required external tool is missing.
    #[error("Required tool not available: {tool}")]
    ToolUnavailable { tool: &'static str },

    /// Store access failed (lock poisoned, etc.).
    #[error("Internal store lock poisoned")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NotCached { template } => vec![
                format!("Fetch it first: graft templates update --template {}", template),
            ],
            Self::FetchFailed { .. } => vec![
                "Check your network connection".into(),
                "Private templates need GRAFT_GITHUB_TOKEN to be set".into(),
                "Retry after clearing the cache: graft cache clear".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::CacheMetadata { path, .. } => vec![
                format!("Check permissions on {}", path.display()),
                "Reset the cache: graft cache clear".into(),
            ],
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Choose a different project name or output directory".into(),
            ],
            Self::PartialCopy { destination, .. } => vec![
                format!("{} is partially populated", destination.display()),
                format!("Remove it before retrying: rm -rf {}", destination.display()),
            ],
            Self::ManifestMissing { .. } => vec![
                "The template does not contain a go.mod at its root".into(),
                "Refresh the template: graft templates update".into(),
            ],
            Self::InvalidManifest { path, .. } => vec![
                format!("Add a 'module <path>' line to {}", path.display()),
            ],
            Self::ToolUnavailable { tool } => vec![
                format!("Install {} and make sure it is on your PATH", tool),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotCached { .. } | Self::ManifestMissing { .. } => ErrorCategory::NotFound,
            Self::ProjectExists { .. } | Self::InvalidManifest { .. } => ErrorCategory::Validation,
            Self::ToolUnavailable { .. } => ErrorCategory::Configuration,
            Self::FetchFailed { .. }
            | Self::RefreshUnavailable { .. }
            | Self::FilesystemError { .. }
            | Self::CacheMetadata { .. }
            | Self::PartialCopy { .. }
            | Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
