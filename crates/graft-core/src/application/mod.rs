//! Application layer for graft.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ScaffoldService, TemplateService,
//!   TreeCopier, IdentityRewriter)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer; text rules for
//! manifests and imports live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    CopySummary, FetchPlan, FileWarning, IdentityRewriter, ProvisionReport, RewriteReport,
    ScaffoldService, TemplateInfo, TemplateService, TreeCopier, UpdateReport,
};

// Re-export port traits (for adapter implementation)
pub use ports::{CacheStore, Filesystem, RepositoryFetcher, WalkEntry};

pub use error::ApplicationError;
