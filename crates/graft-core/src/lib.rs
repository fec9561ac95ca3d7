//! Graft Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for graft: the
//! template cache, tree copy and module identity rewrite behind
//! `graft new`.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            graft-cli (CLI)              │
//! │      (Implements Driving Ports)         │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (ScaffoldService, TemplateService, ...) │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │ (Filesystem, CacheStore, Fetcher)       │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     graft-adapters (Infrastructure)     │
//! │ (JsonCacheStore, GitFetcher, Local...)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ (Identity, TemplateRegistry, imports)   │
//! │           No I/O of any kind            │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use graft_core::prelude::*;
//!
//! # fn run(templates: TemplateService, filesystem: std::sync::Arc<dyn Filesystem>) -> GraftResult<()> {
//! let request = ProvisionRequest::new(
//!     TemplateKey::new("layered")?,
//!     Identity::new("github.com/acme/api")?,
//!     "api",
//!     "/home/me/src",
//! )?;
//!
//! let service = ScaffoldService::new(templates, filesystem);
//! let report = service.provision(&request, None)?;
//! println!("created {}", report.project_path.display());
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

#[cfg(test)]
pub(crate) mod test_support;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        CopySummary, FetchPlan, FileWarning, IdentityRewriter, ProvisionReport, RewriteReport,
        ScaffoldService, TemplateInfo, TemplateService, TreeCopier, UpdateReport,
        ports::{CacheStore, Filesystem, RepositoryFetcher, WalkEntry},
    };
    pub use crate::domain::{
        CacheEntry, Credential, Identity, ProvisionRequest, SourceRules, TemplateDescriptor,
        TemplateKey, TemplateRegistry,
    };
    pub use crate::error::{GraftError, GraftResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
