//! Core domain layer for graft.
//!
//! Pure logic with no I/O: identities, template descriptors, cache
//! bookkeeping, and the text rules for manifests and import paths. All
//! filesystem, network and process concerns are reached via ports defined in
//! the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No I/O**: no filesystem, network, or process calls
//! - **Few crates**: std + thiserror, serde and chrono for cache records
//! - **Validated values**: `Identity`, `TemplateKey` and `ProvisionRequest`
//!   enforce their invariants at construction
pub mod entities;
pub mod error;
pub mod imports;
pub mod manifest;
pub mod source_rules;
pub mod value_objects;

pub use entities::{
    CACHE_TTL_HOURS, CacheEntry, CacheMetadata, ProvisionRequest, TemplateDescriptor,
    TemplateRegistry, cache_ttl, storage_path, validate_project_name,
};
pub use error::{DomainError, ErrorCategory};
pub use imports::{ImportReference, ImportScanner, ImportSyntax, LineState, RewriteOutcome};
pub use source_rules::SourceRules;
pub use value_objects::{Credential, Identity, TemplateKey, authenticated_url};
