//! Infrastructure adapters for graft.
//!
//! This crate implements the ports defined in `graft-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod builtin_templates;
pub mod cache_store;
pub mod fetcher;
pub mod filesystem;

// Re-export commonly used adapters
pub use cache_store::JsonCacheStore;
pub use fetcher::GitFetcher;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
