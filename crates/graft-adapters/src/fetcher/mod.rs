//! Repository fetcher adapters.

mod git;

pub use git::GitFetcher;
