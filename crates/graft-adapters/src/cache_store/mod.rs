//! Cache store adapters.

mod json;

pub use json::{JsonCacheStore, METADATA_FILE};
