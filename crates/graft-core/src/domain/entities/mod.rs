pub mod cache_entry;
pub mod request;
pub mod template;

pub use cache_entry::{CACHE_TTL_HOURS, CacheEntry, CacheMetadata, cache_ttl, storage_path};
pub use request::{ProvisionRequest, validate_project_name};
pub use template::{TemplateDescriptor, TemplateRegistry};
