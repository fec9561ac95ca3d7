//! Cache entry bookkeeping.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::TemplateKey;

/// Time-to-live for cache entries.
pub const CACHE_TTL_HOURS: i64 = 24;

/// The fixed cache TTL as a `chrono::Duration`.
pub fn cache_ttl() -> Duration {
    Duration::hours(CACHE_TTL_HOURS)
}

/// Freshness record for one cached template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub cached_at: DateTime<Utc>,
    pub last_checked: DateTime<Utc>,
    pub path: PathBuf,
    /// Optional version tag of the cached tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl CacheEntry {
    /// A freshly fetched entry stored at `path`.
    pub fn fetched_at(now: DateTime<Utc>, path: impl Into<PathBuf>) -> Self {
        Self {
            cached_at: now,
            last_checked: now,
            path: path.into(),
            version: None,
        }
    }

    /// `now - cached_at < TTL`.
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.cached_at) < cache_ttl()
    }

    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.cached_at)
    }
}

/// The persisted cache document: every entry, keyed by template.
///
/// Serialized as `{"templates": {"<key>": {...}}}` and always written whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMetadata {
    #[serde(default)]
    pub templates: BTreeMap<String, CacheEntry>,
}

impl CacheMetadata {
    pub fn get(&self, key: &TemplateKey) -> Option<&CacheEntry> {
        self.templates.get(key.as_str())
    }

    pub fn upsert(&mut self, key: &TemplateKey, entry: CacheEntry) {
        self.templates.insert(key.as_str().to_string(), entry);
    }

    pub fn remove(&mut self, key: &TemplateKey) -> Option<CacheEntry> {
        self.templates.remove(key.as_str())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Storage directory for `key` under `cache_root`.
///
/// Deterministic: the same key and root always yield the same path.
pub fn storage_path(cache_root: &Path, key: &TemplateKey) -> PathBuf {
    cache_root.join(key.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn fresh_just_before_ttl() {
        let entry = CacheEntry::fetched_at(t0(), "/cache/layered");
        let almost = t0() + Duration::hours(23) + Duration::minutes(59) + Duration::seconds(59);
        assert!(entry.is_fresh_at(almost));
    }

    #[test]
    fn stale_exactly_at_ttl() {
        let entry = CacheEntry::fetched_at(t0(), "/cache/layered");
        assert!(!entry.is_fresh_at(t0() + Duration::hours(24)));
    }

    #[test]
    fn fresh_at_creation_time() {
        let entry = CacheEntry::fetched_at(t0(), "/cache/layered");
        assert!(entry.is_fresh_at(t0()));
        assert_eq!(entry.age_at(t0()), Duration::zero());
    }

    #[test]
    fn storage_path_is_deterministic() {
        let key = TemplateKey::new("modular").unwrap();
        let a = storage_path(Path::new("/c"), &key);
        let b = storage_path(Path::new("/c"), &key);
        assert_eq!(a, b);
        assert_eq!(a, PathBuf::from("/c/modular"));
    }

    #[test]
    fn upsert_overwrites_and_remove_deletes() {
        let mut meta = CacheMetadata::default();
        let key = TemplateKey::new("layered").unwrap();
        meta.upsert(&key, CacheEntry::fetched_at(t0(), "/c/layered"));
        let later = t0() + Duration::hours(1);
        meta.upsert(&key, CacheEntry::fetched_at(later, "/c/layered"));

        assert_eq!(meta.len(), 1);
        assert_eq!(meta.get(&key).unwrap().cached_at, later);

        assert!(meta.remove(&key).is_some());
        assert!(meta.is_empty());
    }
}
