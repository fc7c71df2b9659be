//! In-memory cache implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::{Cache, CacheBucket};

type Entries = Arc<RwLock<HashMap<String, Vec<u8>>>>;

/// Process-wide in-memory [`Cache`].
///
/// Buckets with the same name share one map, so handles obtained from
/// separate `bucket` calls observe each other's writes. Concurrent writers to
/// the same key race; the last write wins.
#[derive(Default)]
pub struct MemoryCache {
    buckets: RwLock<HashMap<String, Entries>>,
}

impl MemoryCache {
    /// Create an empty in-memory cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cache for MemoryCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        if let Ok(buckets) = self.buckets.read()
            && let Some(entries) = buckets.get(name)
        {
            return Box::new(MemoryCacheBucket {
                entries: Arc::clone(entries),
            });
        }

        let entries = match self.buckets.write() {
            Ok(mut buckets) => Arc::clone(buckets.entry(name.to_owned()).or_default()),
            // A poisoned registry still yields a usable, if unshared, bucket.
            Err(_) => Entries::default(),
        };
        Box::new(MemoryCacheBucket { entries })
    }
}

struct MemoryCacheBucket {
    entries: Entries,
}

impl CacheBucket for MemoryCacheBucket {
    fn has(&self, key: &str) -> bool {
        self.entries
            .read()
            .is_ok_and(|entries| entries.contains_key(key))
    }

    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &[u8]) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_owned(), value.to_vec());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_bucket_set_and_get() {
        let cache = MemoryCache::new();
        let bucket = cache.bucket("static-pages");

        assert!(!bucket.has("landing%home"));
        bucket.set("landing%home", b"<main>hi</main>");

        assert!(bucket.has("landing%home"));
        assert_eq!(bucket.get("landing%home"), Some(b"<main>hi</main>".to_vec()));
    }

    #[test]
    fn test_memory_bucket_overwrite_last_write_wins() {
        let cache = MemoryCache::new();
        let bucket = cache.bucket("static-pages");

        bucket.set("key", b"first");
        bucket.set("key", b"second");
        assert_eq!(bucket.get("key"), Some(b"second".to_vec()));
    }

    #[test]
    fn test_memory_handles_share_storage() {
        let cache = MemoryCache::new();
        let writer = cache.bucket("static-pages");
        let reader = cache.bucket("static-pages");

        writer.set("key", b"shared");
        assert_eq!(reader.get("key"), Some(b"shared".to_vec()));
    }

    #[test]
    fn test_memory_buckets_are_isolated() {
        let cache = MemoryCache::new();
        let alpha = cache.bucket("alpha");
        let beta = cache.bucket("beta");

        alpha.set("key", b"alpha-data");
        assert!(!beta.has("key"));
        assert_eq!(alpha.get("key"), Some(b"alpha-data".to_vec()));
    }
}
