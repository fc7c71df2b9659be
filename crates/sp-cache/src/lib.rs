//! Cache facility for static page fragments.
//!
//! Two traits decouple the page loader from the store behind it:
//!
//! - [`Cache`]: Factory for named cache buckets
//! - [`CacheBucket`]: Key-value store with `has`/`get`/`set`
//!
//! No eviction or TTL policy lives here. Entries survive until the backing
//! store drops them on its own.
//!
//! # Implementations
//!
//! - [`NullCache`] / [`NullCacheBucket`]: No-op implementations (always miss)
//! - [`MemoryCache`]: Process-wide in-memory store
//! - [`FileCache`]: File-based implementation with version validation
//!
//! # Example
//!
//! ```
//! use sp_cache::{Cache, MemoryCache};
//!
//! let cache = MemoryCache::new();
//! let bucket = cache.bucket("static-pages");
//! bucket.set("landing%home", b"<main>hello</main>");
//! assert!(bucket.has("landing%home"));
//! assert_eq!(bucket.get("landing%home"), Some(b"<main>hello</main>".to_vec()));
//! ```

mod ext;
mod file;
mod memory;

pub use ext::CacheBucketExt;
pub use file::FileCache;
pub use memory::MemoryCache;

/// A named partition within a [`Cache`].
///
/// Values are opaque bytes keyed by a caller-chosen string. Writing an existing
/// key replaces the previous value (last write wins).
pub trait CacheBucket: Send + Sync {
    /// Whether an entry exists for `key`.
    fn has(&self, key: &str) -> bool;

    /// Retrieve a cached value, or `None` on miss.
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Store a value, replacing any existing entry for the same key.
    fn set(&self, key: &str, value: &[u8]);
}

/// Factory for named cache [`CacheBucket`]s.
///
/// Buckets produced by one `Cache` are logically isolated from each other.
pub trait Cache: Send + Sync {
    /// Open or create a named bucket.
    ///
    /// Calling `bucket` multiple times with the same name returns handles
    /// that share the same underlying storage.
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket>;
}

/// No-op [`CacheBucket`] that never stores or retrieves data.
pub struct NullCacheBucket;

impl CacheBucket for NullCacheBucket {
    fn has(&self, _key: &str) -> bool {
        false
    }

    fn get(&self, _key: &str) -> Option<Vec<u8>> {
        None
    }

    fn set(&self, _key: &str, _value: &[u8]) {}
}

/// No-op [`Cache`] that always returns [`NullCacheBucket`]s.
///
/// Use when caching is disabled.
pub struct NullCache;

impl Cache for NullCache {
    fn bucket(&self, _name: &str) -> Box<dyn CacheBucket> {
        Box::new(NullCacheBucket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_cache_always_misses() {
        let cache = NullCache;
        let bucket = cache.bucket("static-pages");

        assert!(!bucket.has("landing%home"));

        bucket.set("landing%home", b"hello");
        assert!(!bucket.has("landing%home"));
        assert_eq!(bucket.get("landing%home"), None);
    }
}
