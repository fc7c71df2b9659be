//! File-based cache implementation.
//!
//! [`FileCache`] stores each entry as a single file inside a bucket
//! subdirectory. File names are the hex-encoded key, so arbitrary page keys
//! (including separators and path characters) map to flat, safe names. Keys
//! too long for that are named by their SHA-256 digest instead.
//!
//! On construction, [`FileCache`] validates a `VERSION` file in the cache root.
//! If the version mismatches or is missing, the entire cache directory is wiped
//! and recreated, so entries serialized by another build are never read back.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::{Cache, CacheBucket};

/// File-based [`Cache`] rooted at a directory on disk.
///
/// Directory layout:
/// ```text
/// {root}/
/// +-- VERSION              # contains the cache version string
/// +-- static-pages/        # bucket "static-pages"
///     +-- 6c616e64...      # hex(key)
/// ```
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    /// Create a new file-based cache at `root`, validating the cache version.
    ///
    /// Errors during validation are logged but never fatal.
    #[must_use]
    pub fn new(root: PathBuf, version: &str) -> Self {
        validate_version(&root, version);
        Self { root }
    }
}

impl Cache for FileCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        Box::new(FileCacheBucket {
            dir: self.root.join(name),
        })
    }
}

/// A single bucket backed by a directory on disk.
struct FileCacheBucket {
    dir: PathBuf,
}

impl FileCacheBucket {
    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(entry_name(key))
    }
}

/// Longest hex-encoded key used verbatim as a file name.
const MAX_HEX_NAME: usize = 128;

/// File name for `key`: its hex encoding, or a SHA-256 digest when that
/// would exceed [`MAX_HEX_NAME`]. Hex names never contain `-`, so the two
/// forms cannot collide.
fn entry_name(key: &str) -> String {
    let name = hex::encode(key);
    if name.len() <= MAX_HEX_NAME {
        return name;
    }
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    format!("sha256-{}", hex::encode(hasher.finalize()))
}

impl CacheBucket for FileCacheBucket {
    fn has(&self, key: &str) -> bool {
        self.entry_path(key).is_file()
    }

    fn get(&self, key: &str) -> Option<Vec<u8>> {
        fs::read(self.entry_path(key)).ok()
    }

    fn set(&self, key: &str, value: &[u8]) {
        if let Err(e) = fs::create_dir_all(&self.dir) {
            tracing::warn!(dir = %self.dir.display(), error = %e, "Failed to create cache bucket");
            return;
        }

        // Write to a sibling file first so readers never observe a torn entry.
        let path = self.entry_path(key);
        let tmp = path.with_extension("tmp");
        if let Err(e) = fs::write(&tmp, value).and_then(|()| fs::rename(&tmp, &path)) {
            tracing::warn!(key = %key, error = %e, "Failed to write cache entry");
            let _ = fs::remove_file(&tmp);
        }
    }
}

/// Validate the cache version, wiping the directory on mismatch.
fn validate_version(root: &Path, version: &str) {
    let version_file = root.join("VERSION");

    match fs::read_to_string(&version_file) {
        Ok(stored) if stored == version => {
            tracing::debug!("cache version matches: {version}");
            return;
        }
        Ok(stored) => {
            tracing::info!(
                "cache version mismatch (stored={stored}, current={version}), wiping cache"
            );
        }
        Err(_) => {
            tracing::info!("no cache VERSION file found, initializing cache");
        }
    }

    if root.exists()
        && let Err(e) = fs::remove_dir_all(root)
    {
        tracing::warn!("failed to remove cache directory: {e}");
    }
    if let Err(e) = fs::create_dir_all(root) {
        tracing::warn!("failed to create cache directory: {e}");
        return;
    }
    if let Err(e) = fs::write(&version_file, version) {
        tracing::warn!("failed to write cache VERSION file: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_bucket_set_and_get() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path().join("cache"), "v1");
        let bucket = cache.bucket("static-pages");

        bucket.set("landing%home", b"<main>hello</main>");
        assert!(bucket.has("landing%home"));
        assert_eq!(
            bucket.get("landing%home"),
            Some(b"<main>hello</main>".to_vec())
        );
    }

    #[test]
    fn test_file_bucket_get_nonexistent_key() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path().join("cache"), "v1");
        let bucket = cache.bucket("static-pages");

        assert!(!bucket.has("nonexistent"));
        assert_eq!(bucket.get("nonexistent"), None);
    }

    #[test]
    fn test_file_bucket_overwrite() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path().join("cache"), "v1");
        let bucket = cache.bucket("static-pages");

        bucket.set("key", b"first");
        bucket.set("key", b"second");

        assert_eq!(bucket.get("key"), Some(b"second".to_vec()));
    }

    #[test]
    fn test_file_bucket_key_with_path_characters_stays_inside_bucket() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("cache");
        let cache = FileCache::new(root.clone(), "v1");
        let bucket = cache.bucket("static-pages");

        bucket.set("../escape%page", b"data");

        assert_eq!(bucket.get("../escape%page"), Some(b"data".to_vec()));
        assert!(!root.join("escape%page").exists());
        assert_eq!(fs::read_dir(root.join("static-pages")).unwrap().count(), 1);
    }

    #[test]
    fn test_long_keys_use_digest_file_names() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("cache");
        let cache = FileCache::new(root.clone(), "v1");
        let bucket = cache.bucket("static-pages");
        let long_key = format!("landing%{}", "p".repeat(300));
        let other_key = format!("landing%{}", "q".repeat(300));

        bucket.set(&long_key, b"long");
        bucket.set(&other_key, b"other");

        assert!(bucket.has(&long_key));
        assert_eq!(bucket.get(&long_key), Some(b"long".to_vec()));
        assert_eq!(bucket.get(&other_key), Some(b"other".to_vec()));
        for entry in fs::read_dir(root.join("static-pages")).unwrap() {
            let name = entry.unwrap().file_name();
            assert!(name.len() < 255);
            assert!(name.to_string_lossy().starts_with("sha256-"));
        }
    }

    #[test]
    fn test_short_keys_keep_hex_file_names() {
        assert_eq!(entry_name("g%p"), hex::encode("g%p"));
    }

    #[test]
    fn test_file_cache_buckets_are_isolated() {
        let tmp = TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path().join("cache"), "v1");

        let bucket_a = cache.bucket("alpha");
        let bucket_b = cache.bucket("beta");

        bucket_a.set("key", b"alpha-data");
        bucket_b.set("key", b"beta-data");

        assert_eq!(bucket_a.get("key"), Some(b"alpha-data".to_vec()));
        assert_eq!(bucket_b.get("key"), Some(b"beta-data".to_vec()));
    }

    #[test]
    fn test_version_match_keeps_cache() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("cache");

        let cache = FileCache::new(root.clone(), "v1");
        cache.bucket("static-pages").set("key", b"preserved");

        let cache2 = FileCache::new(root, "v1");
        assert_eq!(
            cache2.bucket("static-pages").get("key"),
            Some(b"preserved".to_vec())
        );
    }

    #[test]
    fn test_version_mismatch_wipes_cache() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("cache");

        let cache = FileCache::new(root.clone(), "v1");
        cache.bucket("static-pages").set("key", b"will-be-wiped");

        let cache2 = FileCache::new(root.clone(), "v2");
        assert!(!cache2.bucket("static-pages").has("key"));

        let version = fs::read_to_string(root.join("VERSION")).unwrap();
        assert_eq!(version, "v2");
    }

    #[test]
    fn test_nonexistent_root_creates_version() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("deeply/nested/cache");
        assert!(!root.exists());

        let _cache = FileCache::new(root.clone(), "v1");

        assert!(root.exists());
        let version = fs::read_to_string(root.join("VERSION")).unwrap();
        assert_eq!(version, "v1");
    }
}
