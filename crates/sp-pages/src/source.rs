//! Page file access.
//!
//! The loader and the template engine read page files through [`PageSource`]
//! so that tests can count reads and run without touching the filesystem.

use std::io;
use std::path::Path;

/// Read access to page files by absolute path.
pub trait PageSource: Send + Sync {
    /// Whether `path` is an existing regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Read the full text of `path`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error; a missing file is
    /// [`io::ErrorKind::NotFound`].
    fn read(&self, path: &Path) -> io::Result<String>;
}

/// [`PageSource`] backed by the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSource;

impl PageSource for FsSource {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

#[cfg(any(test, feature = "mock"))]
pub use mock::MockSource;

#[cfg(any(test, feature = "mock"))]
mod mock {
    use std::collections::HashMap;
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::RwLock;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::PageSource;

    /// In-memory [`PageSource`] that counts reads.
    ///
    /// ```ignore
    /// let source = MockSource::new().with_file("/pages/home.html", "<main>Hi</main>");
    /// assert_eq!(source.reads(), 0);
    /// ```
    #[derive(Debug, Default)]
    pub struct MockSource {
        files: RwLock<HashMap<PathBuf, String>>,
        reads: AtomicUsize,
    }

    impl MockSource {
        /// Create an empty source.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Add a file.
        ///
        /// # Panics
        ///
        /// Panics if the internal lock is poisoned.
        #[must_use]
        pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
            self.files
                .write()
                .unwrap()
                .insert(path.into(), content.into());
            self
        }

        /// Replace the content of an existing or new file.
        ///
        /// # Panics
        ///
        /// Panics if the internal lock is poisoned.
        pub fn write(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
            self.files
                .write()
                .unwrap()
                .insert(path.into(), content.into());
        }

        /// Number of successful and failed `read` calls so far.
        #[must_use]
        pub fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl PageSource for MockSource {
        fn is_file(&self, path: &Path) -> bool {
            self.files
                .read()
                .is_ok_and(|files| files.contains_key(path))
        }

        fn read(&self, path: &Path) -> io::Result<String> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.files
                .read()
                .map_err(|_| io::Error::other("mock source lock poisoned"))?
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_source_reads_files() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("home.html");
        std::fs::write(&path, "<main>Hi</main>").unwrap();

        assert!(FsSource.is_file(&path));
        assert!(!FsSource.is_file(tmp.path()));
        assert_eq!(FsSource.read(&path).unwrap(), "<main>Hi</main>");
    }

    #[test]
    fn test_fs_source_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let err = FsSource.read(&tmp.path().join("nope.html")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_mock_source_counts_reads() {
        let source = MockSource::new().with_file("/pages/a.html", "a");

        assert!(source.is_file(Path::new("/pages/a.html")));
        assert_eq!(source.reads(), 0);
        assert_eq!(source.read(Path::new("/pages/a.html")).unwrap(), "a");
        assert!(source.read(Path::new("/pages/b.html")).is_err());
        assert_eq!(source.reads(), 2);
    }
}
