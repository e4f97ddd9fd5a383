//! Filesystem access behind a trait so the host collector can run against
//! the real `/proc` on Linux and an in-memory tree in tests.

use std::io;
use std::path::{Path, PathBuf};

/// Read-only view of the files the host collector needs.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Lists entries in a directory.
    ///
    /// # Returns
    /// Full paths of the entries, in no particular order.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
}

/// Real filesystem implementation that delegates to `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(path)?;
        let mut paths = Vec::new();
        for entry in entries {
            paths.push(entry?.path());
        }
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_real_fs_read_to_string() {
        let fs = RealFs::new();
        // Cargo runs unit tests from the crate root
        let manifest = env::current_dir().unwrap().join("Cargo.toml");
        let content = fs.read_to_string(&manifest).unwrap();
        assert!(content.contains("hoststat-core"));
    }

    #[test]
    fn test_real_fs_read_dir() {
        let fs = RealFs::new();
        let src_dir = env::current_dir().unwrap().join("src");
        let entries = fs.read_dir(&src_dir).unwrap();
        assert!(entries.iter().any(|p| p.ends_with("lib.rs")));
    }

    #[test]
    fn test_real_fs_missing_file() {
        let fs = RealFs::new();
        let err = fs
            .read_to_string(Path::new("/nonexistent/path/12345"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
