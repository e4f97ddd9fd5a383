//! In-memory mock filesystem for testing the host collector without a real `/proc`.

use crate::collector::traits::FileSystem;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// In-memory filesystem for testing.
///
/// Files can be rewritten between gathers (counters advancing, an interface
/// disappearing), so contents sit behind a lock and mutation takes `&self`.
#[derive(Debug, Default)]
pub struct MockFs {
    files: RwLock<HashMap<PathBuf, String>>,
    directories: RwLock<HashSet<PathBuf>>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a file. Parent directories are created automatically.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.files
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path, content.into());
    }

    /// Adds an empty directory.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.directories
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path);
    }

    /// Removes a file if present.
    pub fn remove_file(&self, path: impl AsRef<Path>) {
        self.files
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(path.as_ref());
    }

    /// Adds `/proc/<pid>` directories for the given pids.
    pub fn add_processes(&self, pids: impl IntoIterator<Item = u32>) {
        for pid in pids {
            self.add_dir(format!("/proc/{}", pid));
        }
    }

    fn add_parents(&self, path: &Path) {
        let mut dirs = self.directories.write().unwrap_or_else(|e| e.into_inner());
        let mut parent = path.parent();
        while let Some(p) = parent {
            if !p.as_os_str().is_empty() {
                dirs.insert(p.to_path_buf());
            }
            parent = p.parent();
        }
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let files = self.files.read().unwrap_or_else(|e| e.into_inner());
        files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            )
        })
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let files = self.files.read().unwrap_or_else(|e| e.into_inner());
        let dirs = self.directories.read().unwrap_or_else(|e| e.into_inner());

        if !dirs.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("directory not found: {:?}", path),
            ));
        }

        let mut entries = HashSet::new();

        for file_path in files.keys() {
            if file_path.parent().is_some_and(|parent| parent == path) {
                entries.insert(file_path.clone());
            }
        }

        for dir_path in dirs.iter() {
            if dir_path.parent().is_some_and(|parent| parent == path) && dir_path != path {
                entries.insert(dir_path.clone());
            }
        }

        Ok(entries.into_iter().collect())
    }
}
