//! In-memory filesystem adapter for tests.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
};

use barebones_core::{
    application::{ApplicationError, ports::Filesystem},
    error::BarebonesResult,
};

/// In-memory filesystem.
///
/// Clones share state, so a test can hand one clone to the engine and
/// inspect another.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn add_directories(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, creating its parent directories.
    ///
    /// Seeding recovers the state of a poisoned lock instead of dropping
    /// the file.
    pub fn with_file(self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        {
            let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            let path = path.as_ref();
            if let Some(parent) = path.parent() {
                inner.add_directories(parent);
            }
            inner.files.insert(path.to_path_buf(), content.into());
        }
        self
    }

    /// Seed a directory.
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .add_directories(path.as_ref());
        self
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl Filesystem for MemoryFilesystem {
    fn read_to_string(&self, path: &Path) -> BarebonesResult<String> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.files.get(path).cloned().ok_or_else(|| {
            ApplicationError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into()
        })
    }

    fn write_atomic(&self, path: &Path, content: &str) -> BarebonesResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }
        if inner.directories.contains(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "Is a directory".into(),
            }
            .into());
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> BarebonesResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if inner.files.contains_key(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "A file is in the way".into(),
            }
            .into());
        }
        inner.add_directories(path);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.directories.contains(path))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_requires_parent() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_atomic(Path::new("/p/a/b.rb"), "x").is_err());

        fs.create_dir_all(Path::new("/p/a")).unwrap();
        fs.write_atomic(Path::new("/p/a/b.rb"), "x").unwrap();
        assert_eq!(fs.read_file(Path::new("/p/a/b.rb")).as_deref(), Some("x"));
    }

    #[test]
    fn seeded_file_creates_parents() {
        let fs = MemoryFilesystem::new().with_file("/p/config/routes.rb", "x");
        assert!(fs.is_dir(Path::new("/p/config")));
        assert!(fs.exists(Path::new("/p/config/routes.rb")));
        assert!(!fs.is_dir(Path::new("/p/config/routes.rb")));
    }

    #[test]
    fn seeding_survives_a_poisoned_lock() {
        let fs = MemoryFilesystem::new();
        let shared = fs.clone();
        let _ = std::thread::spawn(move || {
            let _guard = shared.inner.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(fs.inner.is_poisoned());

        let fs = fs.with_dir("/p/app").with_file("/p/Gemfile", "source 'x'\n");

        let inner = fs.inner.read().unwrap_or_else(PoisonError::into_inner);
        assert_eq!(
            inner.files.get(Path::new("/p/Gemfile")).map(String::as_str),
            Some("source 'x'\n")
        );
        assert!(inner.directories.contains(Path::new("/p/app")));
    }

    #[test]
    fn clones_share_state() {
        let fs = MemoryFilesystem::new().with_dir("/p");
        let other = fs.clone();
        fs.write_atomic(Path::new("/p/x"), "1").unwrap();
        assert_eq!(other.list_files(), vec![PathBuf::from("/p/x")]);
    }
}
