use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::domain::error::DomainError;

/// A filesystem path guaranteed to be **relative** to the project root.
///
/// Every engine operation resolves its target against the project root, so
/// a target must never be absolute and must never climb out of the root
/// through `..` components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// Create a new relative path.
    ///
    /// Intended for paths written into the source as literals.
    ///
    /// # Panics
    /// Panics if the provided path is absolute, empty, or contains `..`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        match Self::try_new(path) {
            Ok(p) => p,
            Err(e) => panic!("{e}"),
        }
    }

    /// Try to create a relative path.
    ///
    /// This is the non-panicking variant used for user input.
    pub fn try_new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        let invalid = |reason: &str| DomainError::InvalidPath {
            path: path.display().to_string(),
            reason: reason.into(),
        };

        if path.as_os_str().is_empty() {
            return Err(invalid("path is empty"));
        }
        if path.is_absolute() || path.has_root() {
            return Err(invalid("absolute paths are not allowed"));
        }
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(invalid("'..' components are not allowed"));
        }
        Ok(Self(path))
    }

    /// Join a path segment onto this relative path.
    ///
    /// # Panics
    /// Panics if the joined path would be absolute or climb out of the root.
    pub fn join(&self, segment: impl AsRef<Path>) -> Self {
        Self::new(self.0.join(segment.as_ref()))
    }

    /// Resolve against a root directory.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }

    /// Borrow as a `Path`.
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        RelativePath::new(s)
    }
}

impl From<String> for RelativePath {
    fn from(s: String) -> Self {
        RelativePath::new(s)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl Serialize for RelativePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Options controlling how the materializer treats an existing file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Overwrite the destination if it already exists.
    pub force: bool,
}

impl WriteOptions {
    /// Leave existing files untouched.
    pub const fn new() -> Self {
        Self { force: false }
    }

    /// Overwrite existing files.
    pub const fn forced() -> Self {
        Self { force: true }
    }
}
