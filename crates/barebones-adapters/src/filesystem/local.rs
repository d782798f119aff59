//! Local filesystem adapter using std::fs.

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use barebones_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{BarebonesError, BarebonesResult},
};

/// Production filesystem implementation using `std::fs`.
///
/// Writes land in a temporary file next to the target and are renamed over
/// it, so readers never observe a partially written file.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn read_to_string(&self, path: &Path) -> BarebonesResult<String> {
        std::fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ApplicationError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into(),
            _ => map_io_error(path, e, "read file"),
        })
    }

    fn write_atomic(&self, path: &Path, content: &str) -> BarebonesResult<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut tmp =
            NamedTempFile::new_in(parent).map_err(|e| map_io_error(path, e, "create temp file"))?;
        tmp.write_all(content.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| map_io_error(path, e, "write file"))?;

        carry_permissions(path, tmp.as_file())?;

        tmp.persist(path)
            .map_err(|e| map_io_error(path, e.error, "replace file"))?;
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> BarebonesResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// Give the temp file the mode of the file it replaces, or 0644 for a new
/// file (temp files start out as 0600).
fn carry_permissions(target: &Path, tmp: &std::fs::File) -> BarebonesResult<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = match std::fs::metadata(target) {
            Ok(meta) => meta.permissions(),
            Err(_) => std::fs::Permissions::from_mode(0o644),
        };
        tmp.set_permissions(perms)
            .map_err(|e| map_io_error(target, e, "set permissions"))?;
    }
    #[cfg(not(unix))]
    {
        let _ = (target, tmp);
    }
    Ok(())
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> BarebonesError {
    let path = path.to_path_buf();
    match e.kind() {
        io::ErrorKind::PermissionDenied => ApplicationError::PermissionDenied { path },
        _ => ApplicationError::FilesystemError {
            path,
            reason: format!("Failed to {operation}: {e}"),
        },
    }
    .into()
}
