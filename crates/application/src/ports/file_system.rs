//! File system abstraction port.

use std::path::{Path, PathBuf};

use blueprint_domain::path;

/// Error type for file system operations.
#[derive(Debug, thiserror::Error)]
pub enum FileSystemError {
    /// File not found.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Permission denied.
    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Abstraction over the read-only file access the loader needs.
///
/// This trait allows running the pipeline against in-memory files in tests.
pub trait FileSystem: Send + Sync {
    /// Reads a file's contents as bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    fn read_file(&self, path: &Path) -> Result<Vec<u8>, FileSystemError>;

    /// Checks whether a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Resolves `relative` against the directory `base`.
    ///
    /// The default joins and normalizes lexically. Absolute `relative` paths
    /// are returned as they are, normalized.
    fn resolve(&self, base: &Path, relative: &str) -> PathBuf {
        path::join_normalized(base, relative)
    }
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>, FileSystemError> {
        (**self).read_file(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn resolve(&self, base: &Path, relative: &str) -> PathBuf {
        (**self).resolve(base, relative)
    }
}
