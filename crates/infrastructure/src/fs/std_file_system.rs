//! Real file system implementation.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use blueprint_application::ports::{FileSystem, FileSystemError};
use tracing::trace;

/// Real file system implementation using `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl StdFileSystem {
    /// Creates a new `StdFileSystem`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FileSystem for StdFileSystem {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>, FileSystemError> {
        trace!(path = %path.display(), "Reading file");
        fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FileSystemError::NotFound(path.to_path_buf()),
            ErrorKind::PermissionDenied => FileSystemError::PermissionDenied(path.to_path_buf()),
            _ => FileSystemError::Io(e),
        })
    }

    fn exists(&self, path: &Path) -> bool {
        fs::metadata(path).is_ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_read_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("project.yml");
        fs::write(&file, "name: App\n").unwrap();

        let fs = StdFileSystem::new();
        assert!(fs.exists(&file));
        assert_eq!(fs.read_file(&file).unwrap(), b"name: App\n");
    }

    #[test]
    fn test_missing_file_maps_to_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("missing.yml");

        let fs = StdFileSystem::new();
        assert!(!fs.exists(&file));
        match fs.read_file(&file) {
            Err(FileSystemError::NotFound(path)) => assert_eq!(path, file),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_is_lexical() {
        let resolved = StdFileSystem::new().resolve(Path::new("/specs/app"), "../shared/./base.yml");
        assert_eq!(resolved, PathBuf::from("/specs/shared/base.yml"));
    }
}
