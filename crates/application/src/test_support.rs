//! In-memory port doubles for unit tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use blueprint_domain::{Document, path};

use crate::ports::{DocumentFormat, DocumentParser, FileSystem, FileSystemError, ParseError};

/// Pre-parsed documents keyed by path.
///
/// Acts as both ports: reading a file yields its path as bytes, and parsing
/// those bytes looks the document back up.
#[derive(Debug, Default)]
pub struct MemoryFiles {
    documents: HashMap<PathBuf, Document>,
}

impl MemoryFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, file: &str, document: Document) -> Self {
        self.documents
            .insert(path::normalize(Path::new(file)), document);
        self
    }
}

impl FileSystem for MemoryFiles {
    fn read_file(&self, file: &Path) -> Result<Vec<u8>, FileSystemError> {
        let key = path::normalize(file);
        if self.documents.contains_key(&key) {
            Ok(key.to_string_lossy().into_owned().into_bytes())
        } else {
            Err(FileSystemError::NotFound(file.to_path_buf()))
        }
    }

    fn exists(&self, file: &Path) -> bool {
        self.documents.contains_key(&path::normalize(file))
    }
}

impl DocumentParser for MemoryFiles {
    fn parse(&self, bytes: &[u8], format: DocumentFormat) -> Result<Document, ParseError> {
        let key = PathBuf::from(String::from_utf8_lossy(bytes).into_owned());
        self.documents
            .get(&key)
            .cloned()
            .ok_or_else(|| ParseError::Syntax {
                format,
                message: format!("no document for {}", key.display()),
            })
    }
}
