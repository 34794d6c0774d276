//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the resolution pipeline and the outside
//! world. Each port is a trait implemented by adapters in the infrastructure
//! layer, and by in-memory doubles in tests.

mod document_parser;
mod file_system;

pub use document_parser::{DocumentFormat, DocumentParser, ParseError};
pub use file_system::{FileSystem, FileSystemError};
