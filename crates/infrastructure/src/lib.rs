//! Blueprint Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, and a loader wired with them.

pub mod environment;
pub mod fs;
pub mod loader;
pub mod parser;
pub mod serialization;

pub use environment::process_variables;
pub use fs::StdFileSystem;
pub use loader::{ProjectLoader, load_project};
pub use parser::SerdeDocumentParser;
pub use serialization::{DumpError, project_to_json, write_project_json};
