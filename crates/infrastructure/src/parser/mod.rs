//! Document parser adapters.
//!
//! YAML and JSON are both read into the format-independent
//! [`Document`](blueprint_domain::Document) tree.

mod serde_parser;

pub use serde_parser::SerdeDocumentParser;
