//! Blueprint Application - Spec resolution pipeline
//!
//! This crate turns a root spec file into a resolved [`Project`]. It merges
//! includes, substitutes `${}` variables, flattens templates, fans targets
//! out per platform and decodes the result. File access and parsing are
//! reached through the ports in [`ports`].
//!
//! [`Project`]: blueprint_domain::Project

pub mod config;
pub mod error;
pub mod expansion;
pub mod include;
pub mod merge;
pub mod ports;
pub mod templates;
pub mod use_cases;
pub mod variable_resolver;
pub mod warnings;

#[cfg(test)]
mod test_support;

pub use config::{LoaderConfig, LoaderConfigBuilder, crate_version};
pub use error::{LoadError, LoadResult};
pub use include::{IncludeEntry, IncludeMerger};
pub use merge::{merge_documents, merge_values};
pub use ports::{DocumentFormat, DocumentParser, FileSystem, FileSystemError, ParseError};
pub use templates::TemplateResolver;
pub use use_cases::SpecLoader;
pub use variable_resolver::{ScopeLayer, VariableResolver, VariableScope};
pub use warnings::{SpecWarning, WarningKind, WarningRule};
