//! Application error types

use std::path::PathBuf;

use blueprint_domain::ModelError;
use thiserror::Error;

use crate::ports::{FileSystemError, ParseError};

/// Errors that abort loading a project.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The root document or an include could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying error.
        source: FileSystemError,
    },

    /// The root document or an include is not well formed.
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        /// File that could not be parsed.
        path: PathBuf,
        /// Underlying error.
        source: ParseError,
    },

    /// An `include` entry has an unusable shape.
    #[error("{}: invalid include at {at}: {message}", .path.display())]
    InvalidInclude {
        /// File containing the entry.
        path: PathBuf,
        /// Location of the entry, e.g. `include[1]`.
        at: String,
        /// What is wrong with it.
        message: String,
    },

    /// A node references a template that does not exist.
    #[error("{node}: unknown template '{name}' in {table}")]
    UnknownTemplate {
        /// Missing template name.
        name: String,
        /// Path of the referencing node, e.g. `targets.App`.
        node: String,
        /// Template table that was searched.
        table: &'static str,
    },

    /// A platform copy of a target takes a name already in use.
    #[error("targets.{node}: platform copy '{name}' collides with an existing target")]
    TargetNameCollision {
        /// Name of the colliding copy.
        name: String,
        /// Target that was fanned out.
        node: String,
    },

    /// The resolved document does not decode into a valid project.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type alias for loading.
pub type LoadResult<T> = Result<T, LoadError>;
