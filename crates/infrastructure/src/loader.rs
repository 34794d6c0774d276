//! Convenience facade over the spec loader with the real adapters.

use std::path::Path;

use blueprint_application::{LoadResult, LoaderConfig, SpecLoader, SpecWarning};
use blueprint_domain::Project;

use crate::environment::process_variables;
use crate::fs::StdFileSystem;
use crate::parser::SerdeDocumentParser;

/// Loads specs from disk.
pub struct ProjectLoader {
    inner: SpecLoader<StdFileSystem, SerdeDocumentParser>,
}

impl ProjectLoader {
    /// Creates a loader with `config`.
    #[must_use]
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            inner: SpecLoader::new(StdFileSystem::new(), SerdeDocumentParser::new(), config),
        }
    }

    /// Creates a loader whose external variables are the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(LoaderConfig::builder().variables(process_variables()).build())
    }

    /// Loads the spec at `path`.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error met while loading.
    pub fn load(&mut self, path: impl AsRef<Path>) -> LoadResult<Project> {
        self.inner.load_project(path.as_ref())
    }

    /// Warnings for the last loaded spec.
    #[must_use]
    pub fn warnings(&self) -> Vec<SpecWarning> {
        self.inner.validate_warnings()
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &LoaderConfig {
        self.inner.config()
    }
}

impl Default for ProjectLoader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

/// Loads the spec at `path` with default settings.
///
/// # Errors
///
/// Returns the first fatal error met while loading.
pub fn load_project(path: impl AsRef<Path>) -> LoadResult<Project> {
    ProjectLoader::default().load(path)
}
