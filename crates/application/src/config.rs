//! Loader configuration.

use indexmap::IndexMap;
use semver::Version;

/// Settings for one [`SpecLoader`](crate::SpecLoader).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    version: Version,
    variables: IndexMap<String, String>,
    parallel: bool,
}

impl LoaderConfig {
    /// Returns a builder.
    #[must_use]
    pub fn builder() -> LoaderConfigBuilder {
        LoaderConfigBuilder::default()
    }

    /// Tool version, used to select warning rules.
    #[must_use]
    pub const fn version(&self) -> &Version {
        &self.version
    }

    /// Externally supplied variables. These override every other layer.
    #[must_use]
    pub const fn variables(&self) -> &IndexMap<String, String> {
        &self.variables
    }

    /// Whether targets and schemes are resolved concurrently.
    #[must_use]
    pub const fn parallel(&self) -> bool {
        self.parallel
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Version of this crate, the default tool version.
#[must_use]
pub fn crate_version() -> Version {
    Version::parse(env!("CARGO_PKG_VERSION")).unwrap_or_else(|_| Version::new(0, 0, 0))
}

/// Builder for [`LoaderConfig`].
#[derive(Debug, Default)]
pub struct LoaderConfigBuilder {
    version: Option<Version>,
    variables: IndexMap<String, String>,
    sequential: bool,
}

impl LoaderConfigBuilder {
    /// Sets the tool version.
    #[must_use]
    pub fn version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    /// Adds one external variable.
    #[must_use]
    pub fn variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Adds external variables, later entries replacing earlier ones.
    #[must_use]
    pub fn variables<I, K, V>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.variables
            .extend(variables.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Enables or disables concurrent resolution. Enabled by default.
    #[must_use]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.sequential = !parallel;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> LoaderConfig {
        LoaderConfig {
            version: self.version.unwrap_or_else(crate_version),
            variables: self.variables,
            parallel: !self.sequential,
        }
    }
}
