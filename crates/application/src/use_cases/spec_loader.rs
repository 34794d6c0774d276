//! Load project use case.

use std::path::Path;

use blueprint_domain::{Document, Project, Value};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::LoaderConfig;
use crate::error::LoadResult;
use crate::expansion::expand_nodes;
use crate::include::IncludeMerger;
use crate::ports::{DocumentParser, FileSystem};
use crate::templates::{
    ATTRIBUTES_KEY, SCHEME_TEMPLATES, TARGET_TEMPLATES, TEMPLATES_KEY, TemplateResolver,
};
use crate::variable_resolver::{VariableMap, VariableResolver, VariableScope};
use crate::warnings::{SpecWarning, WarningRule, collect_warnings, default_rules};

/// Key of the spec-declared variable defaults.
pub const VARIABLES_KEY: &str = "variables";

const TARGETS: &str = "targets";
const SCHEMES: &str = "schemes";

/// Use case for loading a spec into a [`Project`].
///
/// Loading runs these stages in order:
/// include merge, substitution of external and spec variables, platform
/// fan-out, template flattening, a second fan-out, and decoding.
pub struct SpecLoader<F: FileSystem, P: DocumentParser> {
    fs: F,
    parser: P,
    config: LoaderConfig,
    rules: Vec<Box<dyn WarningRule>>,
    raw_document: Option<Document>,
}

impl<F: FileSystem, P: DocumentParser> SpecLoader<F, P> {
    /// Creates a loader with the default warning rules.
    #[must_use]
    pub fn new(fs: F, parser: P, config: LoaderConfig) -> Self {
        Self {
            fs,
            parser,
            config,
            rules: default_rules(),
            raw_document: None,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Merged document of the last successful load, before substitution.
    #[must_use]
    pub const fn raw_document(&self) -> Option<&Document> {
        self.raw_document.as_ref()
    }

    /// Loads, resolves and decodes the spec at `path`.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error of any stage. No partial project is
    /// produced.
    pub fn load_project(&mut self, path: &Path) -> LoadResult<Project> {
        let raw = IncludeMerger::new(&self.fs, &self.parser, self.config.variables()).merge(path)?;
        let resolved = self.resolve_document(raw.clone())?;
        let project = Project::decode(&resolved)?;

        info!(
            path = %path.display(),
            targets = project.targets.len(),
            schemes = project.schemes.len(),
            "Loaded project"
        );
        self.raw_document = Some(raw);
        Ok(project)
    }

    /// Resolves a merged document up to, but not including, decoding.
    ///
    /// # Errors
    ///
    /// Fails when a template is missing or malformed.
    pub fn resolve_document(&self, mut document: Document) -> LoadResult<Document> {
        let defaults = spec_defaults(document.shift_remove(VARIABLES_KEY).as_ref());
        let scope = VariableScope::new()
            .with_external(self.config.variables().clone())
            .with_spec_defaults(defaults);
        let mut document = VariableResolver::new(scope.clone()).substitute_document(document);

        let mut target_templates = take_table(&mut document, TARGET_TEMPLATES);
        // legacy name of the target template table, `targetTemplates` wins
        for (name, template) in take_table(&mut document, TEMPLATES_KEY) {
            target_templates.entry(name).or_insert(template);
        }
        let scheme_templates = take_table(&mut document, SCHEME_TEMPLATES);
        document.shift_remove(ATTRIBUTES_KEY);

        if let Some(Value::Map(targets)) = document.shift_remove(TARGETS) {
            let resolver = TemplateResolver::new(TARGET_TEMPLATES, &target_templates, &scope);
            let targets = expand_nodes(targets)?;
            let targets = self.resolve_nodes(targets, &resolver, TARGETS, "target_name")?;
            document.insert(TARGETS.to_string(), Value::Map(expand_nodes(targets)?));
        }

        if let Some(Value::Map(schemes)) = document.shift_remove(SCHEMES) {
            let resolver = TemplateResolver::new(SCHEME_TEMPLATES, &scheme_templates, &scope);
            let schemes = self.resolve_nodes(schemes, &resolver, SCHEMES, "scheme_name")?;
            document.insert(SCHEMES.to_string(), Value::Map(schemes));
        }

        Ok(document)
    }

    /// Runs the warning rules over the merged document of the last load.
    ///
    /// Returns nothing when no project has been loaded yet.
    #[must_use]
    pub fn validate_warnings(&self) -> Vec<SpecWarning> {
        let Some(document) = &self.raw_document else {
            return Vec::new();
        };

        let warnings = collect_warnings(&self.rules, self.config.version(), document);
        for warning in &warnings {
            warn!(path = %warning.path, "{}", warning.message);
        }
        warnings
    }

    fn resolve_nodes(
        &self,
        nodes: Document,
        resolver: &TemplateResolver<'_>,
        section: &str,
        context_name: &str,
    ) -> LoadResult<Document> {
        let resolve = |(name, value): (String, Value)| -> LoadResult<(String, Value)> {
            let node = match value {
                Value::Map(node) => node,
                other => return Ok((name, other)),
            };
            let context = [(context_name, name.as_str())];
            let resolved = resolver.resolve(node, &format!("{section}.{name}"), &context)?;
            Ok((name, Value::Map(resolved)))
        };

        let entries: Vec<(String, Value)> = nodes.into_iter().collect();
        debug!(section, count = entries.len(), parallel = self.config.parallel(), "Resolving templates");

        // collect per entry so the first failure in declaration order wins
        let results: Vec<LoadResult<(String, Value)>> = if self.config.parallel() {
            entries.into_par_iter().map(resolve).collect()
        } else {
            entries.into_iter().map(resolve).collect()
        };
        results.into_iter().collect()
    }
}

/// Removes a template table from `document`, empty when absent.
fn take_table(document: &mut Document, key: &str) -> Document {
    match document.shift_remove(key) {
        Some(Value::Map(table)) => table,
        _ => Document::new(),
    }
}

/// Scalar spec variables rendered as text.
fn spec_defaults(value: Option<&Value>) -> VariableMap {
    value
        .and_then(Value::as_map)
        .map(|map| {
            map.iter()
                .filter_map(|(key, value)| value.scalar_text().map(|text| (key.clone(), text)))
                .collect()
        })
        .unwrap_or_default()
}
