//! Template flattening
//!
//! Targets and schemes can list `templates` to inherit fields from named
//! fragments in a template table. Resolution runs two passes over the
//! reference graph:
//!
//! 1. attributes, pre-order: the node's own `templateAttributes` first, then
//!    each template's, a key keeping the first value seen;
//! 2. fields, post-order: a template's own templates are flattened before its
//!    fields are appended, and the node's fields are merged last.
//!
//! A template already visited in a pass is skipped, which keeps shared and
//! cyclic references finite and contributing once.

use std::collections::HashSet;

use blueprint_domain::{Document, ModelError, Value};
use tracing::{debug, trace};

use crate::error::{LoadError, LoadResult};
use crate::merge::merge_documents;
use crate::variable_resolver::{VariableMap, VariableResolver, VariableScope};

/// Key listing the templates a node or template uses.
pub const TEMPLATES_KEY: &str = "templates";

/// Key holding template attribute values.
pub const ATTRIBUTES_KEY: &str = "templateAttributes";

/// Table of target templates.
pub const TARGET_TEMPLATES: &str = "targetTemplates";

/// Table of scheme templates.
pub const SCHEME_TEMPLATES: &str = "schemeTemplates";

const PLATFORM: &str = "platform";

/// Resolves template references against one template table.
#[derive(Debug, Clone, Copy)]
pub struct TemplateResolver<'a> {
    table: &'static str,
    templates: &'a Document,
    scope: &'a VariableScope,
}

impl<'a> TemplateResolver<'a> {
    /// Creates a resolver over the table named `table`.
    ///
    /// `scope` holds the outer variable layers; attributes and context are
    /// added per node.
    #[must_use]
    pub const fn new(table: &'static str, templates: &'a Document, scope: &'a VariableScope) -> Self {
        Self {
            table,
            templates,
            scope,
        }
    }

    /// Flattens `node` and substitutes its strings.
    ///
    /// `node_path` locates the node in errors, e.g. `targets.App`. `context`
    /// supplies the built-in variables such as `target_name`. A scalar
    /// `platform` on the flattened node is bound as `${platform}` unless the
    /// context already names one. The result carries neither `templates` nor
    /// `templateAttributes`.
    ///
    /// # Errors
    ///
    /// Fails with [`LoadError::UnknownTemplate`] when a referenced template
    /// does not exist, and with a model error when a template is not a map.
    pub fn resolve(
        &self,
        mut node: Document,
        node_path: &str,
        context: &[(&str, &str)],
    ) -> LoadResult<Document> {
        let names = template_names(node.shift_remove(TEMPLATES_KEY).as_ref());
        let mut attributes = attribute_map(node.shift_remove(ATTRIBUTES_KEY).as_ref());

        let resolved = if names.is_empty() {
            node
        } else {
            debug!(node = node_path, templates = ?names, "Resolving templates");
            self.collect_attributes(&names, node_path, &mut attributes, &mut HashSet::new())?;
            let inherited = self.flatten(&names, node_path, &mut HashSet::new())?;
            merge_documents(inherited, node)
        };

        let mut scope = self.scope.clone().with_template_attributes(attributes);
        for (name, value) in context {
            scope = scope.with_context(*name, *value);
        }
        if !context.iter().any(|(name, _)| *name == PLATFORM)
            && let Some(platform) = resolved.get(PLATFORM).and_then(Value::as_str)
        {
            scope = scope.with_context(PLATFORM, platform);
        }
        Ok(VariableResolver::new(scope).substitute_document(resolved))
    }

    fn template(&self, name: &str, node_path: &str) -> LoadResult<&'a Document> {
        match self.templates.get(name) {
            Some(Value::Map(template)) => Ok(template),
            Some(other) => Err(ModelError::InvalidType {
                path: format!("{}.{name}", self.table),
                expected: "map",
                found: other.kind(),
            }
            .into()),
            None => Err(LoadError::UnknownTemplate {
                name: name.to_string(),
                node: node_path.to_string(),
                table: self.table,
            }),
        }
    }

    fn collect_attributes(
        &self,
        names: &[String],
        node_path: &str,
        attributes: &mut VariableMap,
        visited: &mut HashSet<String>,
    ) -> LoadResult<()> {
        for name in names {
            if !visited.insert(name.clone()) {
                continue;
            }
            let template = self.template(name, node_path)?;
            for (key, value) in attribute_map(template.get(ATTRIBUTES_KEY)) {
                attributes.entry(key).or_insert(value);
            }
            let nested = template_names(template.get(TEMPLATES_KEY));
            self.collect_attributes(&nested, node_path, attributes, visited)?;
        }
        Ok(())
    }

    fn flatten(
        &self,
        names: &[String],
        node_path: &str,
        expanded: &mut HashSet<String>,
    ) -> LoadResult<Document> {
        let mut merged = Document::new();
        for name in names {
            if expanded.contains(name) {
                trace!(template = %name, "Template already expanded");
                continue;
            }
            let template = self.template(name, node_path)?;
            expanded.insert(name.clone());

            let nested = template_names(template.get(TEMPLATES_KEY));
            let inherited = self.flatten(&nested, node_path, expanded)?;
            merged = merge_documents(merged, inherited);

            let own = template
                .iter()
                .filter(|(key, _)| key.as_str() != TEMPLATES_KEY && key.as_str() != ATTRIBUTES_KEY)
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            merged = merge_documents(merged, own);
        }
        Ok(merged)
    }
}

/// Template names listed by a `templates` value: a name or a list of names.
fn template_names(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Sequence(items)) => items.iter().filter_map(Value::scalar_text).collect(),
        Some(other) => other.scalar_text().into_iter().collect(),
        None => Vec::new(),
    }
}

/// Scalar attributes rendered as text. Nested values are ignored.
fn attribute_map(value: Option<&Value>) -> VariableMap {
    value
        .and_then(Value::as_map)
        .map(|map| {
            map.iter()
                .filter_map(|(key, value)| value.scalar_text().map(|text| (key.clone(), text)))
                .collect()
        })
        .unwrap_or_default()
}
