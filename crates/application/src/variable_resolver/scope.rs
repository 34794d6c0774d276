//! Layered variable scope
//!
//! Placeholders resolve against four layers, checked in order (first wins):
//! 1. External - supplied by the caller, e.g. the process environment
//! 2. Spec defaults - the top-level `variables` map of the spec
//! 3. Template attributes - collected while flattening templates
//! 4. Context - `target_name`, `scheme_name`, `platform`

use std::fmt;

use indexmap::IndexMap;

/// Ordered variable map of one layer.
pub type VariableMap = IndexMap<String, String>;

/// The layer a variable was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeLayer {
    /// Supplied by the caller.
    External,
    /// The spec's own `variables` map.
    SpecDefaults,
    /// Template attributes.
    TemplateAttributes,
    /// Contextual names.
    Context,
}

impl ScopeLayer {
    /// Every layer, in resolution order.
    pub const ALL: [Self; 4] = [
        Self::External,
        Self::SpecDefaults,
        Self::TemplateAttributes,
        Self::Context,
    ];

    /// Returns the layer name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::External => "external",
            Self::SpecDefaults => "spec defaults",
            Self::TemplateAttributes => "template attributes",
            Self::Context => "context",
        }
    }
}

impl fmt::Display for ScopeLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A variable together with the layer it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVariable {
    /// Variable name.
    pub name: String,
    /// Resolved value.
    pub value: String,
    /// Layer the value came from.
    pub layer: ScopeLayer,
}

/// Holds every variable layer used for substitution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableScope {
    external: VariableMap,
    spec_defaults: VariableMap,
    template_attributes: VariableMap,
    context: VariableMap,
}

impl VariableScope {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the variables of one layer.
    #[must_use]
    pub const fn layer(&self, layer: ScopeLayer) -> &VariableMap {
        match layer {
            ScopeLayer::External => &self.external,
            ScopeLayer::SpecDefaults => &self.spec_defaults,
            ScopeLayer::TemplateAttributes => &self.template_attributes,
            ScopeLayer::Context => &self.context,
        }
    }

    const fn layer_mut(&mut self, layer: ScopeLayer) -> &mut VariableMap {
        match layer {
            ScopeLayer::External => &mut self.external,
            ScopeLayer::SpecDefaults => &mut self.spec_defaults,
            ScopeLayer::TemplateAttributes => &mut self.template_attributes,
            ScopeLayer::Context => &mut self.context,
        }
    }

    /// Sets one variable in a layer.
    pub fn set(&mut self, layer: ScopeLayer, name: impl Into<String>, value: impl Into<String>) {
        self.layer_mut(layer).insert(name.into(), value.into());
    }

    /// Replaces a whole layer.
    #[must_use]
    pub fn with_layer(mut self, layer: ScopeLayer, variables: VariableMap) -> Self {
        *self.layer_mut(layer) = variables;
        self
    }

    /// Sets the external layer.
    #[must_use]
    pub fn with_external(self, variables: VariableMap) -> Self {
        self.with_layer(ScopeLayer::External, variables)
    }

    /// Sets the spec defaults layer.
    #[must_use]
    pub fn with_spec_defaults(self, variables: VariableMap) -> Self {
        self.with_layer(ScopeLayer::SpecDefaults, variables)
    }

    /// Sets the template attributes layer.
    #[must_use]
    pub fn with_template_attributes(self, variables: VariableMap) -> Self {
        self.with_layer(ScopeLayer::TemplateAttributes, variables)
    }

    /// Adds one contextual variable.
    #[must_use]
    pub fn with_context(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(ScopeLayer::Context, name, value);
        self
    }

    /// Resolves a variable name to its value and layer.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<ResolvedVariable> {
        ScopeLayer::ALL.into_iter().find_map(|layer| {
            self.layer(layer).get(name).map(|value| ResolvedVariable {
                name: name.to_string(),
                value: value.clone(),
                layer,
            })
        })
    }

    /// Resolves a variable name to just its value.
    #[must_use]
    pub fn resolve_value(&self, name: &str) -> Option<&str> {
        ScopeLayer::ALL
            .into_iter()
            .find_map(|layer| self.layer(layer).get(name))
            .map(String::as_str)
    }

    /// Returns every variable name across all layers, without duplicates.
    #[must_use]
    pub fn all_variable_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for layer in ScopeLayer::ALL {
            for name in self.layer(layer).keys() {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Whether every layer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        ScopeLayer::ALL
            .into_iter()
            .all(|layer| self.layer(layer).is_empty())
    }
}
