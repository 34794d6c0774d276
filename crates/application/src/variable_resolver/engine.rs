//! Variable substitution engine
//!
//! Resolves `${variable}` placeholders against a [`VariableScope`]. Unresolved
//! placeholders are kept verbatim so a later pass can still fill them in.

use blueprint_domain::{Document, Value, document};

use super::parser::parse_variables;
use super::scope::{ResolvedVariable, VariableScope};

/// Result of substituting one string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    /// The string with every resolvable placeholder replaced.
    pub resolved: String,

    /// Variables that were resolved.
    pub resolved_variables: Vec<ResolvedVariable>,

    /// Names that could not be resolved.
    pub unresolved: Vec<String>,

    /// Whether every placeholder was resolved.
    pub is_complete: bool,
}

impl ResolutionResult {
    /// Creates a result for input with no placeholders.
    #[must_use]
    pub fn no_variables(input: &str) -> Self {
        Self {
            resolved: input.to_string(),
            resolved_variables: Vec::new(),
            unresolved: Vec::new(),
            is_complete: true,
        }
    }
}

/// Substitutes placeholders using one scope.
#[derive(Debug, Clone, Default)]
pub struct VariableResolver {
    scope: VariableScope,
}

impl VariableResolver {
    /// Creates a resolver over `scope`.
    #[must_use]
    pub const fn new(scope: VariableScope) -> Self {
        Self { scope }
    }

    /// Returns the scope.
    #[must_use]
    pub const fn scope(&self) -> &VariableScope {
        &self.scope
    }

    /// Resolves every placeholder in `input`.
    #[must_use]
    pub fn resolve(&self, input: &str) -> ResolutionResult {
        let references = parse_variables(input);
        if references.is_empty() {
            return ResolutionResult::no_variables(input);
        }

        let mut resolved_variables = Vec::new();
        let mut unresolved = Vec::new();
        let mut result = String::with_capacity(input.len());
        let mut last_end = 0;

        for reference in &references {
            result.push_str(&input[last_end..reference.span.start]);

            if let Some(variable) = self.scope.resolve(&reference.name) {
                result.push_str(&variable.value);
                resolved_variables.push(variable);
            } else {
                // keep ${name} for a later pass
                result.push_str(&input[reference.span.clone()]);
                unresolved.push(reference.name.clone());
            }

            last_end = reference.span.end;
        }
        result.push_str(&input[last_end..]);

        let is_complete = unresolved.is_empty();
        ResolutionResult {
            resolved: result,
            resolved_variables,
            unresolved,
            is_complete,
        }
    }

    /// Substitutes a single string.
    #[must_use]
    pub fn substitute(&self, input: &str) -> String {
        if !input.contains("${") {
            return input.to_string();
        }
        self.resolve(input).resolved
    }

    /// Substitutes every string leaf of a value. Keys are left untouched.
    #[must_use]
    pub fn substitute_value(&self, value: Value) -> Value {
        if self.scope.is_empty() {
            return value;
        }
        value.map_strings(&|text: &str| self.substitute(text))
    }

    /// Substitutes every string leaf of a document. Keys are left untouched.
    #[must_use]
    pub fn substitute_document(&self, document: Document) -> Document {
        if self.scope.is_empty() {
            return document;
        }
        document::map_document_strings(document, &|text: &str| self.substitute(text))
    }
}

/// Substitutes `text` against `scope`.
#[must_use]
pub fn substitute(text: &str, scope: &VariableScope) -> String {
    VariableResolver::new(scope.clone()).substitute(text)
}
