//! Variable resolution module
//!
//! Provides parsing and substitution of `${variable}` placeholders.
//!
//! # Usage
//!
//! ```
//! use blueprint_application::variable_resolver::{VariableResolver, VariableScope};
//!
//! let scope = VariableScope::new().with_context("target_name", "App");
//! let resolver = VariableResolver::new(scope);
//!
//! let result = resolver.resolve("Sources/${target_name}/${missing}");
//! assert_eq!(result.resolved, "Sources/App/${missing}");
//! assert_eq!(result.unresolved, vec!["missing".to_string()]);
//! ```

pub mod engine;
pub mod parser;
pub mod scope;

pub use engine::{ResolutionResult, VariableResolver, substitute};
pub use parser::{VariableReference, is_valid_variable_name, parse_variables};
pub use scope::{ResolvedVariable, ScopeLayer, VariableMap, VariableScope};
