//! Deprecation warnings
//!
//! Warnings are computed on request from the merged, unsubstituted document
//! of a load. They never fail the load.

use std::fmt;

use blueprint_domain::{Document, document};
use semver::Version;

/// Placeholders that once had a brace-less form.
const LEGACY_PLACEHOLDERS: [&str; 3] = ["target_name", "platform", "scheme_name"];

/// A non-fatal finding about a spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecWarning {
    /// Dotted path of the offending value, e.g. `targetTemplates.App.sources[0]`.
    pub path: String,
    /// Human-readable description.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

/// Kind of a [`SpecWarning`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    /// A `$name` placeholder that should be written `${name}`.
    DeprecatedPlaceholder {
        /// Placeholder name without sigils.
        name: String,
    },
}

impl SpecWarning {
    /// Creates a deprecated placeholder warning.
    pub fn deprecated_placeholder(path: impl Into<String>, name: &str) -> Self {
        Self {
            path: path.into(),
            message: format!("'${name}' is deprecated, use '${{{name}}}'"),
            kind: WarningKind::DeprecatedPlaceholder {
                name: name.to_string(),
            },
        }
    }
}

impl fmt::Display for SpecWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// A check run over a merged document.
pub trait WarningRule: Send + Sync {
    /// First tool version the rule applies to.
    fn introduced_in(&self) -> Version;

    /// Appends findings for `document` to `warnings`.
    fn check(&self, document: &Document, warnings: &mut Vec<SpecWarning>);
}

/// Flags brace-less `$target_name`, `$platform` and `$scheme_name`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeprecatedPlaceholderRule;

impl WarningRule for DeprecatedPlaceholderRule {
    fn introduced_in(&self) -> Version {
        Version::new(0, 1, 0)
    }

    fn check(&self, document: &Document, warnings: &mut Vec<SpecWarning>) {
        document::visit_document_strings(document, "", &mut |path: &str, text: &str| {
            for name in LEGACY_PLACEHOLDERS {
                if contains_legacy(text, name) {
                    warnings.push(SpecWarning::deprecated_placeholder(path, name));
                }
            }
        });
    }
}

/// Whether `text` holds `$name` not followed by another identifier character.
fn contains_legacy(text: &str, name: &str) -> bool {
    let needle = format!("${name}");
    text.match_indices(&needle).any(|(index, _)| {
        text[index + needle.len()..]
            .chars()
            .next()
            .is_none_or(|next| !(next.is_ascii_alphanumeric() || next == '_'))
    })
}

/// The rules shipped with the loader.
#[must_use]
pub fn default_rules() -> Vec<Box<dyn WarningRule>> {
    vec![Box::new(DeprecatedPlaceholderRule)]
}

/// Runs every rule introduced at or before `version` over `document`.
#[must_use]
pub fn collect_warnings(
    rules: &[Box<dyn WarningRule>],
    version: &Version,
    document: &Document,
) -> Vec<SpecWarning> {
    let mut warnings = Vec::new();
    for rule in rules.iter().filter(|rule| rule.introduced_in() <= *version) {
        rule.check(document, &mut warnings);
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_domain::{doc, seq};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flags_brace_less_placeholders() {
        let document = doc! {
            "targetTemplates" => doc! {
                "Framework" => doc! { "sources" => seq!["$target_name/$platform/Sources"] },
            },
        };

        let warnings = collect_warnings(&default_rules(), &Version::new(2, 0, 0), &document);

        assert_eq!(
            warnings,
            vec![
                SpecWarning::deprecated_placeholder("targetTemplates.Framework.sources[0]", "target_name"),
                SpecWarning::deprecated_placeholder("targetTemplates.Framework.sources[0]", "platform"),
            ]
        );
        assert_eq!(
            warnings[0].to_string(),
            "targetTemplates.Framework.sources[0]: '$target_name' is deprecated, use '${target_name}'"
        );
    }

    #[test]
    fn test_braced_and_longer_names_pass() {
        let document = doc! {
            "sources" => seq!["${target_name}/${platform}", "$platforms", "$(SRCROOT)"],
        };

        assert!(collect_warnings(&default_rules(), &Version::new(2, 0, 0), &document).is_empty());
    }

    #[test]
    fn test_rules_are_gated_by_version() {
        let document = doc! { "name" => "$scheme_name" };

        assert!(collect_warnings(&default_rules(), &Version::new(0, 0, 9), &document).is_empty());
        assert_eq!(
            collect_warnings(&default_rules(), &Version::new(0, 1, 0), &document).len(),
            1
        );
    }

    #[test]
    fn test_default_rules_run_at_the_crate_version() {
        let document = doc! { "name" => "$target_name" };

        let warnings = collect_warnings(&default_rules(), &crate::crate_version(), &document);

        assert_eq!(warnings, vec![SpecWarning::deprecated_placeholder("name", "target_name")]);
    }
}
