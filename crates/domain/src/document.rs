//! Generic document model
//!
//! Every input file, whatever its source format, is parsed into this untyped
//! tree before any resolution happens. Maps keep insertion order so that merge
//! order and target order stay deterministic.

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::Serialize;

/// An ordered, string-keyed map of values. The root of every parsed file.
pub type Document = IndexMap<String, Value>;

/// A single node of a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// An explicit null (`~` or an empty YAML value).
    #[default]
    Null,
    /// A boolean scalar.
    Bool(bool),
    /// An integer scalar.
    Int(i64),
    /// A floating point scalar.
    Float(OrderedFloat<f64>),
    /// A string scalar.
    String(String),
    /// An ordered sequence.
    Sequence(Vec<Value>),
    /// A nested map.
    Map(Document),
}

impl Value {
    /// Short name of the value's kind, used in type errors.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Map(_) => "map",
        }
    }

    /// Returns true for `Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string slice if this is a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean if this is a bool scalar.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the nested map, if any.
    #[must_use]
    pub const fn as_map(&self) -> Option<&Document> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the sequence items, if any.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Renders a scalar as text. Sequences, maps and null yield `None`.
    ///
    /// Floats with no fractional part render without a trailing `.0`, so the
    /// YAML scalar `10.0` becomes `"10"`.
    #[must_use]
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.0.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Null | Self::Sequence(_) | Self::Map(_) => None,
        }
    }

    /// Rebuilds the value with every string leaf passed through `f`.
    ///
    /// Map keys are never touched.
    #[must_use]
    pub fn map_strings<F>(self, f: &F) -> Self
    where
        F: Fn(&str) -> String,
    {
        match self {
            Self::String(s) => Self::String(f(&s)),
            Self::Sequence(items) => {
                Self::Sequence(items.into_iter().map(|item| item.map_strings(f)).collect())
            }
            Self::Map(map) => Self::Map(map_document_strings(map, f)),
            other => other,
        }
    }

    /// Visits every string leaf together with its dotted path.
    pub fn visit_strings<F>(&self, path: &str, visit: &mut F)
    where
        F: FnMut(&str, &str),
    {
        match self {
            Self::String(s) => visit(path, s),
            Self::Sequence(items) => {
                for (index, item) in items.iter().enumerate() {
                    item.visit_strings(&format!("{path}[{index}]"), visit);
                }
            }
            Self::Map(map) => visit_document_strings(map, path, visit),
            _ => {}
        }
    }
}

/// Rebuilds a document with every string leaf passed through `f`.
#[must_use]
pub fn map_document_strings<F>(document: Document, f: &F) -> Document
where
    F: Fn(&str) -> String,
{
    document
        .into_iter()
        .map(|(key, value)| (key, value.map_strings(f)))
        .collect()
}

/// Visits every string leaf of a document with its dotted path.
pub fn visit_document_strings<F>(document: &Document, prefix: &str, visit: &mut F)
where
    F: FnMut(&str, &str),
{
    for (key, value) in document {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        value.visit_strings(&path, visit);
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(OrderedFloat(value))
    }
}

impl From<Vec<Self>> for Value {
    fn from(value: Vec<Self>) -> Self {
        Self::Sequence(value)
    }
}

impl From<Document> for Value {
    fn from(value: Document) -> Self {
        Self::Map(value)
    }
}

/// Builds a [`Document`] from `key => value` pairs, in order.
///
/// ```
/// use blueprint_domain::{doc, seq};
///
/// let target = doc! {
///     "type" => "framework",
///     "sources" => seq!["Sources", "Shared"],
/// };
/// assert_eq!(target["type"].as_str(), Some("framework"));
/// ```
#[macro_export]
macro_rules! doc {
    () => {
        $crate::document::Document::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut document = $crate::document::Document::new();
        $(
            document.insert(::std::string::String::from($key), $crate::document::Value::from($value));
        )+
        document
    }};
}

/// Builds a [`Value::Sequence`] from values convertible into [`Value`].
#[macro_export]
macro_rules! seq {
    ($($value:expr),* $(,)?) => {
        $crate::document::Value::Sequence(::std::vec![$($crate::document::Value::from($value)),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scalar_text_renders_numbers() {
        assert_eq!(Value::from(10.0).scalar_text().as_deref(), Some("10"));
        assert_eq!(Value::from(3.2).scalar_text().as_deref(), Some("3.2"));
        assert_eq!(Value::from(7).scalar_text().as_deref(), Some("7"));
        assert_eq!(Value::Null.scalar_text(), None);
    }

    #[test]
    fn test_map_strings_leaves_keys_alone() {
        let document = doc! {
            "${key}" => seq!["${value}", 1],
            "nested" => doc! { "inner" => "${value}" },
        };
        let mapped = map_document_strings(document, &|s: &str| s.replace("${value}", "v"));

        assert_eq!(mapped["${key}"], seq!["v", 1]);
        assert_eq!(mapped["nested"], Value::Map(doc! { "inner" => "v" }));
    }

    #[test]
    fn test_visit_strings_reports_paths() {
        let document = doc! {
            "targets" => doc! { "App" => doc! { "sources" => seq!["a", "b"] } },
        };
        let mut seen = Vec::new();
        visit_document_strings(&document, "", &mut |path: &str, value: &str| {
            seen.push(format!("{path}={value}"));
        });

        assert_eq!(
            seen,
            vec!["targets.App.sources[0]=a", "targets.App.sources[1]=b"]
        );
    }

    #[test]
    fn test_document_keeps_insertion_order() {
        let document = doc! { "z" => 1, "a" => 2, "m" => 3 };
        let keys: Vec<&str> = document.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }
}
