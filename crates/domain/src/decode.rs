//! Path-tracking field reader used by the model decoders.
//!
//! [`Fields`] wraps one map of a document together with its dotted location,
//! so every error raised while decoding names the exact node at fault.

use std::sync::LazyLock;

use indexmap::IndexMap;
use semver::Version;

use crate::document::{Document, Value};
use crate::error::{ModelError, ModelResult};
use crate::version;

static EMPTY: LazyLock<Document> = LazyLock::new(Document::new);

/// A borrowed map plus the path it was reached by.
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    map: &'a Document,
    path: String,
}

impl<'a> Fields<'a> {
    /// Wraps a map found at `path`.
    #[must_use]
    pub fn new(map: &'a Document, path: impl Into<String>) -> Self {
        Self {
            map,
            path: path.into(),
        }
    }

    /// Wraps a value that must be a map. `Null` is read as an empty map.
    pub fn from_value(value: &'a Value, path: impl Into<String>) -> ModelResult<Self> {
        let path = path.into();
        match value {
            Value::Map(map) => Ok(Self { map, path }),
            Value::Null => Ok(Self { map: &EMPTY, path }),
            other => Err(ModelError::InvalidType {
                path,
                expected: "map",
                found: other.kind(),
            }),
        }
    }

    /// Path of this map.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The wrapped map.
    #[must_use]
    pub const fn map(&self) -> &'a Document {
        self.map
    }

    /// Path of a child field.
    #[must_use]
    pub fn field_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    /// Path of the `index`th item of a list field.
    #[must_use]
    pub fn item_path(&self, key: &str, index: usize) -> String {
        format!("{}[{index}]", self.field_path(key))
    }

    /// Returns the value under `key`, treating `Null` as absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|value| !value.is_null())
    }

    /// Whether `key` is present with a non-null value.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn type_error(&self, key: &str, expected: &'static str, found: &Value) -> ModelError {
        ModelError::InvalidType {
            path: self.field_path(key),
            expected,
            found: found.kind(),
        }
    }

    /// Reads a string. Numeric scalars are accepted and rendered as text.
    pub fn string(&self, key: &str) -> ModelResult<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(value @ (Value::Int(_) | Value::Float(_))) => Ok(value.scalar_text()),
            Some(other) => Err(self.type_error(key, "string", other)),
        }
    }

    /// Reads a required string.
    pub fn required_string(&self, key: &str) -> ModelResult<String> {
        self.string(key)?.ok_or_else(|| ModelError::MissingField {
            path: self.field_path(key),
        })
    }

    /// Reads a boolean. `YES`/`NO`/`true`/`false` strings and `0`/`1` are accepted.
    pub fn bool(&self, key: &str) -> ModelResult<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::Int(0)) => Ok(Some(false)),
            Some(Value::Int(1)) => Ok(Some(true)),
            Some(value @ Value::String(s)) => match s.to_ascii_lowercase().as_str() {
                "yes" | "true" => Ok(Some(true)),
                "no" | "false" => Ok(Some(false)),
                _ => Err(self.type_error(key, "bool", value)),
            },
            Some(other) => Err(self.type_error(key, "bool", other)),
        }
    }

    /// Reads a boolean, falling back to `default` when absent.
    pub fn bool_or(&self, key: &str, default: bool) -> ModelResult<bool> {
        Ok(self.bool(key)?.unwrap_or(default))
    }

    /// Reads an integer. Numeric strings are accepted.
    pub fn int(&self, key: &str) -> ModelResult<Option<i64>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Int(i)) => Ok(Some(*i)),
            Some(value @ Value::String(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| self.type_error(key, "integer", value)),
            Some(other) => Err(self.type_error(key, "integer", other)),
        }
    }

    /// Reads a list of strings. A lone string is read as a one-item list.
    pub fn string_list(&self, key: &str) -> ModelResult<Vec<String>> {
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(Value::String(s)) => Ok(vec![s.clone()]),
            Some(Value::Sequence(items)) => items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    item.scalar_text().ok_or_else(|| ModelError::InvalidType {
                        path: self.item_path(key, index),
                        expected: "string",
                        found: item.kind(),
                    })
                })
                .collect(),
            Some(other) => Err(self.type_error(key, "list of strings", other)),
        }
    }

    /// Reads a sequence, returning an empty slice when absent.
    pub fn sequence(&self, key: &str) -> ModelResult<&'a [Value]> {
        match self.get(key) {
            None => Ok(&[]),
            Some(Value::Sequence(items)) => Ok(items),
            Some(other) => Err(self.type_error(key, "sequence", other)),
        }
    }

    /// Reads a nested map as another reader.
    pub fn child(&self, key: &str) -> ModelResult<Option<Self>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => Self::from_value(value, self.field_path(key)).map(Some),
        }
    }

    /// Reads a nested map as a plain document, empty when absent.
    pub fn document(&self, key: &str) -> ModelResult<Document> {
        Ok(self
            .child(key)?
            .map(|child| child.map.clone())
            .unwrap_or_default())
    }

    /// Reads a map of scalar values as strings.
    pub fn string_map(&self, key: &str) -> ModelResult<IndexMap<String, String>> {
        let Some(child) = self.child(key)? else {
            return Ok(IndexMap::new());
        };
        child
            .map
            .iter()
            .map(|(name, value)| {
                value
                    .scalar_text()
                    .map(|text| (name.clone(), text))
                    .ok_or_else(|| child.type_error(name, "string", value))
            })
            .collect()
    }

    /// Reads a map of booleans, such as command line arguments.
    pub fn bool_map(&self, key: &str) -> ModelResult<IndexMap<String, bool>> {
        let Some(child) = self.child(key)? else {
            return Ok(IndexMap::new());
        };
        child
            .map
            .keys()
            .map(|name| -> ModelResult<(String, bool)> {
                Ok((name.clone(), child.bool(name)?.unwrap_or(false)))
            })
            .collect()
    }

    /// Reads a map whose values are themselves maps, in document order.
    pub fn named(&self, key: &str) -> ModelResult<Vec<(String, Self)>> {
        let Some(child) = self.child(key)? else {
            return Ok(Vec::new());
        };
        child
            .map
            .iter()
            .map(|(name, value)| {
                Self::from_value(value, child.field_path(name)).map(|fields| (name.clone(), fields))
            })
            .collect()
    }

    /// Reads a list whose items are maps.
    pub fn maps(&self, key: &str) -> ModelResult<Vec<Self>> {
        self.sequence(key)?
            .iter()
            .enumerate()
            .map(|(index, item)| Self::from_value(item, self.item_path(key, index)))
            .collect()
    }

    /// Reads a literal and maps it through `parse`, reporting unknown literals
    /// with `unknown`.
    pub fn literal<T>(
        &self,
        key: &str,
        parse: impl Fn(&str) -> Option<T>,
        unknown: impl FnOnce(String, String) -> ModelError,
    ) -> ModelResult<Option<T>> {
        match self.string(key)? {
            None => Ok(None),
            Some(text) => match parse(&text) {
                Some(value) => Ok(Some(value)),
                None => Err(unknown(self.field_path(key), text)),
            },
        }
    }

    /// Reads a literal of a named enumeration, reporting [`ModelError::UnknownLiteral`].
    pub fn enumeration<T>(
        &self,
        key: &str,
        kind: &'static str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> ModelResult<Option<T>> {
        self.literal(key, parse, |path, value| ModelError::UnknownLiteral {
            path,
            kind,
            value,
        })
    }

    /// Reads a loosely written version such as `9` or `10.1`.
    pub fn lenient_version(&self, key: &str) -> ModelResult<Option<Version>> {
        self.version_with(key, version::parse_lenient)
    }

    /// Reads a strict semantic version.
    pub fn strict_version(&self, key: &str) -> ModelResult<Option<Version>> {
        self.version_with(key, version::parse_strict)
    }

    fn version_with(
        &self,
        key: &str,
        parse: fn(&str) -> Option<Version>,
    ) -> ModelResult<Option<Version>> {
        self.literal(key, parse, |path, value| ModelError::InvalidVersion {
            path,
            value,
        })
    }

    /// Finds which one of the `markers` keys is present.
    ///
    /// Returns `None` when none is present and fails when more than one is.
    pub fn marker(&self, markers: &[&'static str]) -> ModelResult<Option<&'static str>> {
        let present: Vec<&'static str> = markers
            .iter()
            .copied()
            .filter(|marker| self.contains(marker))
            .collect();
        match present.as_slice() {
            [] => Ok(None),
            [single] => Ok(Some(*single)),
            many => Err(ModelError::AmbiguousMarkers {
                path: self.path.clone(),
                markers: many.join(", "),
            }),
        }
    }

    /// Like [`Fields::marker`] but fails when no marker is present.
    pub fn required_marker(&self, markers: &[&'static str]) -> ModelResult<&'static str> {
        self.marker(markers)?.ok_or_else(|| ModelError::MissingMarker {
            path: self.path.clone(),
            expected: markers.join(", "),
        })
    }

    /// Comma separated keys of the map, for diagnostics.
    #[must_use]
    pub fn key_list(&self) -> String {
        self.map
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::{doc, seq};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lenient_bools() {
        let map = doc! { "a" => "YES", "b" => "no", "c" => true, "d" => 1, "e" => "maybe" };
        let fields = Fields::new(&map, "root");

        assert_eq!(fields.bool("a").unwrap(), Some(true));
        assert_eq!(fields.bool("b").unwrap(), Some(false));
        assert_eq!(fields.bool("c").unwrap(), Some(true));
        assert_eq!(fields.bool("d").unwrap(), Some(true));
        assert_eq!(fields.bool("missing").unwrap(), None);
        assert!(matches!(
            fields.bool("e"),
            Err(ModelError::InvalidType { path, .. }) if path == "root.e"
        ));
    }

    #[test]
    fn test_string_accepts_numbers() {
        let map = doc! { "version" => 10.0, "count" => 3, "flag" => false };
        let fields = Fields::new(&map, "");

        assert_eq!(fields.string("version").unwrap().as_deref(), Some("10"));
        assert_eq!(fields.string("count").unwrap().as_deref(), Some("3"));
        assert!(fields.string("flag").is_err());
    }

    #[test]
    fn test_required_string_reports_path() {
        let map = doc! {};
        let fields = Fields::new(&map, "targets.App");
        let error = fields.required_string("type").unwrap_err();

        assert_eq!(
            error,
            ModelError::MissingField {
                path: "targets.App.type".into()
            }
        );
    }

    #[test]
    fn test_item_paths_in_lists() {
        let map = doc! { "sources" => seq!["a", doc! { "x" => 1 }] };
        let fields = Fields::new(&map, "targets.App");
        let error = fields.string_list("sources").unwrap_err();

        assert_eq!(error.path(), "targets.App.sources[1]");
    }

    #[test]
    fn test_marker_detection() {
        let map = doc! { "target" => "A", "framework" => "B" };
        let fields = Fields::new(&map, "dep");

        assert!(matches!(
            fields.marker(&["target", "framework", "sdk"]),
            Err(ModelError::AmbiguousMarkers { markers, .. }) if markers == "target, framework"
        ));
        assert_eq!(fields.marker(&["sdk", "target"]).unwrap(), Some("target"));
        assert_eq!(fields.marker(&["sdk"]).unwrap(), None);
        assert!(matches!(
            fields.required_marker(&["sdk"]),
            Err(ModelError::MissingMarker { .. })
        ));
    }

    #[test]
    fn test_named_treats_null_as_empty_map() {
        let map = doc! { "targets" => doc! { "App" => Value::Null } };
        let fields = Fields::new(&map, "");
        let named = fields.named("targets").unwrap();

        assert_eq!(named.len(), 1);
        assert_eq!(named[0].0, "App");
        assert_eq!(named[0].1.path(), "targets.App");
        assert!(named[0].1.map().is_empty());
    }
}
