//! The merge routine shared by include merging and template flattening.
//!
//! Merging `overlay` onto `base`:
//! * maps merge key by key, recursively;
//! * sequences concatenate, `base` items first;
//! * anything else is replaced by the `overlay` value;
//! * a key written as `name:REPLACE` replaces `name` wholesale.

use blueprint_domain::{Document, Value};

/// Suffix that turns a merge into a wholesale replacement.
pub const REPLACE_SUFFIX: &str = ":REPLACE";

/// Merges `overlay` onto `base`, consuming both.
#[must_use]
pub fn merge_documents(mut base: Document, overlay: Document) -> Document {
    for (key, value) in overlay {
        if let Some(name) = key.strip_suffix(REPLACE_SUFFIX) {
            base.insert(name.to_string(), strip_replace_markers(value));
        } else if let Some(existing) = base.get_mut(&key) {
            let current = std::mem::take(existing);
            *existing = merge_values(current, value);
        } else {
            base.insert(key, strip_replace_markers(value));
        }
    }
    base
}

/// Merges two values by the rules in the module docs.
#[must_use]
pub fn merge_values(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Map(base), Value::Map(overlay)) => Value::Map(merge_documents(base, overlay)),
        (Value::Sequence(mut base), Value::Sequence(overlay)) => {
            base.extend(overlay.into_iter().map(strip_replace_markers));
            Value::Sequence(base)
        }
        (_, overlay) => strip_replace_markers(overlay),
    }
}

/// Renames `name:REPLACE` keys to `name` throughout a value that is not being
/// merged into anything.
fn strip_replace_markers(value: Value) -> Value {
    match value {
        Value::Map(map) => Value::Map(
            map.into_iter()
                .map(|(key, value)| {
                    let key = key
                        .strip_suffix(REPLACE_SUFFIX)
                        .map_or(key.clone(), str::to_string);
                    (key, strip_replace_markers(value))
                })
                .collect(),
        ),
        Value::Sequence(items) => {
            Value::Sequence(items.into_iter().map(strip_replace_markers).collect())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_domain::{doc, seq};
    use pretty_assertions::assert_eq;

    fn keys(document: &Document) -> Vec<&str> {
        document.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_scalars_are_replaced() {
        let merged = merge_documents(doc! { "a" => 1, "b" => "x" }, doc! { "a" => 2 });
        assert_eq!(merged, doc! { "a" => 2, "b" => "x" });
    }

    #[test]
    fn test_maps_merge_recursively() {
        let merged = merge_documents(
            doc! { "settings" => doc! { "A" => 1, "B" => 2 } },
            doc! { "settings" => doc! { "B" => 3, "C" => 4 } },
        );
        assert_eq!(
            merged,
            doc! { "settings" => doc! { "A" => 1, "B" => 3, "C" => 4 } }
        );
    }

    #[test]
    fn test_sequences_concatenate() {
        let merged = merge_documents(
            doc! { "sources" => seq!["a", "b"] },
            doc! { "sources" => seq!["c"] },
        );
        assert_eq!(merged, doc! { "sources" => seq!["a", "b", "c"] });
    }

    #[test]
    fn test_replace_suffix() {
        let merged = merge_documents(
            doc! { "settings" => doc! { "A" => 1 }, "sources" => seq!["a"] },
            doc! {
                "settings:REPLACE" => doc! { "B" => 2 },
                "sources:REPLACE" => seq!["b"],
            },
        );
        assert_eq!(
            merged,
            doc! { "settings" => doc! { "B" => 2 }, "sources" => seq!["b"] }
        );
    }

    #[test]
    fn test_replace_suffix_without_base_value() {
        let merged = merge_documents(doc! {}, doc! { "nested" => doc! { "x:REPLACE" => 1 } });
        assert_eq!(merged, doc! { "nested" => doc! { "x" => 1 } });
    }

    #[test]
    fn test_key_order_follows_first_write() {
        let merged = merge_documents(
            doc! { "b" => 1, "a" => 1 },
            doc! { "c" => 2, "b" => 2 },
        );
        assert_eq!(keys(&merged), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_mismatched_kinds_take_overlay() {
        let merged = merge_documents(doc! { "a" => seq![1] }, doc! { "a" => doc! { "x" => 1 } });
        assert_eq!(merged, doc! { "a" => doc! { "x" => 1 } });
    }
}
