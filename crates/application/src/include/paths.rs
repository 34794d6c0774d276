//! Rewriting of path-valued fields in included documents.
//!
//! An included file is written with paths relative to itself. Before it is
//! merged, every known path field is prefixed with the include's directory so
//! the paths stay correct relative to the including file.

use std::path::Path;

use blueprint_domain::{Document, Value, path};

use crate::merge::REPLACE_SUFFIX;

/// Where path strings live inside a document.
#[derive(Debug, Clone, Copy)]
enum PathRule {
    /// A string, a list of strings, or a map whose values are strings.
    Paths(&'static str),
    /// A list of sources: strings, or maps carrying `path`.
    Sources(&'static str),
    /// A map, or a list of maps, with rules of its own.
    Object(&'static str, &'static [PathRule]),
    /// A map of named maps, each with the same rules.
    Named(&'static str, &'static [PathRule]),
}

use PathRule::{Named, Object, Paths, Sources};

const PATH: &[PathRule] = &[Paths("path")];

const TEST_PLANS: &[PathRule] = &[Object("testPlans", PATH)];

const TARGET: &[PathRule] = &[
    Sources("sources"),
    Paths("configFiles"),
    Object("dependencies", &[Paths("framework")]),
    Object("info", PATH),
    Object("entitlements", PATH),
    Object("preBuildScripts", PATH),
    Object("postCompileScripts", PATH),
    Object("postBuildScripts", PATH),
    Object("scheme", TEST_PLANS),
];

const AGGREGATE_TARGET: &[PathRule] = &[Paths("configFiles"), Object("buildScripts", PATH)];

const SCHEME: &[PathRule] = &[Object("test", TEST_PLANS)];

const ROOT: &[PathRule] = &[
    Paths("configFiles"),
    Paths("fileGroups"),
    Paths("localPackages"),
    Object("options", &[Paths("carthageBuildPath")]),
    Named("targets", TARGET),
    Named("targetTemplates", TARGET),
    Named("aggregateTargets", AGGREGATE_TARGET),
    Named("schemes", SCHEME),
    Named("schemeTemplates", SCHEME),
    Named("projectReferences", PATH),
    Named("packages", PATH),
];

/// Prefixes every relative path field of `document` with `prefix`.
///
/// Absolute paths are left as they are. Results are normalized lexically.
pub fn rewrite_paths(document: &mut Document, prefix: &Path) {
    let rewrite = |text: &str| -> String {
        if Path::new(text).is_absolute() {
            text.to_string()
        } else {
            path::to_document_string(&path::join_normalized(prefix, text))
        }
    };
    apply_rules(document, ROOT, &rewrite);
}

fn apply_rules<F>(map: &mut Document, rules: &[PathRule], rewrite: &F)
where
    F: Fn(&str) -> String,
{
    for (key, value) in map.iter_mut() {
        let name = key.strip_suffix(REPLACE_SUFFIX).unwrap_or(key.as_str());
        for rule in rules {
            match *rule {
                Paths(field) if field == name => rewrite_strings(value, rewrite),
                Sources(field) if field == name => rewrite_sources(value, rewrite),
                Object(field, nested) if field == name => apply_object(value, nested, rewrite),
                Named(field, nested) if field == name => {
                    if let Value::Map(children) = value {
                        for child in children.values_mut() {
                            apply_object(child, nested, rewrite);
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

fn apply_object<F>(value: &mut Value, rules: &[PathRule], rewrite: &F)
where
    F: Fn(&str) -> String,
{
    match value {
        Value::Map(map) => apply_rules(map, rules, rewrite),
        Value::Sequence(items) => {
            for item in items {
                if let Value::Map(map) = item {
                    apply_rules(map, rules, rewrite);
                }
            }
        }
        _ => {}
    }
}

fn rewrite_strings<F>(value: &mut Value, rewrite: &F)
where
    F: Fn(&str) -> String,
{
    match value {
        Value::String(text) => *text = rewrite(text),
        Value::Sequence(items) => items.iter_mut().for_each(|item| rewrite_strings(item, rewrite)),
        Value::Map(map) => map.values_mut().for_each(|item| rewrite_strings(item, rewrite)),
        _ => {}
    }
}

fn rewrite_sources<F>(value: &mut Value, rewrite: &F)
where
    F: Fn(&str) -> String,
{
    match value {
        Value::String(text) => *text = rewrite(text),
        Value::Sequence(items) => items.iter_mut().for_each(|item| rewrite_sources(item, rewrite)),
        Value::Map(map) => {
            if let Some(Value::String(text)) = map.get_mut("path") {
                *text = rewrite(text);
            }
        }
        _ => {}
    }
}
