//! Include merging
//!
//! Loads a root document and folds every document it includes into it,
//! depth first and in listed order. Each file is merged at most once per load,
//! however many times it is referenced.

mod paths;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use blueprint_domain::{Document, Value, path};
use tracing::{debug, trace};

use crate::error::{LoadError, LoadResult};
use crate::merge::merge_documents;
use crate::ports::{DocumentFormat, DocumentParser, FileSystem};
use crate::variable_resolver::{VariableMap, VariableResolver, VariableScope};

pub use paths::rewrite_paths;

/// Key holding the include list.
pub const INCLUDE_KEY: &str = "include";

/// One entry of an `include` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeEntry {
    /// Path as written, relative to the including file unless absolute.
    pub path: String,
    /// Whether path fields of the included file are rewritten.
    pub relative_paths: bool,
    /// Whether the entry is merged at all.
    pub enabled: bool,
}

impl IncludeEntry {
    /// An enabled entry with relative path rewriting.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            relative_paths: true,
            enabled: true,
        }
    }
}

/// Whether a flag string reads as true: it starts with `Y`, `T` or a
/// non-zero digit, in any case.
#[must_use]
pub fn is_truthy(text: &str) -> bool {
    text.chars()
        .next()
        .is_some_and(|c| matches!(c, 'Y' | 'y' | 'T' | 't' | '1'..='9'))
}

/// Reads and parses one file.
///
/// # Errors
///
/// Returns [`LoadError::Io`] or [`LoadError::Parse`] carrying `file`.
pub fn read_document<F, P>(fs: &F, parser: &P, file: &Path) -> LoadResult<Document>
where
    F: FileSystem + ?Sized,
    P: DocumentParser + ?Sized,
{
    let bytes = fs.read_file(file).map_err(|source| LoadError::Io {
        path: file.to_path_buf(),
        source,
    })?;
    parser
        .parse(&bytes, DocumentFormat::from_path(file))
        .map_err(|source| LoadError::Parse {
            path: file.to_path_buf(),
            source,
        })
}

/// Merges a root document with everything it includes.
pub struct IncludeMerger<'a, F: ?Sized, P: ?Sized> {
    fs: &'a F,
    parser: &'a P,
    variables: VariableResolver,
    visited: HashSet<PathBuf>,
}

impl<'a, F, P> IncludeMerger<'a, F, P>
where
    F: FileSystem + ?Sized,
    P: DocumentParser + ?Sized,
{
    /// Creates a merger. `variables` are the external variables `enable`
    /// conditions are evaluated against.
    #[must_use]
    pub fn new(fs: &'a F, parser: &'a P, variables: &VariableMap) -> Self {
        Self {
            fs,
            parser,
            variables: VariableResolver::new(VariableScope::new().with_external(variables.clone())),
            visited: HashSet::new(),
        }
    }

    /// Loads `root` and merges its includes.
    ///
    /// # Errors
    ///
    /// Fails when any merged file cannot be read or parsed, or when an
    /// `include` entry is malformed.
    pub fn merge(mut self, root: &Path) -> LoadResult<Document> {
        self.merge_file(&path::normalize(root))
    }

    fn merge_file(&mut self, file: &Path) -> LoadResult<Document> {
        self.visited.insert(file.to_path_buf());
        let mut document = read_document(self.fs, self.parser, file)?;
        let entries = self.take_entries(file, &mut document)?;
        let directory = file.parent().unwrap_or_else(|| Path::new(""));

        let mut merged = Document::new();
        for entry in entries {
            if !entry.enabled {
                debug!(include = %entry.path, from = %file.display(), "Skipping disabled include");
                continue;
            }

            let include_path = self.fs.resolve(directory, &entry.path);
            if self.visited.contains(&include_path) {
                debug!(include = %include_path.display(), "Skipping include merged earlier");
                continue;
            }

            let mut included = self.merge_file(&include_path)?;
            if entry.relative_paths {
                if let Some(prefix) = relative_prefix(&entry.path) {
                    trace!(prefix = %prefix.display(), "Rewriting included paths");
                    rewrite_paths(&mut included, prefix);
                }
            }

            debug!(include = %include_path.display(), "Merged include");
            merged = merge_documents(merged, included);
        }

        Ok(merge_documents(merged, document))
    }

    fn take_entries(&self, file: &Path, document: &mut Document) -> LoadResult<Vec<IncludeEntry>> {
        let items = match document.shift_remove(INCLUDE_KEY) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Sequence(items)) => items,
            Some(single) => vec![single],
        };

        items
            .iter()
            .enumerate()
            .map(|(index, item)| self.entry(file, index, item))
            .collect()
    }

    fn entry(&self, file: &Path, index: usize, item: &Value) -> LoadResult<IncludeEntry> {
        let invalid = |message: &str| LoadError::InvalidInclude {
            path: file.to_path_buf(),
            at: format!("{INCLUDE_KEY}[{index}]"),
            message: message.to_string(),
        };

        match item {
            Value::String(path) => Ok(IncludeEntry::new(path.clone())),
            Value::Map(map) => {
                let path = map
                    .get("path")
                    .and_then(Value::as_str)
                    .ok_or_else(|| invalid("missing string 'path'"))?;
                let relative_paths = self
                    .flag(map.get("relativePaths"), true)
                    .ok_or_else(|| invalid("'relativePaths' must be a flag"))?;
                let enabled = self
                    .flag(map.get("enable"), true)
                    .ok_or_else(|| invalid("'enable' must be a flag"))?;

                Ok(IncludeEntry {
                    path: path.to_string(),
                    relative_paths,
                    enabled,
                })
            }
            other => Err(invalid(&format!("expected string or map, found {}", other.kind()))),
        }
    }

    fn flag(&self, value: Option<&Value>, default: bool) -> Option<bool> {
        match value {
            None | Some(Value::Null) => Some(default),
            Some(Value::Bool(flag)) => Some(*flag),
            Some(Value::Int(number)) => Some(*number != 0),
            Some(Value::String(text)) => Some(is_truthy(&self.variables.substitute(text))),
            Some(_) => None,
        }
    }
}

/// Directory part of an include path, if it has one.
fn relative_prefix(include: &str) -> Option<&Path> {
    Path::new(include)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::test_support::MemoryFiles;
    use blueprint_domain::{doc, seq};
    use pretty_assertions::assert_eq;

    fn merge(files: &MemoryFiles, root: &str) -> LoadResult<Document> {
        IncludeMerger::new(files, files, &VariableMap::new()).merge(Path::new(root))
    }

    fn merge_with(files: &MemoryFiles, root: &str, variables: &[(&str, &str)]) -> Document {
        let variables: VariableMap = variables
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        IncludeMerger::new(files, files, &variables)
            .merge(Path::new(root))
            .unwrap()
    }

    #[test]
    fn test_root_overrides_included_values() {
        let files = MemoryFiles::new()
            .with(
                "project.yml",
                doc! {
                    "include" => "base.yml",
                    "name" => "NewName",
                    "settingGroups" => doc! { "test" => doc! { "MY_SETTING1" => "NEW VALUE" } },
                },
            )
            .with(
                "base.yml",
                doc! {
                    "name" => "Included",
                    "settingGroups" => doc! {
                        "test" => doc! { "MY_SETTING1" => "VALUE1", "MY_SETTING2" => "VALUE2" },
                    },
                },
            );

        let merged = merge(&files, "project.yml").unwrap();

        assert_eq!(
            merged,
            doc! {
                "name" => "NewName",
                "settingGroups" => doc! {
                    "test" => doc! { "MY_SETTING1" => "NEW VALUE", "MY_SETTING2" => "VALUE2" },
                },
            }
        );
    }

    #[test]
    fn test_each_file_merges_once() {
        // root -> first, second; second -> first, third; third -> first
        let files = MemoryFiles::new()
            .with(
                "root.yml",
                doc! { "include" => seq!["first.yml", "second.yml"], "fileGroups" => seq!["Root"] },
            )
            .with("first.yml", doc! { "fileGroups" => seq!["First"] })
            .with(
                "second.yml",
                doc! { "include" => seq!["first.yml", "third.yml"], "fileGroups" => seq!["Second"] },
            )
            .with(
                "third.yml",
                doc! { "include" => seq!["first.yml"], "fileGroups" => seq!["Third"] },
            );

        let merged = merge(&files, "root.yml").unwrap();

        assert_eq!(
            merged["fileGroups"],
            seq!["First", "Third", "Second", "Root"]
        );
    }

    #[test]
    fn test_self_include_terminates() {
        let files = MemoryFiles::new().with(
            "loop.yml",
            doc! { "include" => "loop.yml", "name" => "Loop" },
        );

        assert_eq!(merge(&files, "loop.yml").unwrap(), doc! { "name" => "Loop" });
    }

    #[test]
    fn test_enable_reads_external_variables() {
        let files = MemoryFiles::new()
            .with(
                "project.yml",
                doc! {
                    "include" => seq![
                        "base.yml",
                        doc! { "path" => "extra.yml", "enable" => "${INCLUDE_EXTRA}" },
                    ],
                },
            )
            .with("base.yml", doc! { "packages" => seq!["Yams"] })
            .with("extra.yml", doc! { "packages" => seq!["SwiftPM"] });

        let without = merge_with(&files, "project.yml", &[]);
        assert_eq!(without["packages"], seq!["Yams"]);

        let disabled = merge_with(&files, "project.yml", &[("INCLUDE_EXTRA", "NO")]);
        assert_eq!(disabled["packages"], seq!["Yams"]);

        let enabled = merge_with(&files, "project.yml", &[("INCLUDE_EXTRA", "YES")]);
        assert_eq!(enabled["packages"], seq!["Yams", "SwiftPM"]);
    }

    #[test]
    fn test_paths_are_rewritten_per_level() {
        let files = MemoryFiles::new()
            .with(
                "project.yml",
                doc! {
                    "include" => seq!["paths_test/included.yml"],
                    "configFiles" => doc! { "NewConfig" => "config" },
                },
            )
            .with(
                "paths_test/included.yml",
                doc! {
                    "include" => seq!["recursive_test/recursive.yml"],
                    "configFiles" => doc! { "IncludedConfig" => "config" },
                },
            )
            .with(
                "paths_test/recursive_test/recursive.yml",
                doc! { "configFiles" => doc! { "RecursiveConfig" => "config" } },
            );

        let merged = merge(&files, "project.yml").unwrap();

        assert_eq!(
            merged["configFiles"],
            Value::from(doc! {
                "RecursiveConfig" => "paths_test/recursive_test/config",
                "IncludedConfig" => "paths_test/config",
                "NewConfig" => "config",
            })
        );
    }

    #[test]
    fn test_relative_paths_can_be_disabled() {
        let files = MemoryFiles::new()
            .with(
                "project.yml",
                doc! {
                    "include" => seq![doc! { "path" => "legacy/included.yml", "relativePaths" => false }],
                },
            )
            .with("legacy/included.yml", doc! { "fileGroups" => seq!["Shared"] });

        assert_eq!(merge(&files, "project.yml").unwrap()["fileGroups"], seq!["Shared"]);
    }

    #[test]
    fn test_missing_include_is_fatal() {
        let files = MemoryFiles::new().with("project.yml", doc! { "include" => "missing.yml" });

        match merge(&files, "project.yml") {
            Err(LoadError::Io { path, .. }) => assert_eq!(path, PathBuf::from("missing.yml")),
            other => panic!("expected an I/O error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_entry() {
        let files = MemoryFiles::new().with(
            "project.yml",
            doc! { "include" => seq!["ok.yml", doc! { "enable" => true }] },
        );

        match merge(&files, "project.yml") {
            Err(LoadError::InvalidInclude { at, .. }) => assert_eq!(at, "include[1]"),
            other => panic!("expected an invalid include, got {other:?}"),
        }
    }

    #[test]
    fn test_truthy_flags() {
        for text in ["YES", "yes", "true", "T", "1", "42"] {
            assert!(is_truthy(text), "{text}");
        }
        for text in ["NO", "false", "0", "", "${UNSET}"] {
            assert!(!is_truthy(text), "{text}");
        }
    }
}
