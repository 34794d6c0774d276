//! Lexical path handling shared by the loader stages.

use std::path::{Component, Path, PathBuf};

/// Normalizes a path without touching the filesystem.
///
/// `.` components are dropped and `..` pops the previous normal component.
/// A `..` that cannot be popped is kept, so `../a/./b/../c` becomes `../a/c`.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// Joins `relative` onto `base` and normalizes the result.
///
/// Absolute `relative` paths are returned normalized but otherwise unchanged.
#[must_use]
pub fn join_normalized(base: &Path, relative: &str) -> PathBuf {
    let relative = Path::new(relative);
    if relative.is_absolute() {
        normalize(relative)
    } else {
        normalize(&base.join(relative))
    }
}

/// Renders a path with forward slashes, the form used inside spec documents.
#[must_use]
pub fn to_document_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Last component of a path written in a document, used to name local packages.
#[must_use]
pub fn last_component(text: &str) -> &str {
    let trimmed = text.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_drops_dots() {
        assert_eq!(normalize(Path::new("a/./b/../c")), PathBuf::from("a/c"));
        assert_eq!(normalize(Path::new("./a")), PathBuf::from("a"));
        assert_eq!(normalize(Path::new("a/..")), PathBuf::from("."));
    }

    #[test]
    fn test_normalize_keeps_leading_parent() {
        assert_eq!(normalize(Path::new("../a/../../b")), PathBuf::from("../../b"));
        assert_eq!(normalize(Path::new("/a/../../b")), PathBuf::from("/b"));
    }

    #[test]
    fn test_join_normalized() {
        assert_eq!(
            join_normalized(Path::new("paths_test"), "../Sources"),
            PathBuf::from("Sources")
        );
        assert_eq!(
            join_normalized(Path::new("paths_test"), "/abs/file"),
            PathBuf::from("/abs/file")
        );
    }

    #[test]
    fn test_last_component() {
        assert_eq!(last_component("../../"), "..");
        assert_eq!(last_component("Packages/XcodeGen"), "XcodeGen");
        assert_eq!(last_component("Local/"), "Local");
    }
}
