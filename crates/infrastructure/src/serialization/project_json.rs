//! Resolved project dumps.

use std::fs;
use std::path::{Path, PathBuf};

use blueprint_domain::Project;
use tracing::debug;

/// Errors raised while dumping a project.
#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    /// The project could not be encoded.
    #[error("failed to encode project: {0}")]
    Encode(#[from] serde_json::Error),

    /// The dump could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// Destination file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

/// Renders `project` as pretty JSON with a trailing newline.
///
/// Keys follow the model's field order and, inside maps, document order, so
/// dumping the same spec twice gives the same bytes.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn project_to_json(project: &Project) -> Result<String, DumpError> {
    let mut json = serde_json::to_string_pretty(project)?;
    json.push('\n');
    Ok(json)
}

/// Writes `project` as JSON to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn write_project_json(project: &Project, path: &Path) -> Result<(), DumpError> {
    let json = project_to_json(project)?;
    fs::write(path, json).map_err(|source| DumpError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), project = %project.name, "Wrote project dump");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use blueprint_domain::{Platform, ProductType, Target};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn project() -> Project {
        let mut project = Project::new("App");
        project
            .targets
            .push(Target::new("App", ProductType::Application, Platform::Ios));
        project
    }

    #[test]
    fn test_dump_is_stable() {
        let first = project_to_json(&project()).unwrap();
        let second = project_to_json(&project()).unwrap();

        assert_eq!(first, second);
        assert!(first.ends_with("}\n"));
        assert!(first.starts_with("{\n  \"name\": \"App\""));
    }

    #[test]
    fn test_write_dump() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("project.json");

        write_project_json(&project(), &path).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["targets"][0]["type"], "application");
    }

    #[test]
    fn test_write_into_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("project.json");

        match write_project_json(&project(), &path) {
            Err(DumpError::Write { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected a write error, got {other:?}"),
        }
    }
}
