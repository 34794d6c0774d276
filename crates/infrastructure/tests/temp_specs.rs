//! Specs written to temporary directories at test time.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::fs;
use std::path::{Path, PathBuf};

use blueprint_application::{LoadError, LoaderConfig, ParseError, WarningKind};
use blueprint_domain::{ModelError, Platform};
use blueprint_infrastructure::{ProjectLoader, load_project, write_project_json};
use pretty_assertions::assert_eq;
use semver::Version;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn legacy_include_keeps_paths() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "legacy/included.yml",
        "targets:\n  Legacy:\n    type: framework\n    platform: macOS\n    sources: [legacy/Sources]\n",
    );
    let root = write(
        dir.path(),
        "project.yml",
        "name: Legacy\ninclude:\n  - path: legacy/included.yml\n    relativePaths: false\n",
    );

    let project = load_project(&root).unwrap();

    assert_eq!(project.targets[0].sources[0].path, "legacy/Sources");
}

#[test]
fn platform_fan_out_from_disk() {
    let dir = TempDir::new().unwrap();
    let root = write(
        dir.path(),
        "project.yml",
        r"
name: FanOut
targets:
  Framework:
    type: framework
    platform: [iOS, tvOS]
    deploymentTarget:
      iOS: 12.0
      tvOS: '13.0'
    sources:
      - Sources/${platform}
    settings:
      INFOPLIST_FILE: Info-${platform}.plist
",
    );

    let project = load_project(&root).unwrap();

    let ios = project.target("Framework_iOS").unwrap();
    assert_eq!(ios.platform, Platform::Ios);
    assert_eq!(ios.deployment_target, Some(Version::new(12, 0, 0)));
    assert_eq!(ios.sources[0].path, "Sources/iOS");
    assert_eq!(ios.product_name, "Framework");

    let tvos = project.target("Framework_tvOS").unwrap();
    assert_eq!(tvos.deployment_target, Some(Version::new(13, 0, 0)));
    assert_eq!(
        tvos.settings.build_settings["INFOPLIST_FILE"].as_str(),
        Some("Info-tvOS.plist")
    );
}

#[test]
fn deprecated_placeholders_warn_without_failing() {
    let dir = TempDir::new().unwrap();
    let root = write(
        dir.path(),
        "project.yml",
        r"
name: Warnings
targetTemplates:
  Framework:
    type: framework
    sources: [$target_name/$platform/Sources]
targets:
  Framework:
    platform: iOS
    templates: [Framework]
",
    );
    let config = LoaderConfig::builder().version(Version::new(1, 1, 0)).build();
    let mut loader = ProjectLoader::new(config);

    loader.load(&root).unwrap();
    let warnings = loader.warnings();

    let names: Vec<&WarningKind> = warnings.iter().map(|w| &w.kind).collect();
    assert_eq!(
        names,
        vec![
            &WarningKind::DeprecatedPlaceholder {
                name: "target_name".to_string()
            },
            &WarningKind::DeprecatedPlaceholder {
                name: "platform".to_string()
            },
        ]
    );
}

#[test]
fn current_placeholders_do_not_warn() {
    let dir = TempDir::new().unwrap();
    let root = write(
        dir.path(),
        "project.yml",
        r"
name: TestSpecWarningValidation
templates:
  Framework:
    type: framework
    sources: ['${target_name}/${platform}/Sources']
targets:
  Framework:
    type: framework
    platform: iOS
    templates: [Framework]
",
    );
    let config = LoaderConfig::builder().version(Version::new(1, 1, 0)).build();
    let mut loader = ProjectLoader::new(config);

    let project = loader.load(&root).unwrap();

    assert_eq!(project.targets[0].sources[0].path, "Framework/iOS/Sources");
    assert!(loader.warnings().is_empty());
}

#[test]
fn default_loader_reports_deprecated_placeholders() {
    let dir = TempDir::new().unwrap();
    let root = write(
        dir.path(),
        "project.yml",
        r"
name: TestSpecWarningValidation
templates:
  Framework:
    type: framework
    sources: [$target_name/Sources]
targets:
  Framework:
    platform: iOS
    templates: [Framework]
",
    );
    let mut loader = ProjectLoader::default();

    loader.load(&root).unwrap();
    let warnings = loader.warnings();

    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].path, "templates.Framework.sources[0]");
}

#[test]
fn parse_errors_name_the_file() {
    let dir = TempDir::new().unwrap();
    let included = write(dir.path(), "broken.yml", "targets: [unclosed\n");
    let root = write(dir.path(), "project.yml", "name: Broken\ninclude: [broken.yml]\n");

    match load_project(&root) {
        Err(LoadError::Parse { path, source }) => {
            assert_eq!(path, included);
            assert!(matches!(source, ParseError::Syntax { .. }));
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn validation_errors_carry_the_path() {
    let dir = TempDir::new().unwrap();
    let root = write(
        dir.path(),
        "project.yml",
        "name: Invalid\ntargets:\n  App:\n    type: application\n    platform: Android\n",
    );

    match load_project(&root) {
        Err(LoadError::Model(ModelError::UnknownTargetPlatform { path, value })) => {
            assert_eq!(path, "targets.App.platform");
            assert_eq!(value, "Android");
        }
        other => panic!("expected an unknown platform, got {other:?}"),
    }
}

#[test]
fn resolved_project_dumps_to_json() {
    let dir = TempDir::new().unwrap();
    let root = write(
        dir.path(),
        "project.yml",
        "name: Dump\ntargets:\n  App:\n    type: application\n    platform: iOS\n",
    );
    let dump = dir.path().join("resolved.json");

    write_project_json(&load_project(&root).unwrap(), &dump).unwrap();

    let json = fs::read_to_string(&dump).unwrap();
    assert!(json.contains("\"name\": \"Dump\""));
    assert!(json.contains("\"type\": \"application\""));
}
