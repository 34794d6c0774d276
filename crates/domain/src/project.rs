//! The typed project model and its decoder.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tracing::debug;

use crate::breakpoint::Breakpoint;
use crate::decode::Fields;
use crate::document::Document;
use crate::error::ModelResult;
use crate::literal::literal_enum;
use crate::options::Options;
use crate::package::SwiftPackage;
use crate::path;
use crate::scheme::{Scheme, TargetScheme};
use crate::settings::{BuildSettings, Settings};
use crate::target::{BuildScript, Target};

literal_enum! {
    /// Kind of a build configuration.
    pub enum ConfigType {
        /// Debug configuration.
        Debug => "debug",
        /// Release configuration.
        Release => "release",
    }
}

/// A build configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Configuration name.
    pub name: String,
    /// Kind, used to pick default settings.
    #[serde(rename = "type")]
    pub config_type: Option<ConfigType>,
}

impl Config {
    /// A configuration with an explicit kind.
    #[must_use]
    pub fn new(name: impl Into<String>, config_type: Option<ConfigType>) -> Self {
        Self {
            name: name.into(),
            config_type,
        }
    }

    /// The configurations used when none are declared.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("Debug", Some(ConfigType::Debug)),
            Self::new("Release", Some(ConfigType::Release)),
        ]
    }
}

/// A target that only groups other targets and runs scripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateTarget {
    /// Target name.
    pub name: String,
    /// Targets it depends on.
    pub targets: Vec<String>,
    /// Build settings.
    pub settings: Settings,
    /// Config file per configuration.
    pub config_files: IndexMap<String, String>,
    /// Run-script phases.
    pub build_scripts: Vec<BuildScript>,
    /// Generated scheme.
    pub scheme: Option<TargetScheme>,
    /// Extra target attributes.
    pub attributes: Document,
}

impl AggregateTarget {
    fn decode(name: &str, fields: &Fields<'_>) -> ModelResult<Self> {
        Ok(Self {
            name: name.to_string(),
            targets: fields.string_list("targets")?,
            settings: Settings::decode_field(fields, "settings")?,
            config_files: fields.string_map("configFiles")?,
            build_scripts: BuildScript::decode_list(fields, "buildScripts")?,
            scheme: fields
                .child("scheme")?
                .map(|scheme| TargetScheme::decode(&scheme))
                .transpose()?,
            attributes: fields.document("attributes")?,
        })
    }
}

/// Another project referenced by this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectReference {
    /// Reference name, used as `Name/Target` in dependencies.
    pub name: String,
    /// Path to the referenced project.
    pub path: String,
}

/// A fully resolved project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project name.
    pub name: String,
    /// Generation options.
    pub options: Options,
    /// Build configurations.
    pub configs: Vec<Config>,
    /// Project-level settings.
    pub settings: Settings,
    /// Reusable setting groups.
    pub setting_groups: IndexMap<String, Settings>,
    /// Targets in document order.
    pub targets: Vec<Target>,
    /// Aggregate targets in document order.
    pub aggregate_targets: Vec<AggregateTarget>,
    /// Schemes in document order.
    pub schemes: Vec<Scheme>,
    /// Swift packages by name.
    pub packages: IndexMap<String, SwiftPackage>,
    /// Project config file per configuration.
    pub config_files: IndexMap<String, String>,
    /// Breakpoints.
    pub breakpoints: Vec<Breakpoint>,
    /// Referenced projects.
    pub project_references: Vec<ProjectReference>,
    /// Extra top-level folders, unique by normalized path.
    pub file_groups: IndexSet<String>,
    /// Extra project attributes.
    pub attributes: Document,
}

impl Project {
    /// An empty project with default configurations.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Options::default(),
            configs: Config::defaults(),
            settings: Settings::default(),
            setting_groups: IndexMap::new(),
            targets: Vec::new(),
            aggregate_targets: Vec::new(),
            schemes: Vec::new(),
            packages: IndexMap::new(),
            config_files: IndexMap::new(),
            breakpoints: Vec::new(),
            project_references: Vec::new(),
            file_groups: IndexSet::new(),
            attributes: Document::new(),
        }
    }

    /// Decodes a fully resolved document into a project.
    ///
    /// The document must already have includes merged, variables substituted,
    /// templates applied and platform lists expanded.
    pub fn decode(document: &Document) -> ModelResult<Self> {
        let root = Fields::new(document, "");

        let configs = match root.child("configs")? {
            None => Config::defaults(),
            Some(configs) => configs
                .map()
                .keys()
                .map(|name| -> ModelResult<Config> {
                    let config_type =
                        configs.enumeration(name, "config type", ConfigType::from_literal)?;
                    Ok(Config::new(name.clone(), config_type))
                })
                .collect::<ModelResult<_>>()?,
        };

        let mut setting_groups = IndexMap::new();
        for key in ["settingPresets", "settingGroups"] {
            for (name, group) in root.named(key)? {
                setting_groups.insert(name, Settings::decode(&group)?);
            }
        }

        let targets = root
            .named("targets")?
            .iter()
            .map(|(name, fields)| Target::decode(name, fields))
            .collect::<ModelResult<Vec<_>>>()?;

        let aggregate_targets = root
            .named("aggregateTargets")?
            .iter()
            .map(|(name, fields)| AggregateTarget::decode(name, fields))
            .collect::<ModelResult<Vec<_>>>()?;

        let schemes = root
            .named("schemes")?
            .iter()
            .map(|(name, fields)| Scheme::decode(name, fields))
            .collect::<ModelResult<Vec<_>>>()?;

        let project_references = root
            .named("projectReferences")?
            .iter()
            .map(|(name, fields)| -> ModelResult<ProjectReference> {
                Ok(ProjectReference {
                    name: name.clone(),
                    path: fields.required_string("path")?,
                })
            })
            .collect::<ModelResult<Vec<_>>>()?;

        let project = Self {
            name: root.required_string("name")?,
            options: root
                .child("options")?
                .map(|options| Options::decode(&options))
                .transpose()?
                .unwrap_or_default(),
            configs,
            settings: Settings::decode_field(&root, "settings")?,
            setting_groups,
            targets,
            aggregate_targets,
            schemes,
            packages: packages(&root)?,
            config_files: root.string_map("configFiles")?,
            breakpoints: root
                .maps("breakpoints")?
                .iter()
                .map(Breakpoint::decode)
                .collect::<ModelResult<_>>()?,
            project_references,
            file_groups: root
                .string_list("fileGroups")?
                .iter()
                .map(|group| {
                    path::to_document_string(&path::normalize(std::path::Path::new(group)))
                })
                .collect(),
            attributes: root.document("attributes")?,
        };

        project.validate_setting_groups()?;
        debug!(
            name = %project.name,
            targets = project.targets.len(),
            schemes = project.schemes.len(),
            "Decoded project"
        );
        Ok(project)
    }

    fn validate_setting_groups(&self) -> ModelResult<()> {
        self.settings
            .validate_groups("settings", &self.setting_groups)?;
        for (name, group) in &self.setting_groups {
            group.validate_groups(&format!("settingGroups.{name}"), &self.setting_groups)?;
        }
        for target in &self.targets {
            target.settings.validate_groups(
                &format!("targets.{}.settings", target.name),
                &self.setting_groups,
            )?;
        }
        for target in &self.aggregate_targets {
            target.settings.validate_groups(
                &format!("aggregateTargets.{}.settings", target.name),
                &self.setting_groups,
            )?;
        }
        Ok(())
    }

    /// Looks up a target by name.
    #[must_use]
    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|target| target.name == name)
    }

    /// Looks up an aggregate target by name.
    #[must_use]
    pub fn aggregate_target(&self, name: &str) -> Option<&AggregateTarget> {
        self.aggregate_targets
            .iter()
            .find(|target| target.name == name)
    }

    /// Looks up a scheme by name.
    #[must_use]
    pub fn scheme(&self, name: &str) -> Option<&Scheme> {
        self.schemes.iter().find(|scheme| scheme.name == name)
    }

    /// Project settings flattened for `config`, with setting groups applied.
    pub fn project_build_settings(&self, config: &str) -> ModelResult<BuildSettings> {
        self.settings
            .resolve("settings", config, &self.setting_groups)
    }

    /// Settings of the target `name` flattened for `config`.
    ///
    /// Returns `None` when there is no such target.
    pub fn target_build_settings(
        &self,
        name: &str,
        config: &str,
    ) -> ModelResult<Option<BuildSettings>> {
        self.target(name)
            .map(|target| {
                target.settings.resolve(
                    &format!("targets.{name}.settings"),
                    config,
                    &self.setting_groups,
                )
            })
            .transpose()
    }
}

/// Reads `packages`, then names each `localPackages` entry by its last path
/// component unless a package of that name already exists.
fn packages(root: &Fields<'_>) -> ModelResult<IndexMap<String, SwiftPackage>> {
    let mut packages = IndexMap::new();
    for (name, fields) in root.named("packages")? {
        packages.insert(name, SwiftPackage::decode(&fields)?);
    }
    for local in root.string_list("localPackages")? {
        let name = path::last_component(&local).to_string();
        packages
            .entry(name)
            .or_insert_with(|| SwiftPackage::local(local));
    }
    Ok(packages)
}

impl Default for Project {
    fn default() -> Self {
        Self::new("")
    }
}
