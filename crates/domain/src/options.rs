//! Project-wide generation options.

use indexmap::IndexMap;
use semver::Version;
use serde::Serialize;

use crate::decode::Fields;
use crate::document::Document;
use crate::error::{ModelError, ModelResult};
use crate::literal::literal_enum;
use crate::platform::Platform;
use crate::target::BuildPhase;

literal_enum! {
    /// Which default setting presets are applied.
    pub enum SettingPresets {
        /// Project and target presets.
        All => "all",
        /// Project presets only.
        Project => "project",
        /// Target presets only.
        Targets => "targets",
        /// No presets.
        None => "none",
    }
}

literal_enum! {
    /// Where groups are placed relative to files.
    pub enum GroupSortPosition {
        /// Groups before files.
        Top => "top",
        /// Groups after files.
        Bottom => "bottom",
        /// Groups and files interleaved.
        None => "none",
    }
}

literal_enum! {
    /// Validations that can be switched off.
    pub enum ValidationType {
        /// Missing `Debug`/`Release` style configurations.
        MissingConfigs => "missingConfigs",
        /// Config files that do not exist.
        MissingConfigFiles => "missingConfigFiles",
        /// Test plans that do not exist.
        MissingTestPlans => "missingTestPlans",
    }
}

/// Explicit ordering of children for groups matching a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupOrdering {
    /// Group path pattern.
    pub pattern: String,
    /// Child names in order.
    pub order: Vec<String>,
}

/// Per-extension file handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileType {
    /// Whether matching paths are files rather than folders.
    pub file: bool,
    /// Build phase files are added to.
    pub build_phase: Option<BuildPhase>,
    /// Build file attributes.
    pub attributes: Vec<String>,
    /// On-demand resource tags.
    pub resource_tags: Vec<String>,
    /// Compiler flags.
    pub compiler_flags: Vec<String>,
}

impl FileType {
    fn decode(fields: &Fields<'_>) -> ModelResult<Self> {
        Ok(Self {
            file: fields.bool_or("file", true)?,
            build_phase: fields.enumeration("buildPhase", "build phase", BuildPhase::from_literal)?,
            attributes: fields.string_list("attributes")?,
            resource_tags: fields.string_list("resourceTags")?,
            compiler_flags: compiler_flags(fields)?,
        })
    }
}

/// Reads `compilerFlags`, either a list or a whitespace separated string.
pub(crate) fn compiler_flags(fields: &Fields<'_>) -> ModelResult<Vec<String>> {
    if let Some(text) = fields.get("compilerFlags").and_then(|value| value.as_str()) {
        return Ok(text.split_whitespace().map(str::to_string).collect());
    }
    fields.string_list("compilerFlags")
}

/// Generation options, read from the `options` map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct Options {
    /// Lowest generator version able to read the project.
    pub minimum_xcode_gen_version: Option<Version>,
    /// Carthage build folder.
    pub carthage_build_path: Option<String>,
    /// Carthage executable.
    pub carthage_executable_path: Option<String>,
    /// Create groups for intermediate folders.
    pub create_intermediate_groups: bool,
    /// Prefix for generated bundle identifiers.
    pub bundle_id_prefix: Option<String>,
    /// Default presets to apply.
    pub setting_presets: SettingPresets,
    /// Development language.
    pub development_language: Option<String>,
    /// Indent with tabs.
    pub uses_tabs: Option<bool>,
    /// Tab width.
    pub tab_width: Option<i64>,
    /// Indent width.
    pub indent_width: Option<i64>,
    /// Xcode version the project targets.
    pub xcode_version: Option<String>,
    /// Default deployment target per platform.
    pub deployment_target: IndexMap<Platform, Version>,
    /// Validations that are skipped.
    pub disabled_validations: Vec<ValidationType>,
    /// Configuration used by command line builds.
    pub default_config: Option<String>,
    /// Link dependencies of dependencies.
    pub transitively_link_dependencies: bool,
    /// Position of groups among files.
    pub group_sorting_position: GroupSortPosition,
    /// Explicit group orderings.
    pub group_ordering: Vec<GroupOrdering>,
    /// File handling per extension.
    pub file_types: IndexMap<String, FileType>,
    /// Add empty folders to the project.
    pub generate_empty_directories: bool,
    /// Look up Carthage frameworks automatically.
    pub find_carthage_frameworks: bool,
    /// Group local packages are placed in.
    pub local_packages_group: Option<String>,
    /// Command run before generation.
    pub pre_gen_command: Option<String>,
    /// Command run after generation.
    pub post_gen_command: Option<String>,
    /// Use base internationalization.
    pub use_base_internationalization: bool,
    /// Prefix of scheme paths relative to the project.
    pub scheme_path_prefix: String,
    /// Extra attributes for the project object.
    pub project_attributes: Document,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            minimum_xcode_gen_version: None,
            carthage_build_path: None,
            carthage_executable_path: None,
            create_intermediate_groups: false,
            bundle_id_prefix: None,
            setting_presets: SettingPresets::All,
            development_language: None,
            uses_tabs: None,
            tab_width: None,
            indent_width: None,
            xcode_version: None,
            deployment_target: IndexMap::new(),
            disabled_validations: Vec::new(),
            default_config: None,
            transitively_link_dependencies: false,
            group_sorting_position: GroupSortPosition::Bottom,
            group_ordering: Vec::new(),
            file_types: IndexMap::new(),
            generate_empty_directories: false,
            find_carthage_frameworks: false,
            local_packages_group: None,
            pre_gen_command: None,
            post_gen_command: None,
            use_base_internationalization: true,
            scheme_path_prefix: "../../".to_string(),
            project_attributes: Document::new(),
        }
    }
}

impl Options {
    /// Decodes the `options` map.
    pub fn decode(fields: &Fields<'_>) -> ModelResult<Self> {
        let defaults = Self::default();

        let disabled_validations = fields
            .string_list("disabledValidations")?
            .into_iter()
            .enumerate()
            .map(|(index, literal)| {
                ValidationType::from_literal(&literal).ok_or_else(|| ModelError::UnknownLiteral {
                    path: fields.item_path("disabledValidations", index),
                    kind: "validation",
                    value: literal,
                })
            })
            .collect::<ModelResult<Vec<_>>>()?;

        let group_ordering = fields
            .maps("groupOrdering")?
            .iter()
            .map(|ordering| -> ModelResult<GroupOrdering> {
                Ok(GroupOrdering {
                    pattern: ordering.string("pattern")?.unwrap_or_default(),
                    order: ordering.string_list("order")?,
                })
            })
            .collect::<ModelResult<Vec<_>>>()?;

        let file_types = fields
            .named("fileTypes")?
            .into_iter()
            .map(|(extension, file_type)| -> ModelResult<(String, FileType)> {
                Ok((extension, FileType::decode(&file_type)?))
            })
            .collect::<ModelResult<_>>()?;

        Ok(Self {
            minimum_xcode_gen_version: fields.lenient_version("minimumXcodeGenVersion")?,
            carthage_build_path: fields.string("carthageBuildPath")?,
            carthage_executable_path: fields.string("carthageExecutablePath")?,
            create_intermediate_groups: fields.bool_or("createIntermediateGroups", false)?,
            bundle_id_prefix: fields.string("bundleIdPrefix")?,
            setting_presets: fields
                .enumeration("settingPresets", "setting presets", SettingPresets::from_literal)?
                .unwrap_or(defaults.setting_presets),
            development_language: fields.string("developmentLanguage")?,
            uses_tabs: fields.bool("usesTabs")?,
            tab_width: fields.int("tabWidth")?,
            indent_width: fields.int("indentWidth")?,
            xcode_version: fields.string("xcodeVersion")?,
            deployment_target: deployment_targets(fields)?,
            disabled_validations,
            default_config: fields.string("defaultConfig")?,
            transitively_link_dependencies: fields.bool_or("transitivelyLinkDependencies", false)?,
            group_sorting_position: fields
                .enumeration(
                    "groupSortPosition",
                    "group sort position",
                    GroupSortPosition::from_literal,
                )?
                .unwrap_or(defaults.group_sorting_position),
            group_ordering,
            file_types,
            generate_empty_directories: fields.bool_or("generateEmptyDirectories", false)?,
            find_carthage_frameworks: fields.bool_or("findCarthageFrameworks", false)?,
            local_packages_group: fields.string("localPackagesGroup")?,
            pre_gen_command: fields.string("preGenCommand")?,
            post_gen_command: fields.string("postGenCommand")?,
            use_base_internationalization: fields.bool_or("useBaseInternationalization", true)?,
            scheme_path_prefix: fields
                .string("schemePathPrefix")?
                .unwrap_or(defaults.scheme_path_prefix),
            project_attributes: fields.document("projectAttributes")?,
        })
    }
}

fn deployment_targets(fields: &Fields<'_>) -> ModelResult<IndexMap<Platform, Version>> {
    let Some(targets) = fields.child("deploymentTarget")? else {
        return Ok(IndexMap::new());
    };
    targets
        .map()
        .keys()
        .map(|literal| -> ModelResult<(Platform, Version)> {
            let platform =
                Platform::from_literal(literal).ok_or_else(|| ModelError::UnknownTargetPlatform {
                    path: targets.field_path(literal),
                    value: literal.clone(),
                })?;
            let version = targets
                .lenient_version(literal)?
                .ok_or_else(|| ModelError::MissingField {
                    path: targets.field_path(literal),
                })?;
            Ok((platform, version))
        })
        .collect()
}
