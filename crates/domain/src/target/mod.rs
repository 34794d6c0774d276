//! Build targets.

mod build_script;
mod dependency;
mod source;

pub use build_script::{BuildRule, BuildRuleAction, BuildRuleFileType, BuildScript, ScriptSource};
pub use dependency::{CarthageLinkType, Dependency, DependencyKind, PlatformFilter};
pub use source::{BuildPhase, HeaderVisibility, SourceType, TargetSource};

use indexmap::IndexMap;
use semver::Version;
use serde::Serialize;
use tracing::trace;

use crate::decode::Fields;
use crate::document::{Document, Value};
use crate::error::{ModelError, ModelResult};
use crate::platform::{Platform, ProductType, SupportedDestination};
use crate::scheme::TargetScheme;
use crate::settings::Settings;
use crate::version;

/// A generated property list: its path plus the properties it contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plist {
    /// Output path.
    pub path: String,
    /// Properties written to the file.
    pub properties: Document,
}

impl Plist {
    fn decode_field(fields: &Fields<'_>, key: &str) -> ModelResult<Option<Self>> {
        let Some(plist) = fields.child(key)? else {
            return Ok(None);
        };
        Ok(Some(Self {
            path: plist.required_string("path")?,
            properties: plist.document("properties")?,
        }))
    }
}

/// A Swift package build tool plugin applied to a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildToolPlugin {
    /// Plugin product name.
    pub plugin: String,
    /// Package providing the plugin.
    pub package: String,
}

/// A target of the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    /// Target name.
    pub name: String,
    /// Product type.
    #[serde(rename = "type")]
    pub product_type: ProductType,
    /// Platform built for.
    pub platform: Platform,
    /// Destinations of a multi-destination target.
    pub supported_destinations: Vec<SupportedDestination>,
    /// Minimum OS version.
    pub deployment_target: Option<Version>,
    /// Product name, defaulting to the target name.
    pub product_name: String,
    /// Build settings.
    pub settings: Settings,
    /// Config file per configuration.
    pub config_files: IndexMap<String, String>,
    /// Sources, in order.
    pub sources: Vec<TargetSource>,
    /// Dependencies applying to this target's platform, in order.
    pub dependencies: Vec<Dependency>,
    /// Generated Info.plist.
    pub info: Option<Plist>,
    /// Generated entitlements.
    pub entitlements: Option<Plist>,
    /// Scripts run before compiling.
    pub pre_build_scripts: Vec<BuildScript>,
    /// Scripts run after compiling.
    pub post_compile_scripts: Vec<BuildScript>,
    /// Scripts run after building.
    pub post_build_scripts: Vec<BuildScript>,
    /// Custom build rules.
    pub build_rules: Vec<BuildRule>,
    /// Package build tool plugins.
    pub build_tool_plugins: Vec<BuildToolPlugin>,
    /// Generated scheme.
    pub scheme: Option<TargetScheme>,
    /// Copy files phases only run on install builds.
    pub only_copy_files_on_install: bool,
    /// Place the resources phase before sources.
    pub put_resources_before_sources_build_phase: bool,
    /// Extra target attributes.
    pub attributes: Document,
}

impl Target {
    /// A target with no sources, settings or dependencies.
    #[must_use]
    pub fn new(name: impl Into<String>, product_type: ProductType, platform: Platform) -> Self {
        let name = name.into();
        Self {
            product_name: name.clone(),
            name,
            product_type,
            platform,
            supported_destinations: Vec::new(),
            deployment_target: None,
            settings: Settings::default(),
            config_files: IndexMap::new(),
            sources: Vec::new(),
            dependencies: Vec::new(),
            info: None,
            entitlements: None,
            pre_build_scripts: Vec::new(),
            post_compile_scripts: Vec::new(),
            post_build_scripts: Vec::new(),
            build_rules: Vec::new(),
            build_tool_plugins: Vec::new(),
            scheme: None,
            only_copy_files_on_install: false,
            put_resources_before_sources_build_phase: false,
            attributes: Document::new(),
        }
    }

    /// Decodes the target `name` from a fully resolved target map.
    pub fn decode(name: &str, fields: &Fields<'_>) -> ModelResult<Self> {
        let product_type = fields
            .literal("type", ProductType::from_literal, |path, value| {
                ModelError::UnknownTargetType { path, value }
            })?
            .ok_or_else(|| ModelError::MissingField {
                path: fields.field_path("type"),
            })?;

        let supported_destinations = supported_destinations(fields)?;
        let platform = platform(fields, !supported_destinations.is_empty())?;

        let dependencies = fields
            .maps("dependencies")?
            .iter()
            .map(Dependency::decode)
            .collect::<ModelResult<Vec<_>>>()?
            .into_iter()
            .filter(|dependency| {
                let applies = dependency.applies_to(platform);
                if !applies {
                    trace!(target_name = name, dependency = %dependency.reference, "Dependency filtered out by platform");
                }
                applies
            })
            .collect();

        let build_tool_plugins = fields
            .maps("buildToolPlugins")?
            .iter()
            .map(|plugin| -> ModelResult<BuildToolPlugin> {
                Ok(BuildToolPlugin {
                    plugin: plugin.required_string("plugin")?,
                    package: plugin.required_string("package")?,
                })
            })
            .collect::<ModelResult<Vec<_>>>()?;

        Ok(Self {
            name: name.to_string(),
            product_type,
            platform,
            supported_destinations,
            deployment_target: deployment_target(fields, platform)?,
            product_name: fields
                .string("productName")?
                .unwrap_or_else(|| name.to_string()),
            settings: Settings::decode_field(fields, "settings")?,
            config_files: fields.string_map("configFiles")?,
            sources: TargetSource::decode_list(fields)?,
            dependencies,
            info: Plist::decode_field(fields, "info")?,
            entitlements: Plist::decode_field(fields, "entitlements")?,
            pre_build_scripts: BuildScript::decode_list(fields, "preBuildScripts")?,
            post_compile_scripts: BuildScript::decode_list(fields, "postCompileScripts")?,
            post_build_scripts: BuildScript::decode_list(fields, "postBuildScripts")?,
            build_rules: fields
                .maps("buildRules")?
                .iter()
                .map(BuildRule::decode)
                .collect::<ModelResult<_>>()?,
            build_tool_plugins,
            scheme: fields
                .child("scheme")?
                .map(|scheme| TargetScheme::decode(&scheme))
                .transpose()?,
            only_copy_files_on_install: fields.bool_or("onlyCopyFilesOnInstall", false)?,
            put_resources_before_sources_build_phase: fields
                .bool_or("putResourcesBeforeSourcesBuildPhase", false)?,
            attributes: fields.document("attributes")?,
        })
    }

    /// Whether the target builds a test bundle.
    #[must_use]
    pub const fn is_test(&self) -> bool {
        self.product_type.is_test()
    }
}

fn supported_destinations(fields: &Fields<'_>) -> ModelResult<Vec<SupportedDestination>> {
    let destinations = fields
        .string_list("supportedDestinations")?
        .into_iter()
        .enumerate()
        .map(|(index, literal)| {
            SupportedDestination::from_literal(&literal).ok_or_else(|| {
                ModelError::UnknownLiteral {
                    path: fields.item_path("supportedDestinations", index),
                    kind: "supported destination",
                    value: literal,
                }
            })
        })
        .collect::<ModelResult<Vec<_>>>()?;
    Ok(SupportedDestination::with_implied(destinations))
}

fn platform(fields: &Fields<'_>, has_destinations: bool) -> ModelResult<Platform> {
    let path = fields.field_path("platform");
    match fields.get("platform") {
        None if has_destinations => Ok(Platform::Auto),
        None => Err(ModelError::UnknownTargetPlatform {
            path,
            value: String::new(),
        }),
        Some(Value::Sequence(_)) => Err(ModelError::InvalidTargetPlatformAsArray { path }),
        Some(Value::String(literal)) => {
            Platform::from_literal(literal).ok_or_else(|| ModelError::UnknownTargetPlatform {
                path,
                value: literal.clone(),
            })
        }
        Some(other) => Err(ModelError::InvalidType {
            path,
            expected: "string",
            found: other.kind(),
        }),
    }
}

/// Reads `deploymentTarget`, which may still be a per-platform map.
fn deployment_target(fields: &Fields<'_>, platform: Platform) -> ModelResult<Option<Version>> {
    let Some(Value::Map(per_platform)) = fields.get("deploymentTarget") else {
        return fields.lenient_version("deploymentTarget");
    };
    let path = fields.field_path("deploymentTarget");
    let Some(value) = per_platform.get(platform.as_str()) else {
        return Ok(None);
    };
    let text = value.scalar_text().unwrap_or_default();
    version::parse_lenient(&text)
        .map(Some)
        .ok_or_else(|| ModelError::InvalidVersion {
            path: format!("{path}.{platform}"),
            value: text,
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::{doc, seq};
    use pretty_assertions::assert_eq;

    fn decode(document: &Document) -> ModelResult<Target> {
        Target::decode("App", &Fields::new(document, "targets.App"))
    }

    #[test]
    fn test_minimal_target() {
        let target = decode(&doc! { "type" => "application", "platform" => "iOS" }).unwrap();
        assert_eq!(
            target,
            Target::new("App", ProductType::Application, Platform::Ios)
        );
    }

    #[test]
    fn test_full_target() {
        let target = decode(&doc! {
            "type" => "framework",
            "platform" => "iOS",
            "productName" => "Framework",
            "deploymentTarget" => 10.0,
            "sources" => seq!["Sources"],
            "configFiles" => doc! { "debug" => "Configs/debug.xcconfig" },
            "settings" => doc! { "SETTING" => "value" },
            "info" => doc! { "path" => "Info.plist", "properties" => doc! { "CFBundleName" => "App" } },
            "dependencies" => seq![doc! { "target" => "Core" }, doc! { "sdk" => "UIKit.framework" }],
            "preBuildScripts" => seq![doc! { "script" => "echo" }],
            "buildToolPlugins" => seq![doc! { "plugin" => "Lint", "package" => "Tools" }],
            "scheme" => doc! { "testTargets" => seq!["Tests"] },
            "attributes" => doc! { "ProvisioningStyle" => "Automatic" },
        })
        .unwrap();

        assert_eq!(target.product_type, ProductType::Framework);
        assert_eq!(target.product_name, "Framework");
        assert_eq!(target.deployment_target, Some(Version::new(10, 0, 0)));
        assert_eq!(target.sources, vec![TargetSource::new("Sources")]);
        assert_eq!(target.config_files["debug"], "Configs/debug.xcconfig");
        assert_eq!(target.settings, Settings::new(doc! { "SETTING" => "value" }));
        assert_eq!(target.info.unwrap().path, "Info.plist");
        assert_eq!(target.dependencies.len(), 2);
        assert_eq!(target.pre_build_scripts.len(), 1);
        assert_eq!(target.build_tool_plugins[0].package, "Tools");
        assert!(target.scheme.is_some());
        assert_eq!(target.attributes["ProvisioningStyle"], Value::from("Automatic"));
    }

    #[test]
    fn test_unknown_type_and_platform() {
        assert_eq!(
            decode(&doc! { "type" => "invalid", "platform" => "iOS" }).unwrap_err(),
            ModelError::UnknownTargetType {
                path: "targets.App.type".into(),
                value: "invalid".into()
            }
        );
        assert_eq!(
            decode(&doc! { "type" => "application", "platform" => "invalid" }).unwrap_err(),
            ModelError::UnknownTargetPlatform {
                path: "targets.App.platform".into(),
                value: "invalid".into()
            }
        );
    }

    #[test]
    fn test_missing_platform() {
        assert_eq!(
            decode(&doc! { "type" => "application" }).unwrap_err(),
            ModelError::UnknownTargetPlatform {
                path: "targets.App.platform".into(),
                value: String::new()
            }
        );
    }

    #[test]
    fn test_supported_destinations_default_platform_to_auto() {
        let target = decode(&doc! {
            "type" => "application",
            "supportedDestinations" => seq!["macCatalyst", "tvOS"],
        })
        .unwrap();

        assert_eq!(target.platform, Platform::Auto);
        assert_eq!(
            target.supported_destinations,
            vec![
                SupportedDestination::MacCatalyst,
                SupportedDestination::TvOs,
                SupportedDestination::Ios
            ]
        );
    }

    #[test]
    fn test_platform_list_with_destinations_is_rejected() {
        let error = decode(&doc! {
            "type" => "application",
            "platform" => seq!["iOS", "tvOS"],
            "supportedDestinations" => seq!["iOS"],
        })
        .unwrap_err();

        assert_eq!(
            error,
            ModelError::InvalidTargetPlatformAsArray {
                path: "targets.App.platform".into()
            }
        );
    }

    #[test]
    fn test_dependencies_filtered_by_platform_keep_order() {
        let target = decode(&doc! {
            "type" => "application",
            "platform" => "tvOS",
            "dependencies" => seq![
                doc! { "target" => "A" },
                doc! { "target" => "B", "platforms" => seq!["iOS"] },
                doc! { "target" => "C", "platforms" => seq!["tvOS", "iOS"] },
            ],
        })
        .unwrap();

        let names: Vec<&str> = target
            .dependencies
            .iter()
            .map(|d| d.reference.as_str())
            .collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn test_deployment_target_map_is_narrowed() {
        let target = decode(&doc! {
            "type" => "application",
            "platform" => "tvOS",
            "deploymentTarget" => doc! { "iOS" => "13", "tvOS" => "14.1" },
        })
        .unwrap();

        assert_eq!(target.deployment_target, Some(Version::new(14, 1, 0)));
    }

    #[test]
    fn test_dependency_error_path() {
        let error = decode(&doc! {
            "type" => "application",
            "platform" => "iOS",
            "dependencies" => seq![doc! { "target" => "A" }, doc! { "invalid" => "B" }],
        })
        .unwrap_err();

        assert_eq!(error.path(), "targets.App.dependencies[1]");
    }
}
