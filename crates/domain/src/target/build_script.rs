//! Run-script phases and build rules.

use serde::Serialize;

use crate::decode::Fields;
use crate::error::ModelResult;

/// Where a build script's body comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum ScriptSource {
    /// A script file.
    Path(String),
    /// Inline script text.
    Script(String),
}

/// A run-script build phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct BuildScript {
    /// Script body.
    pub script: ScriptSource,
    /// Phase name.
    pub name: Option<String>,
    /// Input files.
    pub input_files: Vec<String>,
    /// Output files.
    pub output_files: Vec<String>,
    /// Input file lists.
    pub input_file_lists: Vec<String>,
    /// Output file lists.
    pub output_file_lists: Vec<String>,
    /// Shell used to run the script.
    pub shell: Option<String>,
    /// Run only for install builds.
    pub run_only_when_installing: bool,
    /// Print the environment in the build log.
    pub show_env_vars: bool,
    /// Skip the script when inputs are unchanged.
    pub based_on_dependency_analysis: bool,
    /// Dependency file produced by the script.
    pub discovered_dependency_file: Option<String>,
}

impl BuildScript {
    /// A script with default options.
    #[must_use]
    pub const fn new(script: ScriptSource) -> Self {
        Self {
            script,
            name: None,
            input_files: Vec::new(),
            output_files: Vec::new(),
            input_file_lists: Vec::new(),
            output_file_lists: Vec::new(),
            shell: None,
            run_only_when_installing: false,
            show_env_vars: true,
            based_on_dependency_analysis: true,
            discovered_dependency_file: None,
        }
    }

    /// Decodes a build script. Exactly one of `path` or `script` must be set.
    pub fn decode(fields: &Fields<'_>) -> ModelResult<Self> {
        let marker = fields.required_marker(&["path", "script"])?;
        let body = fields.required_string(marker)?;
        let script = if marker == "path" {
            ScriptSource::Path(body)
        } else {
            ScriptSource::Script(body)
        };

        Ok(Self {
            script,
            name: fields.string("name")?,
            input_files: fields.string_list("inputFiles")?,
            output_files: fields.string_list("outputFiles")?,
            input_file_lists: fields.string_list("inputFileLists")?,
            output_file_lists: fields.string_list("outputFileLists")?,
            shell: fields.string("shell")?,
            run_only_when_installing: fields.bool_or("runOnlyWhenInstalling", false)?,
            show_env_vars: fields.bool_or("showEnvVars", true)?,
            based_on_dependency_analysis: fields.bool_or("basedOnDependencyAnalysis", true)?,
            discovered_dependency_file: fields.string("discoveredDependencyFile")?,
        })
    }

    /// Decodes a list field of build scripts.
    pub fn decode_list(fields: &Fields<'_>, key: &str) -> ModelResult<Vec<Self>> {
        fields.maps(key)?.iter().map(Self::decode).collect()
    }
}

/// Which files a build rule applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum BuildRuleFileType {
    /// A glob pattern.
    Pattern(String),
    /// A file type identifier.
    Type(String),
}

/// What a build rule runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum BuildRuleAction {
    /// A compiler specification identifier.
    CompilerSpec(String),
    /// An inline script.
    Script(String),
}

/// A custom build rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRule {
    /// Matched files.
    pub file_type: BuildRuleFileType,
    /// Action run for matched files.
    pub action: BuildRuleAction,
    /// Rule name.
    pub name: Option<String>,
    /// Files the rule produces.
    pub output_files: Vec<String>,
    /// Compiler flags for each produced file.
    pub output_files_compiler_flags: Vec<String>,
    /// Run once per architecture.
    pub run_once_per_architecture: Option<bool>,
}

impl BuildRule {
    /// Decodes a build rule.
    ///
    /// One of `filePattern`/`fileType` and one of `script`/`compilerSpec` must be set.
    pub fn decode(fields: &Fields<'_>) -> ModelResult<Self> {
        let file_marker = fields.required_marker(&["filePattern", "fileType"])?;
        let file_value = fields.required_string(file_marker)?;
        let file_type = if file_marker == "filePattern" {
            BuildRuleFileType::Pattern(file_value)
        } else {
            BuildRuleFileType::Type(file_value)
        };

        let action_marker = fields.required_marker(&["script", "compilerSpec"])?;
        let action_value = fields.required_string(action_marker)?;
        let action = if action_marker == "script" {
            BuildRuleAction::Script(action_value)
        } else {
            BuildRuleAction::CompilerSpec(action_value)
        };

        Ok(Self {
            file_type,
            action,
            name: fields.string("name")?,
            output_files: fields.string_list("outputFiles")?,
            output_files_compiler_flags: fields.string_list("outputFilesCompilerFlags")?,
            run_once_per_architecture: fields.bool("runOncePerArchitecture")?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::{doc, seq};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_script_forms() {
        let document = doc! {
            "preBuildScripts" => seq![
                doc! { "path" => "script.sh", "name" => "Lint" },
                doc! { "script" => "echo hi", "inputFiles" => seq!["a"], "showEnvVars" => false },
            ],
        };
        let scripts =
            BuildScript::decode_list(&Fields::new(&document, "targets.App"), "preBuildScripts")
                .unwrap();

        assert_eq!(scripts[0].script, ScriptSource::Path("script.sh".into()));
        assert_eq!(scripts[0].name.as_deref(), Some("Lint"));
        assert!(scripts[0].show_env_vars);
        assert_eq!(scripts[1].script, ScriptSource::Script("echo hi".into()));
        assert_eq!(scripts[1].input_files, vec!["a"]);
        assert!(!scripts[1].show_env_vars);
    }

    #[test]
    fn test_build_script_needs_exactly_one_body() {
        let neither = doc! { "name" => "x" };
        assert!(matches!(
            BuildScript::decode(&Fields::new(&neither, "s")),
            Err(ModelError::MissingMarker { .. })
        ));

        let both = doc! { "path" => "a", "script" => "b" };
        assert!(matches!(
            BuildScript::decode(&Fields::new(&both, "s")),
            Err(ModelError::AmbiguousMarkers { .. })
        ));
    }

    #[test]
    fn test_build_rule() {
        let document = doc! {
            "filePattern" => "*.xcassets",
            "script" => "pre_process_swift.py",
            "name" => "My Build Rule",
            "outputFiles" => seq!["$(SRCROOT)/Generated.swift"],
        };
        let rule = BuildRule::decode(&Fields::new(&document, "rule")).unwrap();

        assert_eq!(rule.file_type, BuildRuleFileType::Pattern("*.xcassets".into()));
        assert_eq!(rule.action, BuildRuleAction::Script("pre_process_swift.py".into()));
        assert_eq!(rule.name.as_deref(), Some("My Build Rule"));
    }

    #[test]
    fn test_build_rule_compiler_spec() {
        let document = doc! { "fileType" => "sourcecode.swift", "compilerSpec" => "com.apple.xcode.tools.swift.compiler" };
        let rule = BuildRule::decode(&Fields::new(&document, "rule")).unwrap();

        assert_eq!(rule.file_type, BuildRuleFileType::Type("sourcecode.swift".into()));
        assert_eq!(
            rule.action,
            BuildRuleAction::CompilerSpec("com.apple.xcode.tools.swift.compiler".into())
        );
    }
}
