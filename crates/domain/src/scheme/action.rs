//! Pieces shared by scheme actions.

use serde::Serialize;

use crate::decode::Fields;
use crate::document::Value;
use crate::error::{ModelError, ModelResult};
use crate::literal::literal_enum;

literal_enum! {
    /// Scheme action a target is built for.
    pub enum BuildType {
        /// Run.
        Running => "running",
        /// Test.
        Testing => "testing",
        /// Profile.
        Profiling => "profiling",
        /// Analyze.
        Analyzing => "analyzing",
        /// Archive.
        Archiving => "archiving",
    }
}

impl BuildType {
    /// Parses an action name, accepting both `run` and `running` forms.
    #[must_use]
    pub fn from_action(name: &str) -> Option<Self> {
        match name {
            "run" => Some(Self::Running),
            "test" => Some(Self::Testing),
            "profile" => Some(Self::Profiling),
            "analyze" => Some(Self::Analyzing),
            "archive" => Some(Self::Archiving),
            other => Self::from_literal(other),
        }
    }

    /// Expands a shorthand such as `all`, `none`, `testing` or `indexing`.
    #[must_use]
    pub fn from_shorthand(name: &str) -> Option<Vec<Self>> {
        match name {
            "all" => Some(Self::ALL.to_vec()),
            "none" => Some(Vec::new()),
            "testing" => Some(vec![Self::Testing, Self::Analyzing]),
            "indexing" => Some(vec![Self::Testing, Self::Analyzing, Self::Archiving]),
            _ => None,
        }
    }
}

/// A target built by a scheme together with the actions it is built for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildTarget {
    /// Target name.
    pub target: String,
    /// Actions the target is built for.
    pub build_types: Vec<BuildType>,
}

impl BuildTarget {
    /// A target built for every action.
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            build_types: BuildType::ALL.to_vec(),
        }
    }

    fn decode_build_types(value: &Value, path: &str) -> ModelResult<Vec<BuildType>> {
        let unknown = |literal: &str| ModelError::UnknownLiteral {
            path: path.to_string(),
            kind: "build type",
            value: literal.to_string(),
        };
        match value {
            Value::Null => Ok(BuildType::ALL.to_vec()),
            Value::Bool(true) => Ok(BuildType::ALL.to_vec()),
            Value::Bool(false) => Ok(Vec::new()),
            Value::String(name) => BuildType::from_shorthand(name).ok_or_else(|| unknown(name)),
            Value::Sequence(items) => items
                .iter()
                .map(|item| {
                    let name = item.as_str().unwrap_or_default();
                    BuildType::from_action(name).ok_or_else(|| unknown(name))
                })
                .collect(),
            Value::Map(actions) => {
                let fields = Fields::new(actions, path);
                let mut enabled = Vec::new();
                for name in actions.keys() {
                    let build_type = BuildType::from_action(name).ok_or_else(|| unknown(name))?;
                    if fields.bool_or(name, false)? {
                        enabled.push(build_type);
                    }
                }
                Ok(enabled)
            }
            other => Err(ModelError::InvalidType {
                path: path.to_string(),
                expected: "build types",
                found: other.kind(),
            }),
        }
    }

    /// Decodes the `targets` field of a build action.
    ///
    /// Accepts a map of target name to build types, or a list whose items are
    /// target names or `{target, buildTypes}` maps.
    pub fn decode_list(fields: &Fields<'_>) -> ModelResult<Vec<Self>> {
        match fields.get("targets") {
            None => Ok(Vec::new()),
            Some(Value::Map(targets)) => targets
                .iter()
                .map(|(target, value)| -> ModelResult<Self> {
                    let path = format!("{}.{target}", fields.field_path("targets"));
                    Ok(Self {
                        target: target.clone(),
                        build_types: Self::decode_build_types(value, &path)?,
                    })
                })
                .collect(),
            Some(Value::Sequence(items)) => items
                .iter()
                .enumerate()
                .map(|(index, item)| -> ModelResult<Self> {
                    let path = fields.item_path("targets", index);
                    if let Some(name) = item.as_str() {
                        return Ok(Self::new(name));
                    }
                    let entry = Fields::from_value(item, path)?;
                    let build_types = match entry.get("buildTypes") {
                        Some(value) => {
                            Self::decode_build_types(value, &entry.field_path("buildTypes"))?
                        }
                        None => BuildType::ALL.to_vec(),
                    };
                    Ok(Self {
                        target: entry.required_string("target")?,
                        build_types,
                    })
                })
                .collect(),
            Some(other) => Err(ModelError::InvalidType {
                path: fields.field_path("targets"),
                expected: "map or sequence",
                found: other.kind(),
            }),
        }
    }
}

/// A script run before or after a scheme action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionAction {
    /// Action name.
    pub name: String,
    /// Script body.
    pub script: String,
    /// Target whose build settings the script sees.
    pub settings_target: Option<String>,
}

impl ExecutionAction {
    fn decode(fields: &Fields<'_>) -> ModelResult<Self> {
        Ok(Self {
            name: fields
                .string("name")?
                .unwrap_or_else(|| "Run Script".to_string()),
            script: fields.required_string("script")?,
            settings_target: fields.string("settingsTarget")?,
        })
    }

    /// Decodes a list of execution actions under `key`.
    pub fn decode_list(fields: &Fields<'_>, key: &str) -> ModelResult<Vec<Self>> {
        fields.maps(key)?.iter().map(Self::decode).collect()
    }
}

/// An environment variable set by a scheme action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentVariable {
    /// Variable name.
    pub variable: String,
    /// Variable value.
    pub value: String,
    /// Whether the variable is enabled.
    pub enabled: bool,
}

impl EnvironmentVariable {
    /// An enabled variable.
    #[must_use]
    pub fn new(variable: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            value: value.into(),
            enabled: true,
        }
    }

    /// Decodes `environmentVariables`.
    ///
    /// Accepts a name to value map, where booleans become `YES`/`NO`, or a list
    /// of `{variable, value, isEnabled}` maps.
    pub fn decode_list(fields: &Fields<'_>) -> ModelResult<Vec<Self>> {
        const KEY: &str = "environmentVariables";
        match fields.get(KEY) {
            None => Ok(Vec::new()),
            Some(Value::Map(map)) => map
                .iter()
                .map(|(name, value)| {
                    let text = match value {
                        Value::Bool(true) => Some("YES".to_string()),
                        Value::Bool(false) => Some("NO".to_string()),
                        other => other.scalar_text(),
                    };
                    text.map(|text| Self::new(name.clone(), text))
                        .ok_or_else(|| ModelError::InvalidType {
                            path: format!("{}.{name}", fields.field_path(KEY)),
                            expected: "string",
                            found: value.kind(),
                        })
                })
                .collect(),
            Some(Value::Sequence(_)) => fields
                .maps(KEY)?
                .iter()
                .map(|entry| -> ModelResult<Self> {
                    Ok(Self {
                        variable: entry.required_string("variable")?,
                        value: match entry.get("value") {
                            Some(Value::Bool(flag)) => if *flag { "YES" } else { "NO" }.to_string(),
                            _ => entry.required_string("value")?,
                        },
                        enabled: entry.bool_or("isEnabled", true)?,
                    })
                })
                .collect(),
            Some(other) => Err(ModelError::InvalidType {
                path: fields.field_path(KEY),
                expected: "map or sequence",
                found: other.kind(),
            }),
        }
    }
}

/// A test target of a test action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestTarget {
    /// Target name.
    pub name: String,
    /// Run tests in parallel.
    pub parallelizable: bool,
    /// Randomize test order.
    pub random_execution_order: bool,
    /// Simulated location.
    pub location: Option<String>,
    /// Skip the whole target.
    pub skipped: bool,
    /// Tests that are skipped.
    pub skipped_tests: Vec<String>,
    /// Tests that are selected. Empty selects all.
    pub selected_tests: Vec<String>,
}

impl TestTarget {
    /// A test target with default options.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parallelizable: false,
            random_execution_order: false,
            location: None,
            skipped: false,
            skipped_tests: Vec::new(),
            selected_tests: Vec::new(),
        }
    }

    /// Decodes a list of test targets: names or maps with `name`.
    pub fn decode_list(fields: &Fields<'_>, key: &str) -> ModelResult<Vec<Self>> {
        fields
            .sequence(key)?
            .iter()
            .enumerate()
            .map(|(index, item)| -> ModelResult<Self> {
                if let Some(name) = item.as_str() {
                    return Ok(Self::new(name));
                }
                let entry = Fields::from_value(item, fields.item_path(key, index))?;
                Ok(Self {
                    name: entry.required_string("name")?,
                    parallelizable: entry.bool_or("parallelizable", false)?,
                    random_execution_order: entry.bool_or("randomExecutionOrder", false)?,
                    location: entry.string("location")?,
                    skipped: entry.bool_or("skipped", false)?,
                    skipped_tests: entry.string_list("skippedTests")?,
                    selected_tests: entry.string_list("selectedTests")?,
                })
            })
            .collect()
    }
}

/// A test plan referenced by a test action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestPlan {
    /// Path to the `.xctestplan` file.
    pub path: String,
    /// Whether this is the default plan.
    pub default_plan: bool,
}

impl TestPlan {
    /// Decodes `testPlans`.
    pub fn decode_list(fields: &Fields<'_>) -> ModelResult<Vec<Self>> {
        fields
            .maps("testPlans")?
            .iter()
            .map(|plan| -> ModelResult<Self> {
                Ok(Self {
                    path: plan.required_string("path")?,
                    default_plan: plan.bool_or("defaultPlan", false)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::{doc, seq};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_targets_map_form() {
        let document = doc! {
            "targets" => doc! {
                "Target1" => "all",
                "Target2" => "testing",
                "Target3" => "none",
                "Target4" => doc! { "testing" => true },
                "Target5" => doc! { "testing" => false },
                "Target6" => seq!["run", "testing"],
                "Target7" => "indexing",
            },
        };
        let targets = BuildTarget::decode_list(&Fields::new(&document, "schemes.Scheme.build"))
            .unwrap();

        assert_eq!(
            targets,
            vec![
                BuildTarget::new("Target1"),
                BuildTarget {
                    target: "Target2".into(),
                    build_types: vec![BuildType::Testing, BuildType::Analyzing]
                },
                BuildTarget {
                    target: "Target3".into(),
                    build_types: vec![]
                },
                BuildTarget {
                    target: "Target4".into(),
                    build_types: vec![BuildType::Testing]
                },
                BuildTarget {
                    target: "Target5".into(),
                    build_types: vec![]
                },
                BuildTarget {
                    target: "Target6".into(),
                    build_types: vec![BuildType::Running, BuildType::Testing]
                },
                BuildTarget {
                    target: "Target7".into(),
                    build_types: vec![
                        BuildType::Testing,
                        BuildType::Analyzing,
                        BuildType::Archiving
                    ]
                },
            ]
        );
    }

    #[test]
    fn test_build_targets_list_form() {
        let document = doc! {
            "targets" => seq![
                "App",
                doc! { "target" => "Tests", "buildTypes" => "testing" },
            ],
        };
        let targets = BuildTarget::decode_list(&Fields::new(&document, "build")).unwrap();

        assert_eq!(targets[0], BuildTarget::new("App"));
        assert_eq!(targets[1].target, "Tests");
        assert_eq!(
            targets[1].build_types,
            vec![BuildType::Testing, BuildType::Analyzing]
        );
    }

    #[test]
    fn test_unknown_build_type() {
        let document = doc! { "targets" => doc! { "App" => "sometimes" } };
        let error = BuildTarget::decode_list(&Fields::new(&document, "build")).unwrap_err();

        assert_eq!(error.path(), "build.targets.App");
    }

    #[test]
    fn test_environment_variable_forms() {
        let map_form = doc! {
            "environmentVariables" => doc! { "ENV" => "VALUE", "FLAG" => true },
        };
        assert_eq!(
            EnvironmentVariable::decode_list(&Fields::new(&map_form, "run")).unwrap(),
            vec![
                EnvironmentVariable::new("ENV", "VALUE"),
                EnvironmentVariable::new("FLAG", "YES"),
            ]
        );

        let list_form = doc! {
            "environmentVariables" => seq![
                doc! { "variable" => "ENV", "value" => "VALUE", "isEnabled" => false },
            ],
        };
        assert_eq!(
            EnvironmentVariable::decode_list(&Fields::new(&list_form, "run")).unwrap(),
            vec![EnvironmentVariable {
                variable: "ENV".into(),
                value: "VALUE".into(),
                enabled: false
            }]
        );
    }

    #[test]
    fn test_execution_action_defaults_name() {
        let document = doc! { "preActions" => seq![doc! { "script" => "echo" }] };
        let actions = ExecutionAction::decode_list(&Fields::new(&document, "build"), "preActions")
            .unwrap();

        assert_eq!(actions[0].name, "Run Script");
        assert_eq!(actions[0].script, "echo");
    }

    #[test]
    fn test_test_targets() {
        let document = doc! {
            "targets" => seq![
                "Unit",
                doc! { "name" => "UI", "parallelizable" => true, "skippedTests" => seq!["Slow"] },
            ],
        };
        let targets = TestTarget::decode_list(&Fields::new(&document, "test"), "targets").unwrap();

        assert_eq!(targets[0], TestTarget::new("Unit"));
        assert!(targets[1].parallelizable);
        assert_eq!(targets[1].skipped_tests, vec!["Slow"]);
    }
}
