//! Schemes and their actions.

mod action;

pub use action::{
    BuildTarget, BuildType, EnvironmentVariable, ExecutionAction, TestPlan, TestTarget,
};

use indexmap::IndexMap;
use serde::Serialize;

use crate::decode::Fields;
use crate::error::{ModelError, ModelResult};
use crate::literal::literal_enum;

literal_enum! {
    /// GPU frame capture mode of a run action.
    pub enum GpuFrameCaptureMode {
        /// Chosen automatically.
        AutoEnabled => "autoEnabled",
        /// Metal capture.
        Metal => "metal",
        /// OpenGL capture.
        OpenGl => "openGL",
        /// Capture disabled.
        Disabled => "disabled",
    }
}

literal_enum! {
    /// Format of screen captures taken during tests.
    pub enum ScreenCaptureFormat {
        /// Still screenshots.
        Screenshots => "screenshots",
        /// Screen recordings.
        ScreenRecording => "screenRecording",
    }
}

/// Visibility and ordering of a scheme in the scheme list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Management {
    /// Whether the scheme is shared.
    pub shared: bool,
    /// Position in the scheme list.
    pub order_hint: Option<i64>,
    /// Whether the scheme is shown.
    pub is_shown: Option<bool>,
}

impl Management {
    fn decode_field(fields: &Fields<'_>) -> ModelResult<Option<Self>> {
        let Some(management) = fields.child("management")? else {
            return Ok(None);
        };
        Ok(Some(Self {
            shared: management.bool_or("shared", true)?,
            order_hint: management.int("orderHint")?,
            is_shown: management.bool("isShown")?,
        }))
    }
}

/// The build action of a scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildAction {
    /// Targets built, in order.
    pub targets: Vec<BuildTarget>,
    /// Build targets in parallel.
    pub parallelize_build: bool,
    /// Find implicit dependencies.
    pub build_implicit_dependencies: bool,
    /// Run post actions even when the build fails.
    pub run_post_actions_on_failure: bool,
    /// Scripts run before building.
    pub pre_actions: Vec<ExecutionAction>,
    /// Scripts run after building.
    pub post_actions: Vec<ExecutionAction>,
}

impl BuildAction {
    fn decode(fields: &Fields<'_>) -> ModelResult<Self> {
        Ok(Self {
            targets: BuildTarget::decode_list(fields)?,
            parallelize_build: fields.bool_or("parallelizeBuild", true)?,
            build_implicit_dependencies: fields.bool_or("buildImplicitDependencies", true)?,
            run_post_actions_on_failure: fields.bool_or("runPostActionsOnFailure", false)?,
            pre_actions: ExecutionAction::decode_list(fields, "preActions")?,
            post_actions: ExecutionAction::decode_list(fields, "postActions")?,
        })
    }
}

/// The run action of a scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunAction {
    /// Build configuration.
    pub config: Option<String>,
    /// Launch arguments and whether each is enabled.
    pub command_line_arguments: IndexMap<String, bool>,
    /// Environment variables.
    pub environment_variables: Vec<EnvironmentVariable>,
    /// Scripts run before launching.
    pub pre_actions: Vec<ExecutionAction>,
    /// Scripts run after launching.
    pub post_actions: Vec<ExecutionAction>,
    /// Launch style for extensions.
    pub launch_automatically_substyle: Option<String>,
    /// GPU frame capture mode.
    pub enable_gpu_frame_capture_mode: Option<GpuFrameCaptureMode>,
    /// StoreKit configuration file.
    pub store_kit_configuration: Option<String>,
    /// Disable the main thread checker.
    pub disable_main_thread_checker: bool,
    /// Disable the thread performance checker.
    pub disable_thread_performance_checker: bool,
    /// Executable to launch instead of the product.
    pub executable: Option<String>,
    /// Ask which app to launch.
    pub ask_for_app_to_launch: Option<bool>,
}

impl RunAction {
    fn decode(fields: &Fields<'_>) -> ModelResult<Self> {
        Ok(Self {
            config: fields.string("config")?,
            command_line_arguments: fields.bool_map("commandLineArguments")?,
            environment_variables: EnvironmentVariable::decode_list(fields)?,
            pre_actions: ExecutionAction::decode_list(fields, "preActions")?,
            post_actions: ExecutionAction::decode_list(fields, "postActions")?,
            launch_automatically_substyle: fields.string("launchAutomaticallySubstyle")?,
            enable_gpu_frame_capture_mode: fields.enumeration(
                "enableGPUFrameCaptureMode",
                "GPU frame capture mode",
                GpuFrameCaptureMode::from_literal,
            )?,
            store_kit_configuration: fields.string("storeKitConfiguration")?,
            disable_main_thread_checker: fields.bool_or("disableMainThreadChecker", false)?,
            disable_thread_performance_checker: fields
                .bool_or("disableThreadPerformanceChecker", false)?,
            executable: fields.string("executable")?,
            ask_for_app_to_launch: fields.bool("askForAppToLaunch")?,
        })
    }
}

/// The test action of a scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct TestAction {
    /// Build configuration.
    pub config: Option<String>,
    /// Collect code coverage.
    pub gather_coverage_data: bool,
    /// Targets coverage is collected for.
    pub coverage_targets: Vec<String>,
    /// Disable the main thread checker.
    pub disable_main_thread_checker: bool,
    /// Pause on every main thread checker issue.
    pub stop_on_every_main_thread_checker_issue: bool,
    /// Test targets.
    pub targets: Vec<TestTarget>,
    /// Test plans.
    pub test_plans: Vec<TestPlan>,
    /// Capture format for attachments.
    pub preferred_screen_capture_format: Option<ScreenCaptureFormat>,
    /// Launch arguments and whether each is enabled.
    pub command_line_arguments: IndexMap<String, bool>,
    /// Environment variables.
    pub environment_variables: Vec<EnvironmentVariable>,
    /// Scripts run before testing.
    pub pre_actions: Vec<ExecutionAction>,
    /// Scripts run after testing.
    pub post_actions: Vec<ExecutionAction>,
    /// Application language.
    pub language: Option<String>,
    /// Application region.
    pub region: Option<String>,
    /// Capture performance tests debug output.
    pub debug_enabled: bool,
}

impl TestAction {
    fn decode(fields: &Fields<'_>) -> ModelResult<Self> {
        Ok(Self {
            config: fields.string("config")?,
            gather_coverage_data: fields.bool_or("gatherCoverageData", false)?,
            coverage_targets: fields.string_list("coverageTargets")?,
            disable_main_thread_checker: fields.bool_or("disableMainThreadChecker", false)?,
            stop_on_every_main_thread_checker_issue: fields
                .bool_or("stopOnEveryMainThreadCheckerIssue", false)?,
            targets: TestTarget::decode_list(fields, "targets")?,
            test_plans: TestPlan::decode_list(fields)?,
            preferred_screen_capture_format: fields.enumeration(
                "preferredScreenCaptureFormat",
                "screen capture format",
                ScreenCaptureFormat::from_literal,
            )?,
            command_line_arguments: fields.bool_map("commandLineArguments")?,
            environment_variables: EnvironmentVariable::decode_list(fields)?,
            pre_actions: ExecutionAction::decode_list(fields, "preActions")?,
            post_actions: ExecutionAction::decode_list(fields, "postActions")?,
            language: fields.string("language")?,
            region: fields.string("region")?,
            debug_enabled: fields.bool_or("debugEnabled", false)?,
        })
    }
}

/// The profile action of a scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileAction {
    /// Build configuration.
    pub config: Option<String>,
    /// Launch arguments and whether each is enabled.
    pub command_line_arguments: IndexMap<String, bool>,
    /// Environment variables.
    pub environment_variables: Vec<EnvironmentVariable>,
    /// Scripts run before profiling.
    pub pre_actions: Vec<ExecutionAction>,
    /// Scripts run after profiling.
    pub post_actions: Vec<ExecutionAction>,
}

impl ProfileAction {
    fn decode(fields: &Fields<'_>) -> ModelResult<Self> {
        Ok(Self {
            config: fields.string("config")?,
            command_line_arguments: fields.bool_map("commandLineArguments")?,
            environment_variables: EnvironmentVariable::decode_list(fields)?,
            pre_actions: ExecutionAction::decode_list(fields, "preActions")?,
            post_actions: ExecutionAction::decode_list(fields, "postActions")?,
        })
    }
}

/// The analyze action of a scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalyzeAction {
    /// Build configuration.
    pub config: Option<String>,
}

/// The archive action of a scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveAction {
    /// Build configuration.
    pub config: Option<String>,
    /// Archive name.
    pub custom_archive_name: Option<String>,
    /// Reveal the archive in the organizer.
    pub reveal_archive_in_organizer: bool,
    /// Scripts run before archiving.
    pub pre_actions: Vec<ExecutionAction>,
    /// Scripts run after archiving.
    pub post_actions: Vec<ExecutionAction>,
}

impl ArchiveAction {
    fn decode(fields: &Fields<'_>) -> ModelResult<Self> {
        Ok(Self {
            config: fields.string("config")?,
            custom_archive_name: fields.string("customArchiveName")?,
            reveal_archive_in_organizer: fields.bool_or("revealArchiveInOrganizer", true)?,
            pre_actions: ExecutionAction::decode_list(fields, "preActions")?,
            post_actions: ExecutionAction::decode_list(fields, "postActions")?,
        })
    }
}

/// A named scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scheme {
    /// Scheme name.
    pub name: String,
    /// Build action.
    pub build: BuildAction,
    /// Run action.
    pub run: Option<RunAction>,
    /// Test action.
    pub test: Option<TestAction>,
    /// Profile action.
    pub profile: Option<ProfileAction>,
    /// Analyze action.
    pub analyze: Option<AnalyzeAction>,
    /// Archive action.
    pub archive: Option<ArchiveAction>,
    /// List visibility.
    pub management: Option<Management>,
}

impl Scheme {
    /// Decodes the scheme `name`. The `build` action is required.
    pub fn decode(name: &str, fields: &Fields<'_>) -> ModelResult<Self> {
        let build = fields
            .child("build")?
            .ok_or_else(|| ModelError::MissingField {
                path: fields.field_path("build"),
            })?;

        Ok(Self {
            name: name.to_string(),
            build: BuildAction::decode(&build)?,
            run: fields.child("run")?.map(|f| RunAction::decode(&f)).transpose()?,
            test: fields.child("test")?.map(|f| TestAction::decode(&f)).transpose()?,
            profile: fields
                .child("profile")?
                .map(|f| ProfileAction::decode(&f))
                .transpose()?,
            analyze: fields
                .child("analyze")?
                .map(|f| -> ModelResult<AnalyzeAction> {
                    Ok(AnalyzeAction {
                        config: f.string("config")?,
                    })
                })
                .transpose()?,
            archive: fields
                .child("archive")?
                .map(|f| ArchiveAction::decode(&f))
                .transpose()?,
            management: Management::decode_field(fields)?,
        })
    }
}

/// A scheme generated for a single target, read from the target's `scheme` map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct TargetScheme {
    /// Test targets.
    pub test_targets: Vec<TestTarget>,
    /// Configuration variants a scheme is generated for.
    pub config_variants: Vec<String>,
    /// Collect code coverage.
    pub gather_coverage_data: bool,
    /// Targets coverage is collected for.
    pub coverage_targets: Vec<String>,
    /// StoreKit configuration file.
    pub store_kit_configuration: Option<String>,
    /// Application language.
    pub language: Option<String>,
    /// Application region.
    pub region: Option<String>,
    /// Disable the main thread checker.
    pub disable_main_thread_checker: bool,
    /// Pause on every main thread checker issue.
    pub stop_on_every_main_thread_checker_issue: bool,
    /// Disable the thread performance checker.
    pub disable_thread_performance_checker: bool,
    /// Find implicit dependencies.
    pub build_implicit_dependencies: bool,
    /// Launch arguments and whether each is enabled.
    pub command_line_arguments: IndexMap<String, bool>,
    /// Environment variables.
    pub environment_variables: Vec<EnvironmentVariable>,
    /// Test plans.
    pub test_plans: Vec<TestPlan>,
    /// Scripts run before building.
    pub pre_actions: Vec<ExecutionAction>,
    /// Scripts run after building.
    pub post_actions: Vec<ExecutionAction>,
    /// List visibility.
    pub management: Option<Management>,
}

impl TargetScheme {
    /// Decodes a target's `scheme` map.
    pub fn decode(fields: &Fields<'_>) -> ModelResult<Self> {
        Ok(Self {
            test_targets: TestTarget::decode_list(fields, "testTargets")?,
            config_variants: fields.string_list("configVariants")?,
            gather_coverage_data: fields.bool_or("gatherCoverageData", false)?,
            coverage_targets: fields.string_list("coverageTargets")?,
            store_kit_configuration: fields.string("storeKitConfiguration")?,
            language: fields.string("language")?,
            region: fields.string("region")?,
            disable_main_thread_checker: fields.bool_or("disableMainThreadChecker", false)?,
            stop_on_every_main_thread_checker_issue: fields
                .bool_or("stopOnEveryMainThreadCheckerIssue", false)?,
            disable_thread_performance_checker: fields
                .bool_or("disableThreadPerformanceChecker", false)?,
            build_implicit_dependencies: fields.bool_or("buildImplicitDependencies", true)?,
            command_line_arguments: fields.bool_map("commandLineArguments")?,
            environment_variables: EnvironmentVariable::decode_list(fields)?,
            test_plans: TestPlan::decode_list(fields)?,
            pre_actions: ExecutionAction::decode_list(fields, "preActions")?,
            post_actions: ExecutionAction::decode_list(fields, "postActions")?,
            management: Management::decode_field(fields)?,
        })
    }
}
