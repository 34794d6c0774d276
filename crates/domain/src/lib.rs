//! Blueprint Domain - Document and project model
//!
//! This crate defines the untyped document tree every input file is parsed
//! into, and the typed project model a fully resolved document decodes to.
//! All types here are pure Rust with no I/O dependencies.

pub mod breakpoint;
pub mod decode;
pub mod document;
pub mod error;
mod literal;
pub mod options;
pub mod package;
pub mod path;
pub mod platform;
pub mod project;
pub mod scheme;
pub mod settings;
pub mod target;
pub mod version;

pub use breakpoint::{
    Breakpoint, BreakpointAction, BreakpointActionType, BreakpointKind, BreakpointType,
    ConveyanceType, ExceptionScope, SoundName, StopOnStyle,
};
pub use document::{Document, Value};
pub use error::{ModelError, ModelResult};
pub use options::{FileType, GroupOrdering, GroupSortPosition, Options, SettingPresets, ValidationType};
pub use package::{SwiftPackage, VersionRequirement};
pub use platform::{Platform, ProductType, SupportedDestination};
pub use project::{AggregateTarget, Config, ConfigType, Project, ProjectReference};
pub use scheme::{
    AnalyzeAction, ArchiveAction, BuildAction, BuildTarget, BuildType, EnvironmentVariable,
    ExecutionAction, GpuFrameCaptureMode, Management, ProfileAction, RunAction, Scheme,
    ScreenCaptureFormat, TargetScheme, TestAction, TestPlan, TestTarget,
};
pub use settings::{BuildSettings, Settings};
pub use target::{
    BuildPhase, BuildRule, BuildRuleAction, BuildRuleFileType, BuildScript, BuildToolPlugin,
    CarthageLinkType, Dependency, DependencyKind, HeaderVisibility, Plist, PlatformFilter,
    ScriptSource, SourceType, Target, TargetSource,
};
