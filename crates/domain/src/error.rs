//! Domain error types

use thiserror::Error;

/// Errors raised while decoding a resolved document into the project model.
///
/// Every variant carries the dotted path of the offending node, such as
/// `targets.App.dependencies[2]`, so users can find it in their files.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A required field is absent.
    #[error("{path}: missing required field")]
    MissingField {
        /// Path of the missing field.
        path: String,
    },

    /// A field holds a value of the wrong shape.
    #[error("{path}: expected {expected}, found {found}")]
    InvalidType {
        /// Path of the field.
        path: String,
        /// Expected kind.
        expected: &'static str,
        /// Kind actually found.
        found: &'static str,
    },

    /// The target `type` literal is not a known product type.
    #[error("{path}: unknown target type '{value}'")]
    UnknownTargetType {
        /// Path of the field.
        path: String,
        /// Offending literal.
        value: String,
    },

    /// The platform literal is not known, or the platform is missing.
    #[error("{path}: unknown platform '{value}'")]
    UnknownTargetPlatform {
        /// Path of the field.
        path: String,
        /// Offending literal, empty when the platform is missing.
        value: String,
    },

    /// A target lists several platforms while also declaring supported destinations.
    #[error("{path}: platform cannot be a list when supportedDestinations is set")]
    InvalidTargetPlatformAsArray {
        /// Path of the field.
        path: String,
    },

    /// A map matched none of the marker keys that select its variant.
    #[error("{path}: expected one of {expected}")]
    MissingMarker {
        /// Path of the map.
        path: String,
        /// Accepted marker keys, comma separated.
        expected: String,
    },

    /// A map matched more than one marker key.
    #[error("{path}: only one of {markers} may be set")]
    AmbiguousMarkers {
        /// Path of the map.
        path: String,
        /// Marker keys found, comma separated.
        markers: String,
    },

    /// A dependency carries no recognised kind key.
    #[error("{path}: invalid dependency, keys: {keys}")]
    InvalidDependency {
        /// Path of the dependency.
        path: String,
        /// Keys present on the dependency, comma separated.
        keys: String,
    },

    /// A version string cannot be parsed.
    #[error("{path}: invalid version '{value}'")]
    InvalidVersion {
        /// Path of the field.
        path: String,
        /// Offending text.
        value: String,
    },

    /// A literal is not one of the values accepted for an enumeration.
    #[error("{path}: unknown {kind} '{value}'")]
    UnknownLiteral {
        /// Path of the field.
        path: String,
        /// What the literal names, e.g. `breakpoint type`.
        kind: &'static str,
        /// Offending literal.
        value: String,
    },

    /// The breakpoint `type` literal is not a known breakpoint type.
    #[error("{path}: unknown breakpoint type '{value}'")]
    UnknownBreakpointType {
        /// Path of the field.
        path: String,
        /// Offending literal.
        value: String,
    },

    /// The breakpoint action `type` literal is not a known action type.
    #[error("{path}: unknown breakpoint action type '{value}'")]
    UnknownBreakpointActionType {
        /// Path of the field.
        path: String,
        /// Offending literal.
        value: String,
    },

    /// Settings reference a setting group that does not exist.
    #[error("{path}: unknown setting group '{name}'")]
    UnknownSettingGroup {
        /// Owner of the settings.
        path: String,
        /// Missing group name.
        name: String,
    },

    /// Setting groups reference each other in a loop.
    #[error("{path}: setting group '{name}' includes itself")]
    SettingGroupCycle {
        /// Owner of the settings.
        path: String,
        /// Group closing the loop.
        name: String,
    },
}

impl ModelError {
    /// Path of the node the error refers to.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::MissingField { path }
            | Self::InvalidType { path, .. }
            | Self::UnknownTargetType { path, .. }
            | Self::UnknownTargetPlatform { path, .. }
            | Self::InvalidTargetPlatformAsArray { path }
            | Self::MissingMarker { path, .. }
            | Self::AmbiguousMarkers { path, .. }
            | Self::InvalidDependency { path, .. }
            | Self::InvalidVersion { path, .. }
            | Self::UnknownLiteral { path, .. }
            | Self::UnknownBreakpointType { path, .. }
            | Self::UnknownBreakpointActionType { path, .. }
            | Self::UnknownSettingGroup { path, .. }
            | Self::SettingGroupCycle { path, .. } => path,
        }
    }
}

/// Result type alias for model decoding.
pub type ModelResult<T> = Result<T, ModelError>;
