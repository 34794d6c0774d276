//! Swift package references.

use semver::Version;
use serde::Serialize;

use crate::decode::Fields;
use crate::error::{ModelError, ModelResult};

const REQUIREMENT_MARKERS: [&str; 8] = [
    "exactVersion",
    "version",
    "majorVersion",
    "from",
    "minorVersion",
    "minVersion",
    "branch",
    "revision",
];

/// Version requirement of a remote package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum VersionRequirement {
    /// Any version below the next major release.
    UpToNextMajorVersion {
        /// Lowest allowed version.
        version: Version,
    },
    /// Any version below the next minor release.
    UpToNextMinorVersion {
        /// Lowest allowed version.
        version: Version,
    },
    /// Exactly this version.
    Exact {
        /// Required version.
        version: Version,
    },
    /// A half-open version range.
    Range {
        /// Lowest allowed version.
        from: Version,
        /// First version not allowed.
        to: Version,
    },
    /// A branch name.
    Branch {
        /// Branch name.
        name: String,
    },
    /// A commit revision.
    Revision {
        /// Commit hash.
        revision: String,
    },
}

impl VersionRequirement {
    fn decode(fields: &Fields<'_>) -> ModelResult<Self> {
        let required = |key: &str| -> ModelResult<Version> {
            fields
                .strict_version(key)?
                .ok_or_else(|| ModelError::MissingField {
                    path: fields.field_path(key),
                })
        };

        let marker = if !fields.contains("minVersion") && fields.contains("maxVersion") {
            "minVersion"
        } else {
            fields.required_marker(&REQUIREMENT_MARKERS)?
        };

        Ok(match marker {
            "exactVersion" | "version" => Self::Exact {
                version: required(marker)?,
            },
            "majorVersion" | "from" => Self::UpToNextMajorVersion {
                version: required(marker)?,
            },
            "minorVersion" => Self::UpToNextMinorVersion {
                version: required(marker)?,
            },
            "minVersion" => Self::Range {
                from: required("minVersion")?,
                to: required("maxVersion")?,
            },
            "branch" => Self::Branch {
                name: fields.required_string("branch")?,
            },
            _ => Self::Revision {
                revision: fields.required_string("revision")?,
            },
        })
    }
}

/// A Swift package used by the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SwiftPackage {
    /// A package fetched from a repository.
    Remote {
        /// Repository URL.
        url: String,
        /// Version requirement.
        requirement: VersionRequirement,
    },
    /// A package on disk.
    Local {
        /// Package folder.
        path: String,
        /// Group the package is placed in.
        group: Option<String>,
        /// Keep the package out of the project navigator.
        exclude_from_project: bool,
    },
}

impl SwiftPackage {
    /// A local package at `path`.
    #[must_use]
    pub fn local(path: impl Into<String>) -> Self {
        Self::Local {
            path: path.into(),
            group: None,
            exclude_from_project: false,
        }
    }

    /// Decodes a package. Exactly one of `path`, `url` or `github` must be set.
    ///
    /// `github: owner/repo` expands to the repository's https URL.
    pub fn decode(fields: &Fields<'_>) -> ModelResult<Self> {
        match fields.required_marker(&["path", "url", "github"])? {
            "path" => Ok(Self::Local {
                path: fields.required_string("path")?,
                group: fields.string("group")?,
                exclude_from_project: fields.bool_or("excludeFromProject", false)?,
            }),
            marker => {
                let location = fields.required_string(marker)?;
                let url = if marker == "github" {
                    format!("https://github.com/{location}")
                } else {
                    location
                };
                Ok(Self::Remote {
                    url,
                    requirement: VersionRequirement::decode(fields)?,
                })
            }
        }
    }
}
