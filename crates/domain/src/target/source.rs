//! Source entries of a target.

use serde::Serialize;

use crate::decode::Fields;
use crate::document::Value;
use crate::error::{ModelError, ModelResult};
use crate::literal::literal_enum;
use crate::options::compiler_flags;

literal_enum! {
    /// Build phase a file is added to.
    pub enum BuildPhase {
        /// Compile sources.
        Sources => "sources",
        /// Headers.
        Headers => "headers",
        /// Copy bundle resources.
        Resources => "resources",
        /// Link with frameworks.
        Frameworks => "frameworks",
        /// Not added to any phase.
        None => "none",
    }
}

literal_enum! {
    /// How a source path is represented in the project.
    pub enum SourceType {
        /// A single file.
        File => "file",
        /// A group mirroring the folder.
        Group => "group",
        /// A folder reference.
        Folder => "folder",
        /// A synchronized folder.
        SyncedFolder => "syncedFolder",
    }
}

literal_enum! {
    /// Visibility of headers in the headers phase.
    pub enum HeaderVisibility {
        /// Public headers.
        Public => "public",
        /// Private headers.
        Private => "private",
        /// Project headers.
        Project => "project",
    }
}

/// One entry of a target's `sources`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSource {
    /// Path to the file or folder.
    pub path: String,
    /// Display name.
    pub name: Option<String>,
    /// Group the source is placed in.
    pub group: Option<String>,
    /// Per-file compiler flags.
    pub compiler_flags: Vec<String>,
    /// Glob patterns excluded from the source.
    pub excludes: Vec<String>,
    /// Glob patterns included from the source.
    pub includes: Vec<String>,
    /// Representation in the project.
    #[serde(rename = "type")]
    pub source_type: Option<SourceType>,
    /// Whether a missing path is tolerated.
    pub optional: bool,
    /// Build phase override.
    pub build_phase: Option<BuildPhase>,
    /// Header visibility.
    pub header_visibility: Option<HeaderVisibility>,
    /// On-demand resource tags.
    pub resource_tags: Vec<String>,
    /// Build file attributes.
    pub attributes: Vec<String>,
    /// Create intermediate groups for this source.
    pub create_intermediate_groups: Option<bool>,
}

impl TargetSource {
    /// A source with only a path, as written in the string shorthand.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            group: None,
            compiler_flags: Vec::new(),
            excludes: Vec::new(),
            includes: Vec::new(),
            source_type: None,
            optional: false,
            build_phase: None,
            header_visibility: None,
            resource_tags: Vec::new(),
            attributes: Vec::new(),
            create_intermediate_groups: None,
        }
    }

    /// Decodes one source: a path string or a map with `path`.
    pub fn decode(value: &Value, path: String) -> ModelResult<Self> {
        if let Some(text) = value.scalar_text().filter(|_| !matches!(value, Value::Bool(_))) {
            return Ok(Self::new(text));
        }
        let fields = Fields::from_value(value, path)?;
        Ok(Self {
            path: fields.required_string("path")?,
            name: fields.string("name")?,
            group: fields.string("group")?,
            compiler_flags: compiler_flags(&fields)?,
            excludes: fields.string_list("excludes")?,
            includes: fields.string_list("includes")?,
            source_type: fields.enumeration("type", "source type", SourceType::from_literal)?,
            optional: fields.bool_or("optional", false)?,
            build_phase: fields.enumeration("buildPhase", "build phase", BuildPhase::from_literal)?,
            header_visibility: fields.enumeration(
                "headerVisibility",
                "header visibility",
                HeaderVisibility::from_literal,
            )?,
            resource_tags: fields.string_list("resourceTags")?,
            attributes: fields.string_list("attributes")?,
            create_intermediate_groups: fields.bool("createIntermediateGroups")?,
        })
    }

    /// Decodes a target's `sources` field: a single path or a list of entries.
    pub fn decode_list(fields: &Fields<'_>) -> ModelResult<Vec<Self>> {
        match fields.get("sources") {
            None => Ok(Vec::new()),
            Some(Value::Sequence(items)) => items
                .iter()
                .enumerate()
                .map(|(index, item)| Self::decode(item, fields.item_path("sources", index)))
                .collect(),
            Some(Value::String(path)) => Ok(vec![Self::new(path.clone())]),
            Some(other) => Err(ModelError::InvalidType {
                path: fields.field_path("sources"),
                expected: "sequence",
                found: other.kind(),
            }),
        }
    }
}

impl From<&str> for TargetSource {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}
