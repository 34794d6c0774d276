//! Build settings with per-configuration overrides and setting groups.

use indexmap::IndexMap;
use serde::Serialize;

use crate::decode::Fields;
use crate::document::{Document, Value};
use crate::error::{ModelError, ModelResult};

/// Flat build settings, setting name to value.
pub type BuildSettings = IndexMap<String, Value>;

const GROUPED_KEYS: [&str; 3] = ["base", "configs", "groups"];

/// Settings of a project, target or setting group.
///
/// Groups are stored by name and only expanded by [`Settings::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Settings applied to every configuration.
    pub build_settings: BuildSettings,
    /// Settings applied to configurations with a matching name.
    pub config_settings: IndexMap<String, Settings>,
    /// Setting groups applied before `build_settings`.
    pub groups: Vec<String>,
}

impl Settings {
    /// Settings made of a flat map only.
    #[must_use]
    pub fn new(build_settings: BuildSettings) -> Self {
        Self {
            build_settings,
            config_settings: IndexMap::new(),
            groups: Vec::new(),
        }
    }

    /// Whether nothing at all is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.build_settings.is_empty() && self.config_settings.is_empty() && self.groups.is_empty()
    }

    /// Decodes settings from a map.
    ///
    /// A map carrying any of `base`, `configs` or `groups` is the grouped form.
    /// Anything else is taken as flat build settings.
    pub fn decode(fields: &Fields<'_>) -> ModelResult<Self> {
        if !GROUPED_KEYS.iter().any(|key| fields.map().contains_key(*key)) {
            return Ok(Self::new(fields.map().clone()));
        }

        let build_settings = fields.document("base")?;
        let groups = fields.string_list("groups")?;
        let config_settings = fields
            .named("configs")?
            .into_iter()
            .map(|(name, config)| -> ModelResult<(String, Self)> {
                Ok((name, Self::decode(&config)?))
            })
            .collect::<ModelResult<_>>()?;

        Ok(Self {
            build_settings,
            config_settings,
            groups,
        })
    }

    /// Decodes the optional settings field `key` of `fields`.
    pub fn decode_field(fields: &Fields<'_>, key: &str) -> ModelResult<Self> {
        fields
            .child(key)?
            .map_or_else(|| Ok(Self::default()), |child| Self::decode(&child))
    }

    /// Every group name referenced here, including inside configs.
    #[must_use]
    pub fn group_references(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.groups.iter().map(String::as_str).collect();
        for config in self.config_settings.values() {
            names.extend(config.group_references());
        }
        names
    }

    /// Fails when a referenced group is not in `groups`.
    pub fn validate_groups(&self, owner: &str, groups: &IndexMap<String, Self>) -> ModelResult<()> {
        match self
            .group_references()
            .into_iter()
            .find(|name| !groups.contains_key(*name))
        {
            Some(name) => Err(ModelError::UnknownSettingGroup {
                path: owner.to_string(),
                name: name.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Flattens these settings for the configuration named `config`.
    ///
    /// Groups apply first, in order, then the base settings, then any config
    /// settings whose name matches case-insensitively. Later values win.
    pub fn resolve(
        &self,
        owner: &str,
        config: &str,
        groups: &IndexMap<String, Self>,
    ) -> ModelResult<BuildSettings> {
        let mut resolved = BuildSettings::new();
        let mut stack = Vec::new();
        self.resolve_into(owner, config, groups, &mut stack, &mut resolved)?;
        Ok(resolved)
    }

    fn resolve_into<'a>(
        &'a self,
        owner: &str,
        config: &str,
        groups: &'a IndexMap<String, Self>,
        stack: &mut Vec<&'a str>,
        resolved: &mut BuildSettings,
    ) -> ModelResult<()> {
        for name in &self.groups {
            if stack.contains(&name.as_str()) {
                return Err(ModelError::SettingGroupCycle {
                    path: owner.to_string(),
                    name: name.clone(),
                });
            }
            let group = groups
                .get(name)
                .ok_or_else(|| ModelError::UnknownSettingGroup {
                    path: owner.to_string(),
                    name: name.clone(),
                })?;
            stack.push(name);
            group.resolve_into(owner, config, groups, stack, resolved)?;
            stack.pop();
        }

        resolved.extend(
            self.build_settings
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );

        for (name, settings) in &self.config_settings {
            if name.eq_ignore_ascii_case(config) {
                settings.resolve_into(owner, config, groups, stack, resolved)?;
            }
        }
        Ok(())
    }
}

impl From<Document> for Settings {
    fn from(build_settings: Document) -> Self {
        Self::new(build_settings)
    }
}
