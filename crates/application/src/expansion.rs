//! Platform fan-out
//!
//! A target whose `platform` is a list becomes one target per platform. Each
//! copy is renamed, pinned to its platform and has `${platform}` substituted.

use blueprint_domain::{Document, Value};
use tracing::debug;

use crate::error::{LoadError, LoadResult};
use crate::variable_resolver::{VariableResolver, VariableScope};

const PLATFORM: &str = "platform";
const PLATFORM_PREFIX: &str = "platformPrefix";
const PLATFORM_SUFFIX: &str = "platformSuffix";
const SUPPORTED_DESTINATIONS: &str = "supportedDestinations";
const DEPLOYMENT_TARGET: &str = "deploymentTarget";
const PRODUCT_NAME: &str = "productName";
const SETTINGS: &str = "settings";
const PRODUCT_NAME_SETTING: &str = "PRODUCT_NAME";

/// Whether `node` fans out: its platform is a list and it declares no
/// supported destinations.
#[must_use]
pub fn is_multi_platform(node: &Document) -> bool {
    matches!(node.get(PLATFORM), Some(Value::Sequence(_)))
        && !node.contains_key(SUPPORTED_DESTINATIONS)
}

/// Expands one named node into its concrete copies.
///
/// Nodes that do not fan out come back unchanged, as the only entry.
#[must_use]
pub fn expand_node(name: &str, node: Document) -> Vec<(String, Document)> {
    if !is_multi_platform(&node) {
        return vec![(name.to_string(), node)];
    }

    let platforms: Vec<String> = node
        .get(PLATFORM)
        .and_then(Value::as_sequence)
        .unwrap_or_default()
        .iter()
        .filter_map(Value::scalar_text)
        .collect();
    debug!(target_name = name, platforms = ?platforms, "Expanding target per platform");

    platforms
        .iter()
        .map(|platform| platform_copy(name, &node, platform))
        .collect()
}

/// Expands every node of a named map, keeping declaration order.
///
/// # Errors
///
/// Fails with [`LoadError::TargetNameCollision`] when a copy is named like a
/// declared target or another copy.
pub fn expand_nodes(nodes: Document) -> LoadResult<Document> {
    let mut expanded = Document::new();
    for (name, value) in &nodes {
        let Value::Map(node) = value else {
            expanded.insert(name.clone(), value.clone());
            continue;
        };
        if !is_multi_platform(node) {
            expanded.insert(name.clone(), value.clone());
            continue;
        }
        for (copy_name, copy) in expand_node(name, node.clone()) {
            let declared = copy_name != *name && nodes.contains_key(&copy_name);
            if declared || expanded.contains_key(&copy_name) {
                return Err(LoadError::TargetNameCollision {
                    name: copy_name,
                    node: name.clone(),
                });
            }
            expanded.insert(copy_name, Value::Map(copy));
        }
    }
    Ok(expanded)
}

fn platform_copy(name: &str, node: &Document, platform: &str) -> (String, Document) {
    let mut copy = node.clone();
    copy.insert(PLATFORM.to_string(), Value::from(platform));

    let prefix = copy
        .shift_remove(PLATFORM_PREFIX)
        .and_then(|value| value.scalar_text())
        .unwrap_or_default();
    let suffix = copy
        .shift_remove(PLATFORM_SUFFIX)
        .and_then(|value| value.scalar_text())
        .unwrap_or_else(|| format!("_{platform}"));

    if let Some(Value::Map(targets)) = copy.get(DEPLOYMENT_TARGET) {
        match targets.get(platform).cloned() {
            Some(version) => {
                copy.insert(DEPLOYMENT_TARGET.to_string(), version);
            }
            None => {
                copy.shift_remove(DEPLOYMENT_TARGET);
            }
        }
    }

    if !copy.contains_key(PRODUCT_NAME) {
        copy.insert(PRODUCT_NAME.to_string(), Value::from(name));
    }
    default_product_name_setting(&mut copy, name);

    let resolver = VariableResolver::new(VariableScope::new().with_context(PLATFORM, platform));
    let copy_name = resolver.substitute(&format!("{prefix}{name}{suffix}"));
    (copy_name, resolver.substitute_document(copy))
}

/// Sets `PRODUCT_NAME` unless the settings already do, in `settings.base`
/// when the settings are grouped.
fn default_product_name_setting(node: &mut Document, name: &str) {
    let settings = node
        .entry(SETTINGS.to_string())
        .or_insert_with(|| Value::Map(Document::new()));
    let Value::Map(settings) = settings else {
        return;
    };

    let grouped = ["base", "configs", "groups"]
        .iter()
        .any(|key| settings.contains_key(*key));
    let target = if grouped {
        let base = settings
            .entry("base".to_string())
            .or_insert_with(|| Value::Map(Document::new()));
        match base {
            Value::Map(base) => base,
            _ => return,
        }
    } else {
        settings
    };

    target
        .entry(PRODUCT_NAME_SETTING.to_string())
        .or_insert_with(|| Value::from(name));
}
