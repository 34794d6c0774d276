//! Target dependencies.

use serde::Serialize;

use crate::decode::Fields;
use crate::error::{ModelError, ModelResult};
use crate::literal::literal_enum;
use crate::platform::Platform;

/// Keys that select the kind of a dependency. Exactly one must be present.
const KIND_MARKERS: [&str; 5] = ["target", "framework", "sdk", "package", "carthage"];

literal_enum! {
    /// How a Carthage framework is linked.
    pub enum CarthageLinkType {
        /// Dynamic framework.
        Dynamic => "dynamic",
        /// Static framework.
        Static => "static",
    }
}

literal_enum! {
    /// Which destinations a dependency applies to.
    pub enum PlatformFilter {
        /// Every destination.
        All => "all",
        /// iOS only.
        Ios => "iOS",
        /// macOS only.
        MacOs => "macOS",
    }
}

/// What a dependency refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DependencyKind {
    /// Another target in the project, or `Project/Target` in a referenced project.
    Target,
    /// A framework or library file.
    Framework,
    /// A system SDK framework or library.
    Sdk {
        /// Root the SDK path is relative to.
        root: Option<String>,
    },
    /// A Swift package product.
    Package {
        /// Products linked from the package. Empty links the package name itself.
        products: Vec<String>,
    },
    /// A Carthage framework.
    Carthage {
        /// Look up frameworks from the Carthage version file.
        find_frameworks: Option<bool>,
        /// Link type.
        link_type: CarthageLinkType,
    },
}

/// One entry of a target's `dependencies`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct Dependency {
    /// Kind of dependency.
    #[serde(flatten)]
    pub kind: DependencyKind,
    /// Name or path the dependency refers to.
    pub reference: String,
    /// Whether the product is embedded.
    pub embed: Option<bool>,
    /// Whether the embedded product is code signed.
    pub code_sign: Option<bool>,
    /// Whether the product is linked.
    pub link: Option<bool>,
    /// Link weakly.
    pub weak_link: bool,
    /// Strip headers when embedding.
    pub remove_headers: bool,
    /// Copy phase destination override.
    pub copy_destination: Option<String>,
    /// Destination filter.
    pub platform_filter: PlatformFilter,
    /// Platforms the dependency applies to. `None` means all of them.
    pub platforms: Option<Vec<Platform>>,
}

impl Dependency {
    /// A dependency of `kind` on `reference` with default flags.
    #[must_use]
    pub fn new(kind: DependencyKind, reference: impl Into<String>) -> Self {
        Self {
            kind,
            reference: reference.into(),
            embed: None,
            code_sign: None,
            link: None,
            weak_link: false,
            remove_headers: true,
            copy_destination: None,
            platform_filter: PlatformFilter::All,
            platforms: None,
        }
    }

    /// Whether the dependency applies to a target built for `platform`.
    #[must_use]
    pub fn applies_to(&self, platform: Platform) -> bool {
        platform == Platform::Auto
            || self
                .platforms
                .as_ref()
                .is_none_or(|platforms| platforms.contains(&platform))
    }

    /// Decodes one dependency map.
    pub fn decode(fields: &Fields<'_>) -> ModelResult<Self> {
        let marker = fields
            .marker(&KIND_MARKERS)?
            .ok_or_else(|| ModelError::InvalidDependency {
                path: fields.path().to_string(),
                keys: fields.key_list(),
            })?;
        let reference = fields.required_string(marker)?;

        let kind = match marker {
            "target" => DependencyKind::Target,
            "framework" => DependencyKind::Framework,
            "sdk" => DependencyKind::Sdk {
                root: fields.string("root")?,
            },
            "package" => {
                let mut products = fields.string_list("products")?;
                if let Some(product) = fields.string("product")? {
                    products.insert(0, product);
                }
                DependencyKind::Package { products }
            }
            _ => DependencyKind::Carthage {
                find_frameworks: fields.bool("findFrameworks")?,
                link_type: fields
                    .enumeration("linkType", "carthage link type", CarthageLinkType::from_literal)?
                    .unwrap_or(CarthageLinkType::Dynamic),
            },
        };

        let platforms = if fields.contains("platforms") {
            let literals = fields.string_list("platforms")?;
            let parsed = literals
                .into_iter()
                .enumerate()
                .map(|(index, literal)| {
                    Platform::from_literal(&literal).ok_or_else(|| {
                        ModelError::UnknownTargetPlatform {
                            path: fields.item_path("platforms", index),
                            value: literal,
                        }
                    })
                })
                .collect::<ModelResult<Vec<_>>>()?;
            Some(parsed)
        } else {
            None
        };

        Ok(Self {
            kind,
            reference,
            embed: fields.bool("embed")?,
            code_sign: fields.bool("codeSign")?,
            link: fields.bool("link")?,
            weak_link: fields.bool_or("weak", false)?,
            remove_headers: fields.bool_or("removeHeaders", true)?,
            copy_destination: fields
                .child("copy")?
                .map(|copy| copy.string("destination"))
                .transpose()?
                .flatten(),
            platform_filter: fields
                .enumeration("platformFilter", "platform filter", PlatformFilter::from_literal)?
                .unwrap_or(PlatformFilter::All),
            platforms,
        })
    }
}
