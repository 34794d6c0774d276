//! Platforms, destinations and product types.

use crate::literal::literal_enum;

literal_enum! {
    /// Platform a target is built for.
    pub enum Platform {
        /// iOS and iPadOS.
        Ios => "iOS",
        /// tvOS.
        TvOs => "tvOS",
        /// macOS.
        MacOs => "macOS",
        /// watchOS.
        WatchOs => "watchOS",
        /// visionOS.
        VisionOs => "visionOS",
        /// Chosen from the supported destinations.
        Auto => "auto",
    }
}

literal_enum! {
    /// Destination a multi-destination target can run on.
    pub enum SupportedDestination {
        /// iOS.
        Ios => "iOS",
        /// tvOS.
        TvOs => "tvOS",
        /// macOS.
        MacOs => "macOS",
        /// Mac Catalyst, which implies iOS.
        MacCatalyst => "macCatalyst",
        /// visionOS.
        VisionOs => "visionOS",
        /// watchOS.
        WatchOs => "watchOS",
    }
}

literal_enum! {
    /// Kind of product a target builds.
    pub enum ProductType {
        /// Application bundle.
        Application => "application",
        /// Dynamic framework.
        Framework => "framework",
        /// Static framework.
        StaticFramework => "framework.static",
        /// XCFramework.
        XcFramework => "xcframework",
        /// Dynamic library.
        DynamicLibrary => "library.dynamic",
        /// Static library.
        StaticLibrary => "library.static",
        /// Plain bundle.
        Bundle => "bundle",
        /// Unit test bundle.
        UnitTestBundle => "bundle.unit-test",
        /// UI test bundle.
        UiTestBundle => "bundle.ui-testing",
        /// App extension.
        AppExtension => "app-extension",
        /// ExtensionKit extension.
        ExtensionKitExtension => "extensionkit-extension",
        /// Command line tool.
        CommandLineTool => "tool",
        /// Legacy watch app.
        WatchApp => "application.watchapp",
        /// watchOS 2 app.
        Watch2App => "application.watchapp2",
        /// watchOS 2 app container.
        Watch2AppContainer => "application.watchapp2-container",
        /// Legacy WatchKit extension.
        WatchExtension => "watchkit-extension",
        /// watchOS 2 WatchKit extension.
        Watch2Extension => "watchkit2-extension",
        /// tvOS app extension.
        TvExtension => "tv-app-extension",
        /// Messages application.
        MessagesApplication => "application.messages",
        /// Messages extension.
        MessagesExtension => "app-extension.messages",
        /// Sticker pack.
        StickerPack => "app-extension.messages-sticker-pack",
        /// XPC service.
        XpcService => "xpc-service",
        /// OCUnit test bundle.
        OcUnitTestBundle => "octest",
        /// Xcode source editor extension.
        XcodeExtension => "xcode-extension",
        /// Instruments package.
        InstrumentsPackage => "instruments-package",
        /// Intents service extension.
        IntentsServiceExtension => "app-extension.intents-service",
        /// App clip.
        OnDemandInstallCapableApplication => "application.on-demand-install-capable",
        /// Metal library.
        MetalLibrary => "metal-library",
        /// Driver extension.
        DriverExtension => "driver-extension",
        /// System extension.
        SystemExtension => "system-extension",
    }
}

impl ProductType {
    /// Whether the product is a test bundle.
    #[must_use]
    pub const fn is_test(self) -> bool {
        matches!(
            self,
            Self::UnitTestBundle | Self::UiTestBundle | Self::OcUnitTestBundle
        )
    }

    /// Whether the product is an application of some kind.
    #[must_use]
    pub const fn is_app(self) -> bool {
        matches!(
            self,
            Self::Application
                | Self::WatchApp
                | Self::Watch2App
                | Self::Watch2AppContainer
                | Self::MessagesApplication
                | Self::OnDemandInstallCapableApplication
        )
    }
}

impl SupportedDestination {
    /// Adds destinations implied by others: Mac Catalyst requires iOS.
    #[must_use]
    pub fn with_implied(mut destinations: Vec<Self>) -> Vec<Self> {
        if destinations.contains(&Self::MacCatalyst) && !destinations.contains(&Self::Ios) {
            destinations.push(Self::Ios);
        }
        destinations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_platform_literals() {
        for platform in Platform::ALL {
            assert_eq!(Platform::from_literal(platform.as_str()), Some(*platform));
        }
        assert_eq!(Platform::from_literal("ios"), None);
        assert_eq!(Platform::Ios.to_string(), "iOS");
    }

    #[test]
    fn test_product_type_literals() {
        assert_eq!(
            ProductType::from_literal("bundle.unit-test"),
            Some(ProductType::UnitTestBundle)
        );
        assert_eq!(ProductType::from_literal("invalid"), None);
        assert!(ProductType::UiTestBundle.is_test());
        assert!(ProductType::Application.is_app());
        assert!(!ProductType::Framework.is_app());
    }

    #[test]
    fn test_mac_catalyst_implies_ios() {
        let destinations = SupportedDestination::with_implied(vec![
            SupportedDestination::MacCatalyst,
            SupportedDestination::TvOs,
        ]);
        assert_eq!(
            destinations,
            vec![
                SupportedDestination::MacCatalyst,
                SupportedDestination::TvOs,
                SupportedDestination::Ios
            ]
        );
    }
}
