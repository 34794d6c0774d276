//! Version parsing helpers.
//!
//! Deployment targets are written loosely (`9`, `10.1`, `10.0`), while package
//! requirements must be full semantic versions.

use semver::Version;

/// Parses a deployment-target style version, padding missing components.
///
/// `"9"` becomes `9.0.0` and `"10.1"` becomes `10.1.0`. Pre-release and build
/// suffixes are kept.
#[must_use]
pub fn parse_lenient(text: &str) -> Option<Version> {
    let text = text.trim();
    let split = text.find(['-', '+']).unwrap_or(text.len());
    let (core, suffix) = text.split_at(split);

    let components: Vec<&str> = core.split('.').collect();
    if components.is_empty()
        || components.len() > 3
        || components
            .iter()
            .any(|c| c.is_empty() || !c.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    let mut padded = components.join(".");
    for _ in components.len()..3 {
        padded.push_str(".0");
    }
    padded.push_str(suffix);
    Version::parse(&padded).ok()
}

/// Parses a strict semantic version such as `1.2.3` or `4.0.0-beta.5`.
#[must_use]
pub fn parse_strict(text: &str) -> Option<Version> {
    Version::parse(text.trim()).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_lenient_pads_components() {
        assert_eq!(parse_lenient("9").unwrap(), Version::new(9, 0, 0));
        assert_eq!(parse_lenient("10.1").unwrap(), Version::new(10, 1, 0));
        assert_eq!(parse_lenient("1.2.3").unwrap(), Version::new(1, 2, 3));
    }

    #[test]
    fn test_parse_lenient_keeps_prerelease() {
        let version = parse_lenient("2.0-beta.1").unwrap();
        assert_eq!(version.to_string(), "2.0.0-beta.1");
    }

    #[test]
    fn test_parse_lenient_rejects_garbage() {
        assert_eq!(parse_lenient("x.1"), None);
        assert_eq!(parse_lenient("1.2.3.4"), None);
        assert_eq!(parse_lenient(""), None);
    }

    #[test]
    fn test_parse_strict() {
        assert_eq!(parse_strict("1.2.2").unwrap(), Version::new(1, 2, 2));
        assert!(parse_strict("4.0.0-beta.5").is_some());
        assert_eq!(parse_strict("1.2.3.1"), None);
        assert_eq!(parse_strict("master"), None);
        assert_eq!(parse_strict("foo-bar"), None);
        assert_eq!(parse_strict("x.1.2"), None);
        assert_eq!(parse_strict("1.2"), None);
    }
}
