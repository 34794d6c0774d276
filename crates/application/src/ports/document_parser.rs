//! Document parsing port.

use std::fmt;
use std::path::Path;

use blueprint_domain::Document;

/// Source format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// YAML, the default.
    Yaml,
    /// JSON.
    Json,
}

impl DocumentFormat {
    /// Picks the format from a file extension. Anything but `.json` is YAML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }

    /// Returns the format name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yaml => "YAML",
            Self::Json => "JSON",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error type for document parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The text is not valid for its format.
    #[error("invalid {format}: {message}")]
    Syntax {
        /// Format being parsed.
        format: DocumentFormat,
        /// Parser message.
        message: String,
    },

    /// The document parsed, but its root is not a map.
    #[error("document root must be a map, found {0}")]
    RootNotMap(&'static str),
}

/// Turns raw bytes into a [`Document`].
pub trait DocumentParser: Send + Sync {
    /// Parses `bytes` written in `format`.
    ///
    /// An empty document parses to an empty map.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid document whose root is a map.
    fn parse(&self, bytes: &[u8], format: DocumentFormat) -> Result<Document, ParseError>;
}

impl<T: DocumentParser + ?Sized> DocumentParser for &T {
    fn parse(&self, bytes: &[u8], format: DocumentFormat) -> Result<Document, ParseError> {
        (**self).parse(bytes, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_from_path() {
        assert_eq!(DocumentFormat::from_path(Path::new("project.yml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("a/b.JSON")), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path(Path::new("noext")), DocumentFormat::Yaml);
    }
}
