//! Variable parser for `${variable}` syntax
//!
//! Parses strings to extract placeholder references with their positions.

use std::ops::Range;

/// A parsed placeholder in a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableReference {
    /// The variable name, without `${` and `}`.
    pub name: String,

    /// Byte range of the whole placeholder in the original string.
    pub span: Range<usize>,
}

impl VariableReference {
    /// Creates a new variable reference.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// Parses a string and extracts all `${name}` references, in order.
///
/// Text that looks like a placeholder but has an invalid name, or no closing
/// brace, is ignored.
///
/// # Examples
///
/// ```
/// use blueprint_application::variable_resolver::parser::parse_variables;
///
/// let refs = parse_variables("Sources/${target_name}/${platform}");
/// assert_eq!(refs.len(), 2);
/// assert_eq!(refs[0].name, "target_name");
/// assert_eq!(refs[1].span, 23..34);
/// ```
#[must_use]
pub fn parse_variables(input: &str) -> Vec<VariableReference> {
    let bytes = input.as_bytes();
    let mut references = Vec::new();
    let mut index = 0;

    while index + 1 < bytes.len() {
        if bytes[index] == b'$' && bytes[index + 1] == b'{' {
            let name_start = index + 2;
            if let Some(length) = input[name_start..].find('}') {
                let name_end = name_start + length;
                let name = &input[name_start..name_end];
                if is_valid_variable_name(name) {
                    references.push(VariableReference::new(name, index..name_end + 1));
                    index = name_end + 1;
                    continue;
                }
            }
        }
        index += 1;
    }

    references
}

/// Validates a variable name.
///
/// Valid names are non-empty and made of ASCII letters, digits, `_`, `-` and `.`.
#[must_use]
pub fn is_valid_variable_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_simple_variable() {
        let refs = parse_variables("${name}");
        assert_eq!(refs, vec![VariableReference::new("name", 0..7)]);
    }

    #[test]
    fn test_parse_embedded_variables() {
        let refs = parse_variables("a${x}b${y_2}c");
        assert_eq!(
            refs,
            vec![
                VariableReference::new("x", 1..5),
                VariableReference::new("y_2", 6..12)
            ]
        );
    }

    #[test]
    fn test_ignores_malformed_placeholders() {
        assert!(parse_variables("${}").is_empty());
        assert!(parse_variables("${unclosed").is_empty());
        assert!(parse_variables("${has space}").is_empty());
        assert!(parse_variables("$target_name").is_empty());
        assert!(parse_variables("$(SRCROOT)").is_empty());
    }

    #[test]
    fn test_recovers_after_invalid_name() {
        let refs = parse_variables("${a b}${ok}");
        assert_eq!(refs, vec![VariableReference::new("ok", 6..11)]);
    }

    #[test]
    fn test_multibyte_text() {
        let refs = parse_variables("é${name}ü");
        assert_eq!(refs[0].span, 2..9);
    }
}
