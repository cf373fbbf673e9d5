//! Variable parser for `${variable}` syntax
//!
//! Parses strings to extract variable references with their positions.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use reqx_domain::variable::VARIABLE_NAME_PATTERN;

#[allow(clippy::expect_used)]
static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\$\{{({VARIABLE_NAME_PATTERN})\}}"))
        .expect("variable reference pattern is valid")
});

/// Represents a parsed variable reference in a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableReference {
    /// The variable name (without `${ }`).
    pub name: String,

    /// Byte range in the original string where this reference appears.
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

/// Parses a string and extracts all variable references, in order.
///
/// Only well-formed names are recognised: `${1abc}` or `${a-b}` are plain
/// text and never reported.
///
/// # Examples
///
/// ```
/// use reqx_application::variable_resolver::parser::parse_variables;
///
/// let refs = parse_variables("${base}/users/${id}");
/// assert_eq!(refs.len(), 2);
/// assert_eq!(refs[0].name, "base");
/// assert_eq!(refs[1].span, 14..19);
/// ```
#[must_use]
pub fn parse_variables(input: &str) -> Vec<VariableReference> {
    REFERENCE_RE
        .captures_iter(input)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?;
            Some(VariableReference::new(name.as_str(), whole.range()))
        })
        .collect()
}

/// Returns true if `name` is a valid variable name.
#[must_use]
pub fn validate_variable_name(name: &str) -> bool {
    reqx_domain::is_valid_variable_name(name)
}

/// Returns true if the input contains at least one variable reference.
#[must_use]
pub fn has_variables(input: &str) -> bool {
    input.contains("${") && REFERENCE_RE.is_match(input)
}

/// Extracts just the variable names from the input, duplicates included.
#[must_use]
pub fn extract_variable_names(input: &str) -> Vec<String> {
    parse_variables(input).into_iter().map(|r| r.name).collect()
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
    fn test_parse_multiple_variables() {
        let refs = parse_variables("${scheme}://${host}:${port}");
        assert_eq!(
            refs.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            vec!["scheme", "host", "port"]
        );
    }

    #[test]
    fn test_parse_ignores_invalid_names() {
        assert!(parse_variables("${1abc}").is_empty());
        assert!(parse_variables("${a-b}").is_empty());
        assert!(parse_variables("${}").is_empty());
        assert!(parse_variables("${ spaced }").is_empty());
    }

    #[test]
    fn test_parse_unclosed_reference() {
        assert!(parse_variables("${host").is_empty());
        assert_eq!(parse_variables("${host ${port}").len(), 1);
    }

    #[test]
    fn test_parse_other_brace_syntax_is_text() {
        assert!(parse_variables("{{host}} and {host}").is_empty());
    }

    #[test]
    fn test_span_with_multibyte_prefix() {
        let input = "ñ/${id}";
        let refs = parse_variables(input);
        assert_eq!(&input[refs[0].span.clone()], "${id}");
    }

    #[test]
    fn test_validate_variable_name() {
        assert!(!validate_variable_name("1abc"));
        assert!(validate_variable_name("_abc123"));
        assert!(validate_variable_name("API_URL"));
        assert!(!validate_variable_name("a?b"));
        assert!(!validate_variable_name("a#b"));
        assert!(!validate_variable_name(""));
    }

    #[test]
    fn test_has_variables() {
        assert!(has_variables("x ${y}"));
        assert!(!has_variables("x ${"));
        assert!(!has_variables("plain"));
    }

    #[test]
    fn test_extract_variable_names_keeps_duplicates() {
        assert_eq!(extract_variable_names("${a}${b}${a}"), vec!["a", "b", "a"]);
    }
}
