//! Variable name syntax.

use std::sync::LazyLock;

use regex::Regex;

/// Pattern every variable name must match in full.
pub const VARIABLE_NAME_PATTERN: &str = "[A-Za-z_][A-Za-z0-9_]*";

#[allow(clippy::expect_used)]
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{VARIABLE_NAME_PATTERN}$")).expect("variable name pattern is valid")
});

/// Returns true if `name` is a valid variable name.
///
/// Names start with an ASCII letter or underscore followed by ASCII
/// letters, digits or underscores. In particular they never contain
/// `?` or `#`, so a `${name}` placeholder cannot split a URL's query
/// or fragment.
#[must_use]
pub fn is_valid_variable_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(is_valid_variable_name("_abc123"));
        assert!(is_valid_variable_name("API_URL"));
        assert!(is_valid_variable_name("a"));
    }

    #[test]
    fn test_invalid_names() {
        assert!(!is_valid_variable_name("1abc"));
        assert!(!is_valid_variable_name(""));
        assert!(!is_valid_variable_name("with-dash"));
        assert!(!is_valid_variable_name("query?x"));
        assert!(!is_valid_variable_name("frag#x"));
        assert!(!is_valid_variable_name("has space"));
        assert!(!is_valid_variable_name("ünicode"));
    }
}
