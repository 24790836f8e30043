//! Variable parser for `$name` and `${name}` syntax
//!
//! Parses strings to extract variable references with their positions.

use std::ops::Range;

/// Represents a parsed variable reference in a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableReference {
    /// The variable name (without `$`, `{` or `}`).
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

/// Characters allowed in a bare `$name` reference.
const fn is_bare_name_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Characters allowed between the braces of a `${name}` reference.
const fn is_braced_name_char(byte: u8) -> bool {
    is_bare_name_char(byte) || byte == b'.'
}

/// Parses a string and extracts all variable references.
///
/// Supports:
/// - `$name` - name made of ASCII letters, digits and `_`
/// - `${name}` - same, and `.` is also allowed
///
/// A `$` that does not start a well-formed reference is plain text.
///
/// # Examples
///
/// ```
/// use globenv_application::variable_resolver::parser::parse_variables;
///
/// let refs = parse_variables("$HOME/bin:${java.home}/bin");
/// assert_eq!(refs.len(), 2);
/// assert_eq!(refs[0].name, "HOME");
/// assert_eq!(refs[1].name, "java.home");
/// assert_eq!(refs[1].span, 10..22);
/// ```
#[must_use]
pub fn parse_variables(input: &str) -> Vec<VariableReference> {
    let bytes = input.as_bytes();
    let mut references = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }

        let start = i;
        let name_start = start + 1;

        if bytes.get(name_start) == Some(&b'{') {
            let inner_start = name_start + 1;
            let inner_len = bytes[inner_start..]
                .iter()
                .take_while(|b| is_braced_name_char(**b))
                .count();
            let close = inner_start + inner_len;
            if inner_len > 0 && bytes.get(close) == Some(&b'}') {
                let end = close + 1;
                references.push(VariableReference::new(
                    &input[inner_start..close],
                    start..end,
                ));
                i = end;
                continue;
            }
        } else {
            let len = bytes[name_start..]
                .iter()
                .take_while(|b| is_bare_name_char(**b))
                .count();
            if len > 0 {
                let end = name_start + len;
                references.push(VariableReference::new(
                    &input[name_start..end],
                    start..end,
                ));
                i = end;
                continue;
            }
        }

        i += 1;
    }

    references
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(input: &str) -> Vec<String> {
        parse_variables(input).into_iter().map(|r| r.name).collect()
    }

    #[test]
    fn test_parse_bare_variable() {
        let refs = parse_variables("$name");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "name");
        assert_eq!(refs[0].span, 0..5);
    }

    #[test]
    fn test_parse_braced_variable() {
        let refs = parse_variables("${name}");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "name");
        assert_eq!(refs[0].span, 0..7);
    }

    #[test]
    fn test_bare_name_stops_at_separator() {
        let refs = parse_variables("$param1/val2");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "param1");
        assert_eq!(refs[0].span, 0..7);
    }

    #[test]
    fn test_bare_name_does_not_include_dot_or_hyphen() {
        assert_eq!(names("$a.b"), vec!["a"]);
        assert_eq!(names("$a-2"), vec!["a"]);
    }

    #[test]
    fn test_braced_name_allows_dot() {
        assert_eq!(names("${user.home}/x"), vec!["user.home"]);
    }

    #[test]
    fn test_parse_multiple_variables() {
        let refs = parse_variables("$globalVar/$param2/val1");
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].name, "globalVar");
        assert_eq!(refs[1].name, "param2");
    }

    #[test]
    fn test_adjacent_variables() {
        let names = names("$a${b}$c");
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_lone_dollar_is_text() {
        assert!(parse_variables("$").is_empty());
        assert!(parse_variables("cost: $ 5").is_empty());
        assert!(parse_variables("a$/b").is_empty());
    }

    #[test]
    fn test_malformed_braces_are_text() {
        assert!(parse_variables("${}").is_empty());
        assert!(parse_variables("${name").is_empty());
        assert!(parse_variables("${a b}").is_empty());
    }

    #[test]
    fn test_double_dollar_takes_second_as_reference() {
        let refs = parse_variables("$$name");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "name");
        assert_eq!(refs[0].span, 1..6);
    }

    #[test]
    fn test_non_ascii_text_around_reference() {
        let input = "héllo $wörld";
        let refs = parse_variables(input);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "w");
        assert_eq!(&input[refs[0].span.clone()], "$w");
    }

    #[test]
    fn test_no_variables() {
        assert!(parse_variables("Hello, World!").is_empty());
    }

    #[test]
    fn test_span_positions() {
        let input = "Hello ${name}, welcome!";
        let refs = parse_variables(input);
        assert_eq!(refs.len(), 1);
        assert_eq!(&input[refs[0].span.clone()], "${name}");
    }
}
