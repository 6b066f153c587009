//! Character predicates used by the directive state machine.
//!
//! These are deliberately narrower than the `char` methods in std: names are
//! ASCII-only, and line breaks are not whitespace.

/// Returns true for `\n` and `\r`.
pub fn is_newline(c: char) -> bool {
    matches!(c, '\n' | '\r')
}

/// Returns true for space and tab. Line breaks are not whitespace here.
pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t')
}

/// Returns true only for ASCII `0-9`, `A-Z` and `a-z`.
pub fn is_alphanumeric(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// Returns true for the two quote characters that can open a string value.
pub fn is_quote(c: char) -> bool {
    matches!(c, '\'' | '"')
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case('\n', true)]
    #[case('\r', true)]
    #[case(' ', false)]
    #[case('\t', false)]
    #[case('a', false)]
    fn newline_detection(#[case] c: char, #[case] expected: bool) {
        assert_eq!(is_newline(c), expected);
    }

    #[rstest]
    #[case(' ', true)]
    #[case('\t', true)]
    #[case('\n', false)]
    #[case('\r', false)]
    #[case('\u{a0}', false)]
    fn whitespace_excludes_newlines(#[case] c: char, #[case] expected: bool) {
        assert_eq!(is_whitespace(c), expected);
    }

    #[rstest]
    #[case('a', true)]
    #[case('Z', true)]
    #[case('7', true)]
    #[case('_', false)]
    #[case('-', false)]
    #[case('é', false)]
    #[case('ß', false)]
    #[case('٣', false)]
    #[case('日', false)]
    #[case('🙂', false)]
    fn alphanumeric_is_ascii_only(#[case] c: char, #[case] expected: bool) {
        assert_eq!(is_alphanumeric(c), expected);
    }

    #[test]
    fn quotes() {
        assert!(is_quote('\''));
        assert!(is_quote('"'));
        assert!(!is_quote('`'));
    }
}
