//! Literal typing for property values: numbers, `null` and quoted strings.
//!
//! The state machine grows unquoted values one character at a time, so the
//! number rules here work on prefixes as well as complete values.

use std::str::FromStr;

use thiserror::Error;

use crate::models::PropertyValue;
use crate::parsing::classify::is_quote;

/// The null literal.
pub const NULL: &str = "null";

/// Separator between the whole and fractional digits of a number.
pub const DECIMAL_POINT: char = '.';

const MINUS: char = '-';
const BACKSLASH: char = '\\';

/// Errors from parsing a caller-supplied literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    #[error("empty value")]
    Empty,

    #[error("unterminated quoted value: {0}")]
    UnterminatedQuote(String),
}

/// Parses a complete decimal number. Exponents, `inf` and `NaN` are rejected.
pub fn parse_number(s: &str) -> Option<f64> {
    let number_char = |c: char| c.is_ascii_digit() || c == MINUS || c == DECIMAL_POINT;
    if s.is_empty() || !s.chars().all(number_char) {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Whether appending `c` to an unquoted `buffer` still reads as the start of
/// a number or of `null`.
///
/// `buffer` must itself be a prefix accepted by this function, and
/// `decimal_point` tells whether it already holds a `.`. Only `c` is
/// inspected, so growing a value costs constant time per character. Whether
/// the digits fit in an `f64` is left to [`parse_bare`].
pub fn extends_literal(buffer: &[char], decimal_point: bool, c: char) -> bool {
    let null_prefix = match buffer.first() {
        Some(&first) => NULL.starts_with(first),
        None => NULL.starts_with(c),
    };
    if null_prefix {
        return NULL.chars().nth(buffer.len()) == Some(c);
    }
    match c {
        MINUS => buffer.is_empty(),
        DECIMAL_POINT => !decimal_point,
        _ => c.is_ascii_digit(),
    }
}

/// Types a complete unquoted value, or `None` if it is neither a number nor
/// `null`.
pub fn parse_bare(buffer: &[char]) -> Option<PropertyValue> {
    let s: String = buffer.iter().collect();
    if s == NULL {
        return Some(PropertyValue::Null);
    }
    parse_number(&s).map(PropertyValue::Number)
}

/// Number of backslashes at the end of `buffer`.
pub fn trailing_backslashes(buffer: &[char]) -> usize {
    buffer.iter().rev().take_while(|&&c| c == BACKSLASH).count()
}

/// Removes the backslash escaping `quote` inside a quoted value.
///
/// Only an odd run of backslashes escapes the quote, and only the last
/// backslash of the run is dropped. Every other backslash is kept as written.
pub fn unescape(content: &[char], quote: char) -> String {
    let mut out = String::with_capacity(content.len());
    let mut run = 0;
    for &c in content {
        if c == BACKSLASH {
            run += 1;
            continue;
        }
        let kept = if c == quote && run % 2 == 1 { run - 1 } else { run };
        out.extend(std::iter::repeat_n(BACKSLASH, kept));
        out.push(c);
        run = 0;
    }
    out.extend(std::iter::repeat_n(BACKSLASH, run));
    out
}

impl FromStr for PropertyValue {
    type Err = LiteralError;

    /// Parses a value the way it would be written after `name=`, except that
    /// bare words are accepted as strings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let Some(first) = chars.next() else {
            return Err(LiteralError::Empty);
        };

        if is_quote(first) {
            let inner: Vec<char> = chars.collect();
            return match inner.split_last() {
                Some((&last, body)) if last == first && trailing_backslashes(body) % 2 == 0 => {
                    Ok(PropertyValue::String(unescape(body, first)))
                }
                _ => Err(LiteralError::UnterminatedQuote(s.to_string())),
            };
        }

        if s == NULL {
            return Ok(PropertyValue::Null);
        }
        Ok(parse_number(s)
            .map(PropertyValue::Number)
            .unwrap_or_else(|| PropertyValue::String(s.to_string())))
    }
}
