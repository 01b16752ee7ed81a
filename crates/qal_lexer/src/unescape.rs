// Copyright contributors to the qal-parser project
// SPDX-License-Identifier: Apache-2.0

//! Utilities for validating string literal contents and turning escape
//! sequences into the characters they stand for.
//!
//! QAL strings support the C-like escapes `\t`, `\n`, `\r`, `\'`, `\"` and
//! `\\`.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EscapeError {
    /// Backslash at the end of the literal.
    LoneSlash,
    /// Backslash followed by a character that is not a known escape.
    InvalidEscape(char),
}

impl fmt::Display for EscapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EscapeError::LoneSlash => write!(f, "string ends with a lone backslash"),
            EscapeError::InvalidEscape(c) => write!(f, "unknown escape sequence '\\{c}'"),
        }
    }
}

/// Unescapes the *contents* of a string literal (without the surrounding
/// quotes).
pub fn unescape_string(src: &str) -> Result<String, EscapeError> {
    let mut out = String::with_capacity(src.len());
    let mut chars = src.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            None => return Err(EscapeError::LoneSlash),
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => return Err(EscapeError::InvalidEscape(other)),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_passthrough() {
        assert_eq!(unescape_string("hello").unwrap(), "hello");
    }

    #[test]
    fn known_escapes() {
        assert_eq!(unescape_string(r#"a\tb\nc\rd\'e\"f\\g"#).unwrap(), "a\tb\nc\rd'e\"f\\g");
    }

    #[test]
    fn bad_escapes() {
        assert_eq!(unescape_string(r"\q"), Err(EscapeError::InvalidEscape('q')));
        assert_eq!(unescape_string("oops\\"), Err(EscapeError::LoneSlash));
    }
}
