// Copyright contributors to the qal-parser project
// SPDX-License-Identifier: Apache-2.0

//! Low-level QAL lexer.
//!
//! The cursor design is borrowed from `rustc_lexer`. The main entity of this
//! crate is the [`TokenKind`] enum which represents common lexeme types.
//! Tokens carry only their kind and byte length; pairing them back with the
//! source text, and deciding which identifiers are keywords, is the parser's
//! job (keywords are matched case-insensitively there).

mod cursor;
pub mod unescape;

#[cfg(test)]
mod tests;

pub use crate::cursor::Cursor;

use self::LiteralKind::*;
use self::TokenKind::*;

/// Parsed token.
/// It doesn't contain information about data that has been parsed,
/// only the type of the token and its size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub len: u32,
}

impl Token {
    fn new(kind: TokenKind, len: u32) -> Token {
        Token { kind, len }
    }
}

/// Enum representing common lexeme types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// `# comment`
    LineComment,

    /// `/* block comment */`. Block comments do not nest; `terminated` is
    /// false when the closing `*/` is missing.
    BlockComment { terminated: bool },

    /// Any non-newline whitespace character sequence.
    Whitespace,

    /// `\n`, `\r\n` or a lone `\r`. Statement separator, hence not folded
    /// into `Whitespace`.
    Newline,

    /// "ident". Keywords are also considered identifiers at this stage.
    /// The error-model name `reset-averaging` lexes as a single identifier;
    /// this is a deliberate escape hatch, `-` is otherwise never part of an
    /// identifier.
    Ident,

    /// Literals: numbers, strings, JSON blobs.
    Literal { kind: LiteralKind },

    // One-char tokens:
    /// ";"
    Semi,
    /// ","
    Comma,
    /// "."
    Dot,
    /// ":"
    Colon,
    /// "("
    OpenParen,
    /// ")"
    CloseParen,
    /// "{"
    OpenBrace,
    /// "}"
    CloseBrace,
    /// "["
    OpenBracket,
    /// "]"
    CloseBracket,
    /// "@"
    At,
    /// "|"
    Pipe,
    /// "="
    Eq,
    /// "+"
    Plus,
    /// "-"
    Minus,
    /// "*"
    Star,
    /// "**"
    StarStar,
    /// "/"
    Slash,

    /// Unknown token, not expected by the lexer.
    Unknown,

    /// End of input.
    Eof,
}

/// Enum representing the literal types supported by the lexer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiteralKind {
    /// "123"
    Int,
    /// "12.34", "1e3", "1.2e-3". `empty_exponent` is true for forms like
    /// "1e" or "1e+" that are missing the exponent digits.
    Float { empty_exponent: bool },
    /// `"abc"`, with C-like escapes. `terminated` is false when the closing
    /// quote is missing.
    Str { terminated: bool },
    /// `{| ... |}` raw JSON blob. `terminated` is false when the closing
    /// `|}` is missing.
    Json { terminated: bool },
}

/// Creates an iterator that produces tokens from the input string.
pub fn tokenize(input: &str) -> impl Iterator<Item = Token> + '_ {
    let mut cursor = Cursor::new(input);
    std::iter::from_fn(move || {
        let token = cursor.advance_token();
        if token.kind != TokenKind::Eof {
            Some(token)
        } else {
            None
        }
    })
}

/// True if `c` is non-newline whitespace. Newlines separate statements and
/// get their own token kind.
pub fn is_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}'   // \t
        | '\u{000B}' // vertical tab
        | '\u{000C}' // form feed
        | '\u{0020}' // space
    )
}

/// True if `c` is valid as a first character of an identifier.
pub fn is_id_start(c: char) -> bool {
    c == '_' || unicode_xid::UnicodeXID::is_xid_start(c)
}

/// True if `c` is valid as a non-first character of an identifier.
pub fn is_id_continue(c: char) -> bool {
    unicode_xid::UnicodeXID::is_xid_continue(c)
}

/// The passed string is lexically an identifier.
pub fn is_ident(string: &str) -> bool {
    let mut chars = string.chars();
    if let Some(start) = chars.next() {
        is_id_start(start) && chars.all(is_id_continue)
    } else {
        false
    }
}

impl Cursor<'_> {
    /// Parses a token from the input string.
    pub fn advance_token(&mut self) -> Token {
        // Remember the remaining input so multi-character lookahead (the
        // `reset-averaging` escape hatch) can inspect the token text.
        let start_rest = self.as_str();
        let first_char = match self.bump() {
            Some(c) => c,
            None => return Token::new(TokenKind::Eof, 0),
        };
        let token_kind = match first_char {
            '#' => self.line_comment(),

            '/' => match self.first() {
                '*' => self.block_comment(),
                _ => Slash,
            },

            c if is_whitespace(c) => self.whitespace(),

            '\r' => {
                if self.first() == '\n' {
                    self.bump();
                }
                Newline
            }
            '\n' => Newline,

            c if is_id_start(c) => self.ident_like(start_rest),

            c @ '0'..='9' => {
                let literal_kind = self.number(c);
                TokenKind::Literal { kind: literal_kind }
            }

            '"' => {
                let terminated = self.double_quoted_string();
                TokenKind::Literal {
                    kind: Str { terminated },
                }
            }

            '{' => {
                if self.first() == '|' {
                    self.bump();
                    let terminated = self.json_blob();
                    TokenKind::Literal {
                        kind: Json { terminated },
                    }
                } else {
                    OpenBrace
                }
            }

            ';' => Semi,
            ',' => Comma,
            '.' => Dot,
            ':' => Colon,
            '(' => OpenParen,
            ')' => CloseParen,
            '}' => CloseBrace,
            '[' => OpenBracket,
            ']' => CloseBracket,
            '@' => At,
            '|' => Pipe,
            '=' => Eq,
            '+' => Plus,
            '-' => Minus,
            '*' => {
                if self.first() == '*' {
                    self.bump();
                    StarStar
                } else {
                    Star
                }
            }

            _ => Unknown,
        };
        let res = Token::new(token_kind, self.pos_within_token());
        self.reset_pos_within_token();
        res
    }

    fn line_comment(&mut self) -> TokenKind {
        self.eat_while(|c| c != '\n' && c != '\r');
        LineComment
    }

    fn block_comment(&mut self) -> TokenKind {
        self.bump(); // the '*'
        let mut terminated = false;
        while let Some(c) = self.bump() {
            if c == '*' && self.first() == '/' {
                self.bump();
                terminated = true;
                break;
            }
        }
        BlockComment { terminated }
    }

    fn whitespace(&mut self) -> TokenKind {
        self.eat_while(is_whitespace);
        Whitespace
    }

    fn ident_like(&mut self, start_rest: &str) -> TokenKind {
        self.eat_while(is_id_continue);
        // `reset-averaging` is the one name that may contain a dash. It has
        // to be recognized here; the parser never glues tokens together.
        let consumed = start_rest.len() - self.as_str().len();
        if start_rest[..consumed].eq_ignore_ascii_case("reset") {
            let rest = self.as_str();
            let tail_len = "-averaging".len();
            if rest.len() >= tail_len && rest[..tail_len].eq_ignore_ascii_case("-averaging") {
                let boundary_ok = rest[tail_len..]
                    .chars()
                    .next()
                    .map_or(true, |c| !is_id_continue(c));
                if boundary_ok {
                    for _ in 0..tail_len {
                        self.bump();
                    }
                }
            }
        }
        Ident
    }

    fn number(&mut self, _first_digit: char) -> LiteralKind {
        self.eat_while(|c| c.is_ascii_digit());
        // A fraction needs at least one digit after the dot; otherwise the
        // dot is left for the parser (it could start an annotation).
        let mut is_float = false;
        if self.first() == '.' && self.second().is_ascii_digit() {
            self.bump();
            self.eat_while(|c| c.is_ascii_digit());
            is_float = true;
        }
        if matches!(self.first(), 'e' | 'E') {
            let mut lookahead = 1;
            if matches!(self.second(), '+' | '-') {
                lookahead = 2;
            }
            let after_sign = if lookahead == 1 {
                self.second()
            } else {
                let s = self.as_str();
                s.chars().nth(2).unwrap_or('\0')
            };
            if after_sign.is_ascii_digit() {
                self.bump();
                if lookahead == 2 {
                    self.bump();
                }
                self.eat_while(|c| c.is_ascii_digit());
                return Float {
                    empty_exponent: false,
                };
            } else if !is_id_start(self.second()) && lookahead == 1 {
                // "1e" or "1e+": an exponent was clearly started, report it
                // as missing rather than splitting into Int + Ident.
                self.bump();
                if matches!(self.first(), '+' | '-') {
                    self.bump();
                }
                return Float {
                    empty_exponent: true,
                };
            }
        }
        if is_float {
            Float {
                empty_exponent: false,
            }
        } else {
            Int
        }
    }

    fn double_quoted_string(&mut self) -> bool {
        while let Some(c) = self.bump() {
            match c {
                '"' => return true,
                '\\' if self.first() == '\\' || self.first() == '"' => {
                    // Bump again to skip escaped character.
                    self.bump();
                }
                '\n' | '\r' => return false,
                _ => (),
            }
        }
        // End of input reached.
        false
    }

    fn json_blob(&mut self) -> bool {
        while let Some(c) = self.bump() {
            if c == '|' && self.first() == '}' {
                self.bump();
                return true;
            }
        }
        false
    }
}
