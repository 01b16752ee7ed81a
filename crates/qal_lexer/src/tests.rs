// Copyright contributors to the qal-parser project
// SPDX-License-Identifier: Apache-2.0

use super::*;

use expect_test::{expect, Expect};
use std::fmt::Write;

fn check_lexing(src: &str, expect: Expect) {
    let actual: String = tokenize(src).fold(String::new(), |mut output, token| {
        let _ = writeln!(output, "{token:?}");
        output
    });
    expect.assert_eq(&actual)
}

#[test]
fn smoke_test() {
    check_lexing(
        "version 1.0\nqubits 3\n",
        expect![[r#"
            Token { kind: Ident, len: 7 }
            Token { kind: Whitespace, len: 1 }
            Token { kind: Literal { kind: Float { empty_exponent: false } }, len: 3 }
            Token { kind: Newline, len: 1 }
            Token { kind: Ident, len: 6 }
            Token { kind: Whitespace, len: 1 }
            Token { kind: Literal { kind: Int }, len: 1 }
            Token { kind: Newline, len: 1 }
        "#]],
    )
}

#[test]
fn bundle_with_comment() {
    check_lexing(
        "x q[0] | y q[1] # comment",
        expect![[r#"
            Token { kind: Ident, len: 1 }
            Token { kind: Whitespace, len: 1 }
            Token { kind: Ident, len: 1 }
            Token { kind: OpenBracket, len: 1 }
            Token { kind: Literal { kind: Int }, len: 1 }
            Token { kind: CloseBracket, len: 1 }
            Token { kind: Whitespace, len: 1 }
            Token { kind: Pipe, len: 1 }
            Token { kind: Whitespace, len: 1 }
            Token { kind: Ident, len: 1 }
            Token { kind: Whitespace, len: 1 }
            Token { kind: Ident, len: 1 }
            Token { kind: OpenBracket, len: 1 }
            Token { kind: Literal { kind: Int }, len: 1 }
            Token { kind: CloseBracket, len: 1 }
            Token { kind: Whitespace, len: 1 }
            Token { kind: LineComment, len: 9 }
        "#]],
    )
}

#[test]
fn comment_flavors() {
    check_lexing(
        "/* block */ x /* unterminated",
        expect![[r#"
            Token { kind: BlockComment { terminated: true }, len: 11 }
            Token { kind: Whitespace, len: 1 }
            Token { kind: Ident, len: 1 }
            Token { kind: Whitespace, len: 1 }
            Token { kind: BlockComment { terminated: false }, len: 15 }
        "#]],
    )
}

#[test]
fn reset_averaging_is_one_identifier() {
    check_lexing(
        "error_model reset-averaging, 0.1",
        expect![[r#"
            Token { kind: Ident, len: 11 }
            Token { kind: Whitespace, len: 1 }
            Token { kind: Ident, len: 15 }
            Token { kind: Comma, len: 1 }
            Token { kind: Whitespace, len: 1 }
            Token { kind: Literal { kind: Float { empty_exponent: false } }, len: 3 }
        "#]],
    )
}

#[test]
fn reset_minus_averaging_stays_three_tokens() {
    check_lexing(
        "reset - averaging",
        expect![[r#"
            Token { kind: Ident, len: 5 }
            Token { kind: Whitespace, len: 1 }
            Token { kind: Minus, len: 1 }
            Token { kind: Whitespace, len: 1 }
            Token { kind: Ident, len: 9 }
        "#]],
    )
}

#[test]
fn string_and_json_literals() {
    check_lexing(
        r#""a\"b" {|{"k": 1}|}"#,
        expect![[r#"
            Token { kind: Literal { kind: Str { terminated: true } }, len: 6 }
            Token { kind: Whitespace, len: 1 }
            Token { kind: Literal { kind: Json { terminated: true } }, len: 12 }
        "#]],
    )
}

#[test]
fn power_operator() {
    check_lexing(
        "2 ** 3 * 4",
        expect![[r#"
            Token { kind: Literal { kind: Int }, len: 1 }
            Token { kind: Whitespace, len: 1 }
            Token { kind: StarStar, len: 2 }
            Token { kind: Whitespace, len: 1 }
            Token { kind: Literal { kind: Int }, len: 1 }
            Token { kind: Whitespace, len: 1 }
            Token { kind: Star, len: 1 }
            Token { kind: Whitespace, len: 1 }
            Token { kind: Literal { kind: Int }, len: 1 }
        "#]],
    )
}

#[test]
fn crlf_is_one_newline() {
    check_lexing(
        "a\r\nb",
        expect![[r#"
            Token { kind: Ident, len: 1 }
            Token { kind: Newline, len: 2 }
            Token { kind: Ident, len: 1 }
        "#]],
    )
}

#[test]
fn conditional_prefix_lexes_as_ident_minus() {
    // The parser recognizes `c-` by adjacency; the lexer keeps them apart.
    check_lexing(
        "c- b[0], x q[0]",
        expect![[r#"
            Token { kind: Ident, len: 1 }
            Token { kind: Minus, len: 1 }
            Token { kind: Whitespace, len: 1 }
            Token { kind: Ident, len: 1 }
            Token { kind: OpenBracket, len: 1 }
            Token { kind: Literal { kind: Int }, len: 1 }
            Token { kind: CloseBracket, len: 1 }
            Token { kind: Comma, len: 1 }
            Token { kind: Whitespace, len: 1 }
            Token { kind: Ident, len: 1 }
            Token { kind: Whitespace, len: 1 }
            Token { kind: Ident, len: 1 }
            Token { kind: OpenBracket, len: 1 }
            Token { kind: Literal { kind: Int }, len: 1 }
            Token { kind: CloseBracket, len: 1 }
        "#]],
    )
}
