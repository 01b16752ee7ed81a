// Copyright contributors to the qal-parser project
// SPDX-License-Identifier: Apache-2.0

//! Recursive-descent parser from QAL source text to the AST.
//!
//! Errors never abort the parse: a malformed statement is reported, the
//! parser resynchronizes at the next statement separator, and an
//! `ErroneousStatement` marker takes the statement's place so later passes
//! can still descend. Only an unusable program header yields
//! `Root::Erroneous`.

use qal_lexer::{self as lexer, unescape, LiteralKind, TokenKind};

use crate::ast::*;
use crate::{HasSourceLocation, SourceLocation};

/// Parses `source` into an AST root plus a list of error strings of the
/// form `<file>:<line>:<col>: <message>`.
pub fn parse_source(source: &str, file_name: &str) -> (Root, Vec<String>) {
    let (tokens, mut errors) = lex(source, file_name);
    let mut parser = Parser {
        file_name,
        toks: tokens,
        pos: 0,
        last_consumed: 0,
        paren_depth: 0,
        errors: &mut errors,
    };
    let root = parser.program();
    (root, errors)
}

#[derive(Clone, Copy, Debug)]
struct Tok<'a> {
    kind: TokenKind,
    text: &'a str,
    offset: usize,
    first_line: u32,
    first_column: u32,
    last_line: u32,
    last_column: u32,
}

/// Runs the lexer and pairs tokens with text and line/column ranges.
/// Whitespace and comments are dropped; newlines are kept as tokens since
/// they separate statements. Lexical errors are reported here.
fn lex<'a>(source: &'a str, file_name: &str) -> (Vec<Tok<'a>>, Vec<String>) {
    let mut toks = Vec::new();
    let mut errors = Vec::new();
    let mut offset = 0usize;
    let mut line = 1u32;
    let mut column = 1u32;
    for token in lexer::tokenize(source) {
        let len = token.len as usize;
        let text = &source[offset..offset + len];
        let first_line = line;
        let first_column = column;
        // Advance the position over the token text.
        let mut last_line = line;
        let mut last_column = column;
        for c in text.chars() {
            last_line = line;
            last_column = column;
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        let tok = Tok {
            kind: token.kind,
            text,
            offset,
            first_line,
            first_column,
            last_line,
            last_column,
        };
        offset += len;
        let mut report = |message: &str| {
            errors.push(format!(
                "{file_name}:{first_line}:{first_column}: {message}"
            ));
        };
        match token.kind {
            TokenKind::Whitespace | TokenKind::LineComment => continue,
            TokenKind::BlockComment { terminated } => {
                if !terminated {
                    report("unterminated block comment");
                }
                continue;
            }
            TokenKind::Unknown => {
                report(&format!("unexpected character '{text}'"));
                continue;
            }
            TokenKind::Literal {
                kind: LiteralKind::Str { terminated: false },
            } => report("unterminated string literal"),
            TokenKind::Literal {
                kind: LiteralKind::Json { terminated: false },
            } => report("unterminated JSON literal"),
            TokenKind::Literal {
                kind:
                    LiteralKind::Float {
                        empty_exponent: true,
                    },
            } => report("missing digits in float exponent"),
            _ => {}
        }
        toks.push(tok);
    }
    (toks, errors)
}

struct Parser<'a, 'e> {
    file_name: &'a str,
    toks: Vec<Tok<'a>>,
    pos: usize,
    last_consumed: usize,
    /// Newline tokens are transparently skipped while inside parentheses.
    paren_depth: u32,
    errors: &'e mut Vec<String>,
}

/// Statement parsers return `Err(())` after recording an error; the caller
/// resynchronizes.
type PResult<T> = Result<T, ()>;

impl<'a> Parser<'a, '_> {
    fn eof_tok(&self) -> Tok<'a> {
        let (line, column) = match self.toks.last() {
            Some(tok) => (tok.last_line, tok.last_column + 1),
            None => (1, 1),
        };
        Tok {
            kind: TokenKind::Eof,
            text: "",
            offset: usize::MAX,
            first_line: line,
            first_column: column,
            last_line: line,
            last_column: column,
        }
    }

    fn cur(&mut self) -> Tok<'a> {
        while self.paren_depth > 0 {
            match self.toks.get(self.pos) {
                Some(tok) if tok.kind == TokenKind::Newline => self.pos += 1,
                _ => break,
            }
        }
        match self.toks.get(self.pos) {
            Some(tok) => *tok,
            None => self.eof_tok(),
        }
    }

    fn nth_kind(&self, n: usize) -> TokenKind {
        self.toks
            .get(self.pos + n)
            .map_or(TokenKind::Eof, |tok| tok.kind)
    }

    fn bump(&mut self) -> Tok<'a> {
        let tok = self.cur();
        if self.pos < self.toks.len() {
            self.last_consumed = self.pos;
            self.pos += 1;
        }
        tok
    }

    fn at(&mut self, kind: TokenKind) -> bool {
        self.cur().kind == kind
    }

    fn at_keyword(&mut self, keyword: &str) -> bool {
        let tok = self.cur();
        tok.kind == TokenKind::Ident && tok.text.eq_ignore_ascii_case(keyword)
    }

    fn at_separator(&mut self) -> bool {
        matches!(
            self.cur().kind,
            TokenKind::Newline | TokenKind::Semi | TokenKind::Eof
        )
    }

    fn prev(&self) -> Tok<'a> {
        match self.toks.get(self.last_consumed) {
            Some(tok) => *tok,
            None => self.eof_tok(),
        }
    }

    fn error_at(&mut self, tok: &Tok<'_>, message: &str) {
        self.errors.push(format!(
            "{}:{}:{}: {}",
            self.file_name, tok.first_line, tok.first_column, message
        ));
    }

    fn error_here(&mut self, message: &str) {
        let tok = self.cur();
        self.error_at(&tok, message);
    }

    /// Source range from `start` to the last consumed token.
    fn span_from(&self, start: &Tok<'_>) -> SourceLocation {
        let end = self.prev();
        SourceLocation::new(
            self.file_name,
            start.first_line,
            start.first_column,
            end.last_line,
            end.last_column,
        )
    }

    fn locate<N: HasAnnotations>(&self, node: &mut N, start: &Tok<'_>) {
        node.set_source_location(self.span_from(start));
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> PResult<Tok<'a>> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            let found = self.cur();
            let found_desc = describe(&found);
            self.error_at(&found, &format!("expected {what}, found {found_desc}"));
            Err(())
        }
    }

    fn expect_ident(&mut self, what: &str) -> PResult<Identifier> {
        let tok = self.expect(TokenKind::Ident, what)?;
        let mut identifier = Identifier::new(tok.text);
        self.locate(&mut identifier, &tok);
        Ok(identifier)
    }

    /// Skips to the next statement separator without consuming it.
    fn recover(&mut self) {
        while !self.at_separator() {
            self.bump();
        }
    }

    fn skip_separators(&mut self) {
        while matches!(self.cur().kind, TokenKind::Newline | TokenKind::Semi) {
            self.bump();
        }
    }

    fn end_of_statement(&mut self) {
        if !self.at_separator() {
            self.error_here("expected end of statement");
            self.recover();
        }
    }

    //
    // Program structure
    //

    fn program(&mut self) -> Root {
        self.skip_separators();
        let start = self.cur();
        if !self.at_keyword("version") {
            self.error_here("expected 'version' keyword");
            let mut erroneous = ErroneousProgram::new();
            self.locate(&mut erroneous, &start);
            return erroneous.to_root();
        }
        self.bump();
        let mut program = Program::new();
        if let Some(version) = self.version_items() {
            program.set_version(version);
        }
        self.end_of_statement();
        self.skip_separators();
        if self.at_keyword("qubits") {
            self.bump();
            if let Ok(num_qubits) = self.expression() {
                program.set_num_qubits(num_qubits);
                self.end_of_statement();
            } else {
                self.recover();
            }
        } else {
            self.error_here("expected 'qubits' statement");
        }
        let statements_start = self.cur();
        let mut statements = StatementList::new();
        loop {
            self.skip_separators();
            if self.at(TokenKind::Eof) {
                break;
            }
            statements.add(self.statement());
        }
        self.locate(&mut statements, &statements_start);
        program.set_statements(statements);
        self.locate(&mut program, &start);
        program.to_root()
    }

    /// Reads the payload of a `version` statement. The components arrive as
    /// a mix of int, float, `.` and `-` tokens ("1.0.3" lexes as float, dot,
    /// int); they are joined back together and split on the dots.
    fn version_items(&mut self) -> Option<Version> {
        let start = self.cur();
        let mut joined = String::new();
        while !self.at_separator() {
            let tok = self.cur();
            match tok.kind {
                TokenKind::Minus => joined.push('-'),
                TokenKind::Dot => joined.push('.'),
                TokenKind::Literal {
                    kind: LiteralKind::Int,
                }
                | TokenKind::Literal {
                    kind: LiteralKind::Float { .. },
                } => joined.push_str(tok.text),
                _ => {
                    self.error_at(&tok, "malformed version number");
                    self.recover();
                    return None;
                }
            }
            self.bump();
        }
        if joined.is_empty() {
            self.error_here("expected version number");
            return None;
        }
        let mut items = Vec::new();
        for component in joined.split('.') {
            match component.parse::<i64>() {
                Ok(item) => items.push(item),
                Err(_) => {
                    self.error_at(&start, "malformed version number");
                    return None;
                }
            }
        }
        let mut version = Version::new(items);
        self.locate(&mut version, &start);
        Some(version)
    }

    //
    // Statements
    //

    fn statement(&mut self) -> Statement {
        let start = self.cur();
        let result = match start.kind {
            TokenKind::Dot => self.subcircuit(),
            TokenKind::Ident if start.text.eq_ignore_ascii_case("map") => self.mapping(),
            TokenKind::Ident if start.text.eq_ignore_ascii_case("error_model") => {
                self.error_model()
            }
            TokenKind::OpenBrace => self.braced_bundle(),
            _ => self.single_line_bundle(),
        };
        match result {
            Ok(statement) => statement,
            Err(()) => {
                self.recover();
                let mut erroneous = ErroneousStatement::new();
                self.locate(&mut erroneous, &start);
                erroneous.to_stmt()
            }
        }
    }

    fn subcircuit(&mut self) -> PResult<Statement> {
        let start = self.bump(); // the '.'
        let name = self.expect_ident("subcircuit name")?;
        let iterations = if self.at(TokenKind::OpenParen) {
            self.paren_depth += 1;
            self.bump();
            let expr = self.expression();
            self.paren_depth -= 1;
            let expr = expr?;
            self.expect(TokenKind::CloseParen, "')'")?;
            Some(expr)
        } else {
            None
        };
        let mut subcircuit = Subcircuit::new(name, iterations);
        while self.at(TokenKind::At) {
            subcircuit.add_annotation_data(self.annotation()?);
        }
        self.locate(&mut subcircuit, &start);
        self.end_of_statement();
        Ok(subcircuit.to_stmt())
    }

    fn mapping(&mut self) -> PResult<Statement> {
        let start = self.bump(); // the 'map' keyword
        let mut mapping = if self.at(TokenKind::Ident) && self.nth_kind(1) == TokenKind::Eq {
            // map <alias> = <expr>
            let alias = self.expect_ident("mapping alias")?;
            self.bump(); // the '='
            let expr = self.expression()?;
            Mapping::new(alias, expr)
        } else {
            // map <expr>, <alias>
            let expr = self.expression()?;
            self.expect(TokenKind::Comma, "','")?;
            let alias = self.expect_ident("mapping alias")?;
            Mapping::new(alias, expr)
        };
        while self.at(TokenKind::At) {
            mapping.add_annotation_data(self.annotation()?);
        }
        self.locate(&mut mapping, &start);
        self.end_of_statement();
        Ok(mapping.to_stmt())
    }

    /// `error_model <name>, <args...>`. There is no dedicated statement kind
    /// for this: it becomes a single-instruction bundle that the analyzer
    /// intercepts by name. The model name operand stays a bare identifier.
    fn error_model(&mut self) -> PResult<Statement> {
        let start = self.cur();
        let keyword = self.expect_ident("'error_model'")?;
        let model_name = self.expect_ident("error model name")?;
        let mut operands = ExpressionList::new();
        operands.add(model_name.to_expr());
        while self.at(TokenKind::Comma) {
            self.bump();
            operands.add(self.expression()?);
        }
        let mut instruction = Instruction::new(keyword, None, operands);
        while self.at(TokenKind::At) {
            instruction.add_annotation_data(self.annotation()?);
        }
        self.locate(&mut instruction, &start);
        let mut bundle = Bundle::new();
        bundle.add_instruction(instruction);
        self.locate(&mut bundle, &start);
        self.end_of_statement();
        Ok(bundle.to_stmt())
    }

    fn braced_bundle(&mut self) -> PResult<Statement> {
        let start = self.bump(); // the '{'
        let mut bundle = Bundle::new();
        loop {
            while matches!(self.cur().kind, TokenKind::Newline | TokenKind::Semi) {
                self.bump();
            }
            if self.at(TokenKind::CloseBrace) {
                self.bump();
                break;
            }
            if self.at(TokenKind::Eof) {
                self.error_here("unterminated bundle, expected '}'");
                return Err(());
            }
            bundle.add_instruction(self.instruction()?);
            match self.cur().kind {
                TokenKind::Pipe => {
                    self.bump();
                }
                TokenKind::Newline | TokenKind::Semi | TokenKind::CloseBrace => {}
                _ => {
                    self.error_here("expected '|', newline or '}' after instruction");
                    return Err(());
                }
            }
        }
        if bundle.items().is_empty() {
            self.error_at(&start, "empty bundle");
            return Err(());
        }
        // Annotations after the closing brace are bundle-level.
        while self.at(TokenKind::At) {
            bundle.add_annotation_data(self.annotation()?);
        }
        self.locate(&mut bundle, &start);
        self.end_of_statement();
        Ok(bundle.to_stmt())
    }

    fn single_line_bundle(&mut self) -> PResult<Statement> {
        let start = self.cur();
        let mut bundle = Bundle::new();
        loop {
            // `@` binds tighter than `|`: annotations are consumed by the
            // instruction they follow.
            bundle.add_instruction(self.instruction()?);
            if self.at(TokenKind::Pipe) {
                self.bump();
            } else {
                break;
            }
        }
        self.locate(&mut bundle, &start);
        self.end_of_statement();
        Ok(bundle.to_stmt())
    }

    fn instruction(&mut self) -> PResult<Instruction> {
        let start = self.cur();
        // A `c-` prefix is an identifier `c` with an immediately adjacent
        // minus. Non-adjacent `c - x` stays an ordinary instruction name.
        let condition = if start.kind == TokenKind::Ident
            && start.text.eq_ignore_ascii_case("c")
            && self.minus_adjacent_to(&start)
        {
            self.bump(); // 'c'
            self.bump(); // '-'
            let condition = self.expression()?;
            self.expect(TokenKind::Comma, "',' after condition")?;
            Some(condition)
        } else {
            None
        };
        let name = self.expect_ident("instruction name")?;
        let mut operands = ExpressionList::new();
        if !self.at_instruction_boundary() {
            operands.add(self.expression()?);
            while self.at(TokenKind::Comma) {
                self.bump();
                operands.add(self.expression()?);
            }
        }
        let mut instruction = Instruction::new(name, condition, operands);
        while self.at(TokenKind::At) {
            instruction.add_annotation_data(self.annotation()?);
        }
        self.locate(&mut instruction, &start);
        Ok(instruction)
    }

    fn minus_adjacent_to(&self, tok: &Tok<'_>) -> bool {
        match self.toks.get(self.pos + 1) {
            Some(next) => {
                next.kind == TokenKind::Minus && next.offset == tok.offset + tok.text.len()
            }
            None => false,
        }
    }

    fn at_instruction_boundary(&mut self) -> bool {
        matches!(
            self.cur().kind,
            TokenKind::Newline
                | TokenKind::Semi
                | TokenKind::Eof
                | TokenKind::Pipe
                | TokenKind::CloseBrace
                | TokenKind::At
        )
    }

    /// `@ <interface> . <operation> ( <args>? )` with the argument list
    /// optional.
    fn annotation(&mut self) -> PResult<AnnotationData> {
        let start = self.bump(); // the '@'
        let interface = self.expect_ident("annotation interface name")?;
        self.expect(TokenKind::Dot, "'.'")?;
        let operation = self.expect_ident("annotation operation name")?;
        let operands = if self.at(TokenKind::OpenParen) {
            self.paren_depth += 1;
            self.bump();
            let mut list = ExpressionList::new();
            if !self.at(TokenKind::CloseParen) {
                loop {
                    match self.expression() {
                        Ok(expression) => list.add(expression),
                        Err(()) => {
                            self.paren_depth -= 1;
                            return Err(());
                        }
                    }
                    if self.at(TokenKind::Comma) {
                        self.bump();
                    } else {
                        break;
                    }
                }
            }
            self.paren_depth -= 1;
            self.expect(TokenKind::CloseParen, "')'")?;
            Some(list)
        } else {
            None
        };
        let mut data = AnnotationData::new(interface, operation, operands);
        self.locate(&mut data, &start);
        Ok(data)
    }

    //
    // Expressions
    //
    // Precedence, lowest to highest: `+`/`-`, `*`/`/`, `**` (right
    // associative), unary `-`, call/index.
    //

    fn expression(&mut self) -> PResult<Expression> {
        self.additive()
    }

    fn additive(&mut self) -> PResult<Expression> {
        let start = self.cur();
        let mut lhs = self.multiplicative()?;
        loop {
            let op = match self.cur().kind {
                TokenKind::Plus => BinaryOperator::Add,
                TokenKind::Minus => BinaryOperator::Subtract,
                _ => break,
            };
            self.bump();
            let rhs = self.multiplicative()?;
            let mut node = BinaryOp::new(op, lhs, rhs);
            self.locate(&mut node, &start);
            lhs = node.to_expr();
        }
        Ok(lhs)
    }

    fn multiplicative(&mut self) -> PResult<Expression> {
        let start = self.cur();
        let mut lhs = self.power()?;
        loop {
            let op = match self.cur().kind {
                TokenKind::Star => BinaryOperator::Multiply,
                TokenKind::Slash => BinaryOperator::Divide,
                _ => break,
            };
            self.bump();
            let rhs = self.power()?;
            let mut node = BinaryOp::new(op, lhs, rhs);
            self.locate(&mut node, &start);
            lhs = node.to_expr();
        }
        Ok(lhs)
    }

    fn power(&mut self) -> PResult<Expression> {
        let start = self.cur();
        let base = self.unary()?;
        if self.at(TokenKind::StarStar) {
            self.bump();
            let exponent = self.power()?;
            let mut node = BinaryOp::new(BinaryOperator::Power, base, exponent);
            self.locate(&mut node, &start);
            return Ok(node.to_expr());
        }
        Ok(base)
    }

    fn unary(&mut self) -> PResult<Expression> {
        if self.at(TokenKind::Minus) {
            let start = self.bump();
            let operand = self.unary()?;
            let mut node = UnaryOp::new(UnaryOperator::Negate, operand);
            self.locate(&mut node, &start);
            return Ok(node.to_expr());
        }
        self.postfix()
    }

    fn postfix(&mut self) -> PResult<Expression> {
        let start = self.cur();
        let mut expr = self.primary()?;
        while self.at(TokenKind::OpenBracket) {
            self.bump();
            let indices = self.index_list()?;
            let mut node = Index::new(expr, indices);
            self.locate(&mut node, &start);
            expr = node.to_expr();
        }
        Ok(expr)
    }

    fn primary(&mut self) -> PResult<Expression> {
        let tok = self.cur();
        match tok.kind {
            TokenKind::Literal {
                kind: LiteralKind::Int,
            } => {
                self.bump();
                match tok.text.parse::<i64>() {
                    Ok(value) => {
                        let mut node = IntegerLiteral::new(value);
                        self.locate(&mut node, &tok);
                        Ok(node.to_expr())
                    }
                    Err(_) => {
                        self.error_at(&tok, "integer literal too large");
                        Err(())
                    }
                }
            }
            TokenKind::Literal {
                kind: LiteralKind::Float { .. },
            } => {
                self.bump();
                // A missing exponent was already reported by the lexer.
                let value = tok.text.parse::<f64>().unwrap_or(0.0);
                let mut node = FloatLiteral::new(value);
                self.locate(&mut node, &tok);
                Ok(node.to_expr())
            }
            TokenKind::Literal {
                kind: LiteralKind::Str { terminated },
            } => {
                self.bump();
                let inner = if terminated {
                    &tok.text[1..tok.text.len() - 1]
                } else {
                    &tok.text[1..]
                };
                let value = match unescape::unescape_string(inner) {
                    Ok(value) => value,
                    Err(error) => {
                        self.error_at(&tok, &error.to_string());
                        inner.to_string()
                    }
                };
                let mut node = StringLiteral::new(value);
                self.locate(&mut node, &tok);
                Ok(node.to_expr())
            }
            TokenKind::Literal {
                kind: LiteralKind::Json { terminated },
            } => {
                self.bump();
                let inner = if terminated {
                    &tok.text[2..tok.text.len() - 2]
                } else {
                    &tok.text[2..]
                };
                let mut node = JsonLiteral::new(inner);
                self.locate(&mut node, &tok);
                Ok(node.to_expr())
            }
            TokenKind::Ident => {
                self.bump();
                if self.at(TokenKind::OpenParen) {
                    let mut name = Identifier::new(tok.text);
                    self.locate(&mut name, &tok);
                    self.paren_depth += 1;
                    self.bump();
                    let mut args = ExpressionList::new();
                    if !self.at(TokenKind::CloseParen) {
                        loop {
                            match self.expression() {
                                Ok(expression) => args.add(expression),
                                Err(()) => {
                                    self.paren_depth -= 1;
                                    return Err(());
                                }
                            }
                            if self.at(TokenKind::Comma) {
                                self.bump();
                            } else {
                                break;
                            }
                        }
                    }
                    self.paren_depth -= 1;
                    self.expect(TokenKind::CloseParen, "')'")?;
                    let mut node = FunctionCall::new(name, args);
                    self.locate(&mut node, &tok);
                    Ok(node.to_expr())
                } else {
                    let mut node = Identifier::new(tok.text);
                    self.locate(&mut node, &tok);
                    Ok(node.to_expr())
                }
            }
            TokenKind::OpenParen => {
                self.paren_depth += 1;
                self.bump();
                let expr = self.expression();
                self.paren_depth -= 1;
                let expr = expr?;
                self.expect(TokenKind::CloseParen, "')'")?;
                Ok(expr)
            }
            TokenKind::OpenBracket => self.matrix_literal(),
            _ => {
                let found = describe(&tok);
                self.error_at(&tok, &format!("expected expression, found {found}"));
                Err(())
            }
        }
    }

    /// `[...]` in expression position. One row makes the legacy flat form;
    /// newlines or semicolons separate additional rows.
    fn matrix_literal(&mut self) -> PResult<Expression> {
        let start = self.bump(); // the '['
        // Newlines separate rows here even inside parentheses.
        let saved_depth = std::mem::replace(&mut self.paren_depth, 0);
        let result = self.matrix_rows();
        self.paren_depth = saved_depth;
        let rows = result?;
        if rows.is_empty() {
            self.error_at(&start, "empty matrix literal");
            return Err(());
        }
        let row_len = rows.at(0).map(|row| row.len()).unwrap_or(0);
        if rows.iter().any(|row| row.len() != row_len) {
            self.error_at(&start, "matrix rows differ in length");
            return Err(());
        }
        let mut node = MatrixLiteral::new(rows);
        self.locate(&mut node, &start);
        Ok(node.to_expr())
    }

    fn matrix_rows(&mut self) -> PResult<qal_tree::Many<ExpressionList>> {
        let mut rows = qal_tree::Many::empty();
        loop {
            while matches!(self.cur().kind, TokenKind::Newline | TokenKind::Semi) {
                self.bump();
            }
            if self.at(TokenKind::CloseBracket) {
                self.bump();
                break;
            }
            if self.at(TokenKind::Eof) {
                self.error_here("unterminated matrix literal, expected ']'");
                return Err(());
            }
            let row_start = self.cur();
            let mut row = ExpressionList::new();
            row.add(self.expression()?);
            while self.at(TokenKind::Comma) {
                self.bump();
                row.add(self.expression()?);
            }
            self.locate(&mut row, &row_start);
            rows.add(row);
            match self.cur().kind {
                TokenKind::Newline | TokenKind::Semi | TokenKind::CloseBracket => {}
                _ => {
                    self.error_here("expected ',', ';', newline or ']' in matrix literal");
                    return Err(());
                }
            }
        }
        Ok(rows)
    }

    /// Index list between brackets: items and inclusive `first:last` ranges.
    fn index_list(&mut self) -> PResult<IndexList> {
        let mut list = IndexList::new();
        loop {
            let entry_start = self.cur();
            let first = self.expression()?;
            if self.at(TokenKind::Colon) {
                self.bump();
                let last = self.expression()?;
                let mut range = IndexRange::new(first, last);
                self.locate(&mut range, &entry_start);
                list.add(range.to_entry());
            } else {
                let mut item = IndexItem::new(first);
                self.locate(&mut item, &entry_start);
                list.add(item.to_entry());
            }
            if self.at(TokenKind::Comma) {
                self.bump();
            } else {
                break;
            }
        }
        self.expect(TokenKind::CloseBracket, "']'")?;
        Ok(list)
    }
}

fn describe(tok: &Tok<'_>) -> String {
    match tok.kind {
        TokenKind::Eof => "end of input".to_string(),
        TokenKind::Newline => "end of line".to_string(),
        _ => format!("'{}'", tok.text),
    }
}
